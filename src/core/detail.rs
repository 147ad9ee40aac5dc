//! Collection detail viewer state machine.
//!
//! `Idle → Loading → {Loaded, Failed}`. Every open issues a [`FetchTicket`];
//! results carrying any other ticket are dropped, so a slow response for a
//! previously opened collection never overwrites the current one.

use serde_json::Value;

use crate::core::collection::{classify, Variant};
use crate::core::expansion::ExpansionTracker;
use crate::core::records::Records;
use crate::core::rows::Row;

/// Headline shown when a fetch fails.
pub const LOAD_FAILED: &str = "Failed to load collection data";

/// Identifies one open of the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DetailState {
    #[default]
    Idle,
    Loading {
        name: String,
        variant: Variant,
    },
    Loaded {
        name: String,
        records: Records,
    },
    Failed {
        name: String,
        variant: Variant,
        /// Display-only cause.
        error: String,
    },
}

#[derive(Debug, Default)]
pub struct CollectionDetail {
    state: DetailState,
    expansion: ExpansionTracker,
    generation: u64,
}

impl CollectionDetail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, DetailState::Idle)
    }

    pub fn name(&self) -> Option<&str> {
        match &self.state {
            DetailState::Idle => None,
            DetailState::Loading { name, .. }
            | DetailState::Loaded { name, .. }
            | DetailState::Failed { name, .. } => Some(name),
        }
    }

    pub fn variant(&self) -> Option<Variant> {
        match &self.state {
            DetailState::Idle => None,
            DetailState::Loading { variant, .. } | DetailState::Failed { variant, .. } => {
                Some(*variant)
            }
            DetailState::Loaded { records, .. } => Some(records.variant()),
        }
    }

    /// Start loading `name`. An empty name leaves the viewer untouched.
    ///
    /// Reopening discards records and expansion of the previous open.
    pub fn open(&mut self, name: &str) -> Option<FetchTicket> {
        if name.is_empty() {
            return None;
        }
        self.generation += 1;
        self.expansion.reset();
        self.state = DetailState::Loading {
            name: name.to_string(),
            variant: classify(name),
        };
        Some(FetchTicket(self.generation))
    }

    /// Return to `Idle`; any in-flight result becomes stale.
    pub fn close(&mut self) {
        self.generation += 1;
        self.expansion.reset();
        self.state = DetailState::Idle;
    }

    /// Apply a fetch result. Returns false when the ticket is stale.
    pub fn resolve(&mut self, ticket: FetchTicket, result: Result<Vec<Value>, String>) -> bool {
        if ticket.0 != self.generation {
            log::debug!("Ignoring stale detail result {:?}", ticket);
            return false;
        }
        let (name, variant) = match &self.state {
            DetailState::Loading { name, variant } => (name.clone(), *variant),
            _ => return false,
        };

        self.expansion.reset();
        self.state = match result {
            Ok(documents) => DetailState::Loaded {
                records: Records::from_documents(variant, documents),
                name,
            },
            Err(error) => DetailState::Failed {
                name,
                variant,
                error,
            },
        };
        true
    }

    pub fn records(&self) -> Option<&Records> {
        match &self.state {
            DetailState::Loaded { records, .. } => Some(records),
            _ => None,
        }
    }

    pub fn rows(&self) -> Vec<Row> {
        self.records().map(Records::rows).unwrap_or_default()
    }

    pub fn row_count(&self) -> usize {
        self.records().map_or(0, Records::len)
    }

    /// Flip row `index`. Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) -> bool {
        if index >= self.row_count() {
            return false;
        }
        self.expansion.toggle(index)
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expansion.is_expanded(index)
    }

    /// `N journal(s)` / `N document(s)`, or `Loading...` before data.
    pub fn count_line(&self) -> Option<String> {
        match &self.state {
            DetailState::Idle | DetailState::Failed { .. } => None,
            DetailState::Loading { .. } => Some("Loading...".to_string()),
            DetailState::Loaded { records, .. } => {
                let count = records.len();
                Some(format!("{count} {}", records.variant().unit(count)))
            }
        }
    }
}
