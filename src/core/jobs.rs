//! Scraping job requests and their client-side validation.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use serde::Serialize;
use thiserror::Error;

use crate::core::collection::{classify, Variant};

/// Sinta accreditation ranks offered by the scraper.
pub const SINTA_RANKS: RangeInclusive<u8> = 1..=5;

/// Sinta subject area used to filter a scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: u8,
    pub name: &'static str,
}

pub const CATEGORIES: [Category; 10] = [
    Category { id: 1, name: "Religion" },
    Category { id: 2, name: "Economy" },
    Category { id: 3, name: "Humanities" },
    Category { id: 4, name: "Health" },
    Category { id: 5, name: "Science" },
    Category { id: 6, name: "Education" },
    Category { id: 7, name: "Agriculture" },
    Category { id: 8, name: "Art" },
    Category { id: 9, name: "Social" },
    Category { id: 10, name: "Engineering" },
];

pub fn category(id: u8) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select at least one Sinta rank")]
    NoRanks,
    #[error("Max pages must be a whole number of at least 1")]
    InvalidMaxPages,
    #[error("Please enter a collection name")]
    EmptyCollectionName,
    #[error("Please enter a search query")]
    EmptyQuery,
    #[error("Please select a source journal collection")]
    NoSourceCollection,
}

/// Body of `POST /scrape/sinta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeSintaRequest {
    pub sinta_ranks: BTreeSet<u8>,
    /// Category ids, passed through to the backend filter.
    pub filter_area_codes: BTreeSet<u8>,
    pub max_pages: u32,
    pub collection_name: String,
    pub overwrite: bool,
}

impl Default for ScrapeSintaRequest {
    fn default() -> Self {
        Self {
            sinta_ranks: BTreeSet::from([1, 2]),
            filter_area_codes: BTreeSet::new(),
            max_pages: 10,
            collection_name: "sinta_scrape_001".to_string(),
            overwrite: false,
        }
    }
}

fn toggle_member(set: &mut BTreeSet<u8>, value: u8) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}

impl ScrapeSintaRequest {
    /// Flip `rank` in the selection. Ranks outside 1..=5 are ignored.
    pub fn toggle_rank(&mut self, rank: u8) -> bool {
        if !SINTA_RANKS.contains(&rank) {
            return false;
        }
        toggle_member(&mut self.sinta_ranks, rank)
    }

    /// Flip category `id`. Ids outside the catalog are ignored.
    pub fn toggle_category(&mut self, id: u8) -> bool {
        if category(id).is_none() {
            return false;
        }
        toggle_member(&mut self.filter_area_codes, id)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sinta_ranks.is_empty() {
            return Err(ValidationError::NoRanks);
        }
        if self.max_pages < 1 {
            return Err(ValidationError::InvalidMaxPages);
        }
        if self.collection_name.trim().is_empty() {
            return Err(ValidationError::EmptyCollectionName);
        }
        Ok(())
    }
}

/// Body of `POST /scrape/garuda`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchGarudaRequest {
    pub query: String,
    pub source_collection: String,
}

impl SearchGarudaRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.query.trim().is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        if self.source_collection.is_empty() || classify(&self.source_collection) != Variant::Journal
        {
            return Err(ValidationError::NoSourceCollection);
        }
        Ok(())
    }
}
