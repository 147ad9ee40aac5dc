//! Password-gated collection deletion.
//!
//! `Closed → PromptOpen → Submitting → Closed`. The typed password moves into
//! the [`DeletionRequest`] at submission and the request is consumed by the
//! gateway, so no state holds the credential once the call is made.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::core::api::ApiError;

pub const DELETED: &str = "Collection deleted successfully!";
pub const INCORRECT_PASSWORD: &str = "Incorrect password. Deletion denied.";

/// Opaque deletion credential. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl Serialize for Credential {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Body of `DELETE /collections/{name}`.
#[derive(Debug, Clone, Serialize)]
pub struct DeletionRequest {
    pub collection_name: String,
    pub password: Credential,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeletionPhase {
    #[default]
    Closed,
    PromptOpen {
        target: String,
    },
    Submitting {
        target: String,
    },
}

/// Terminal result of one deletion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted { target: String },
    IncorrectPassword { target: String },
    Failed { target: String, message: String },
}

impl DeletionOutcome {
    pub fn target(&self) -> &str {
        match self {
            DeletionOutcome::Deleted { target }
            | DeletionOutcome::IncorrectPassword { target }
            | DeletionOutcome::Failed { target, .. } => target,
        }
    }

    /// Only a confirmed delete re-fetches the list.
    pub fn should_refresh(&self) -> bool {
        matches!(self, DeletionOutcome::Deleted { .. })
    }

    pub fn message(&self) -> String {
        match self {
            DeletionOutcome::Deleted { .. } => DELETED.to_string(),
            DeletionOutcome::IncorrectPassword { .. } => INCORRECT_PASSWORD.to_string(),
            DeletionOutcome::Failed { message, .. } => {
                format!("Failed to delete collection: {message}")
            }
        }
    }
}

/// Confirmation gate around a destructive delete.
#[derive(Default)]
pub struct DeletionFlow {
    phase: DeletionPhase,
    password: String,
}

impl fmt::Debug for DeletionFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeletionFlow")
            .field("phase", &self.phase)
            .field("password_len", &self.password.chars().count())
            .finish()
    }
}

impl DeletionFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &DeletionPhase {
        &self.phase
    }

    pub fn target(&self) -> Option<&str> {
        match &self.phase {
            DeletionPhase::Closed => None,
            DeletionPhase::PromptOpen { target } | DeletionPhase::Submitting { target } => {
                Some(target)
            }
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.phase, DeletionPhase::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, DeletionPhase::Submitting { .. })
    }

    /// Open the prompt for `target`. Ignored for an empty name or while a
    /// deletion is already open.
    pub fn open(&mut self, target: &str) -> bool {
        if target.is_empty() || self.is_open() {
            return false;
        }
        self.password.clear();
        self.phase = DeletionPhase::PromptOpen {
            target: target.to_string(),
        };
        true
    }

    /// Dismiss the prompt without submitting.
    pub fn cancel(&mut self) {
        if matches!(self.phase, DeletionPhase::PromptOpen { .. }) {
            self.password.clear();
            self.phase = DeletionPhase::Closed;
        }
    }

    pub fn push_char(&mut self, c: char) {
        if matches!(self.phase, DeletionPhase::PromptOpen { .. }) {
            self.password.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if matches!(self.phase, DeletionPhase::PromptOpen { .. }) {
            self.password.pop();
        }
    }

    /// Number of typed characters, for the masked field.
    pub fn password_len(&self) -> usize {
        self.password.chars().count()
    }

    pub fn can_submit(&self) -> bool {
        matches!(self.phase, DeletionPhase::PromptOpen { .. }) && !self.password.is_empty()
    }

    /// Move the password into a request and enter `Submitting`.
    pub fn submit(&mut self) -> Option<DeletionRequest> {
        if !self.can_submit() {
            return None;
        }
        let DeletionPhase::PromptOpen { target } = std::mem::take(&mut self.phase) else {
            return None;
        };
        let password = Credential::new(std::mem::take(&mut self.password));
        self.phase = DeletionPhase::Submitting {
            target: target.clone(),
        };
        Some(DeletionRequest {
            collection_name: target,
            password,
        })
    }

    /// Close the flow with the gateway's answer.
    pub fn resolve(&mut self, result: Result<(), ApiError>) -> Option<DeletionOutcome> {
        if !self.is_submitting() {
            return None;
        }
        let DeletionPhase::Submitting { target } = std::mem::take(&mut self.phase) else {
            return None;
        };
        self.password.clear();

        Some(match result {
            Ok(()) => DeletionOutcome::Deleted { target },
            Err(e) if e.is_forbidden() => DeletionOutcome::IncorrectPassword { target },
            Err(e) => DeletionOutcome::Failed {
                target,
                message: e.operator_message(),
            },
        })
    }
}
