/// Submission lifecycle of a job form.
///
/// `Idle → Submitting → {Succeeded, Failed}`. A finished state can submit
/// again; `Submitting` cannot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    /// Backend acknowledgement, shown verbatim.
    Succeeded(String),
    /// Error text, shown verbatim.
    Failed(String),
}

impl SubmitState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SubmitState::Submitting)
    }

    /// Enter `Submitting`. Returns false while a submission is in flight.
    pub fn begin(&mut self) -> bool {
        if self.is_in_flight() {
            return false;
        }
        *self = SubmitState::Submitting;
        true
    }

    /// Record the outcome of the in-flight submission. Ignored otherwise.
    pub fn finish(&mut self, outcome: Result<String, String>) {
        if !self.is_in_flight() {
            log::debug!("Dropping submit outcome with no submission in flight");
            return;
        }
        *self = match outcome {
            Ok(message) => SubmitState::Succeeded(message),
            Err(error) => SubmitState::Failed(error),
        };
    }

    /// Banner text and whether it reports success.
    pub fn banner(&self) -> Option<(bool, &str)> {
        match self {
            SubmitState::Succeeded(message) => Some((true, message)),
            SubmitState::Failed(error) => Some((false, error)),
            _ => None,
        }
    }
}
