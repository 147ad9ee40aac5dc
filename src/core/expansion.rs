use std::collections::BTreeMap;

/// Per-row expand/collapse state keyed by record position.
///
/// Rows absent from the map are collapsed. Owned by one detail viewer and
/// reset whenever its record sequence is replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionTracker {
    rows: BTreeMap<usize, bool>,
}

impl ExpansionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip row `index` and return its new state.
    pub fn toggle(&mut self, index: usize) -> bool {
        let expanded = !self.is_expanded(index);
        self.rows.insert(index, expanded);
        expanded
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.rows.get(&index).copied().unwrap_or(false)
    }

    /// Indices currently expanded, ascending.
    pub fn expanded(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .iter()
            .filter_map(|(index, expanded)| expanded.then_some(*index))
    }

    /// Collapse everything.
    pub fn reset(&mut self) {
        self.rows.clear();
    }
}
