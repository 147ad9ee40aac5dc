use crate::core::collection::{classify, Variant};

pub const LIST_FAILED: &str = "Failed to load collections. Is the backend running?";

/// Collection names split by variant, each in server order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub journals: Vec<String>,
    pub article_groups: Vec<String>,
}

impl Partition {
    pub fn of(&self, variant: Variant) -> &[String] {
        match variant {
            Variant::Journal => &self.journals,
            Variant::ArticleGroup => &self.article_groups,
        }
    }

    pub fn len(&self) -> usize {
        self.journals.len() + self.article_groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn partition<S: AsRef<str>>(names: &[S]) -> Partition {
    let mut out = Partition::default();
    for name in names {
        let name = name.as_ref();
        match classify(name) {
            Variant::Journal => out.journals.push(name.to_string()),
            Variant::ArticleGroup => out.article_groups.push(name.to_string()),
        }
    }
    out
}

/// Last known collection names plus refresh status.
///
/// A failed refresh keeps the previous names and records a banner error.
#[derive(Debug, Clone, Default)]
pub struct CollectionIndex {
    names: Vec<String>,
    partition: Partition,
    error: Option<String>,
    loading: bool,
    /// The in-flight refresh started before a change and must be re-run.
    stale: bool,
}

impl CollectionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a refresh in flight. Returns false if one already is.
    pub fn begin_refresh(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        true
    }

    /// Mark a refresh that must observe a change made just now.
    ///
    /// If a refresh is already in flight its answer may predate the change,
    /// so it is marked stale and [`apply`](Self::apply) asks for another.
    /// Returns true when the caller should issue the request now.
    pub fn begin_refresh_after_change(&mut self) -> bool {
        if self.loading {
            self.stale = true;
            return false;
        }
        self.loading = true;
        true
    }

    /// Settle the in-flight refresh.
    ///
    /// Returns true when the result was stale and discarded; the index stays
    /// loading and the caller must issue a new request.
    pub fn apply(&mut self, result: Result<Vec<String>, String>) -> bool {
        if self.stale {
            self.stale = false;
            return true;
        }
        self.loading = false;
        match result {
            Ok(names) => {
                self.partition = partition(&names);
                self.names = names;
                self.error = None;
            }
            Err(cause) => {
                log::warn!("Collection list refresh failed: {cause}");
                self.error = Some(LIST_FAILED.to_string());
            }
        }
        false
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Empty-section hints apply only once a refresh settled without error.
    pub fn shows_empty_hint(&self, variant: Variant) -> bool {
        !self.loading && self.error.is_none() && self.partition.of(variant).is_empty()
    }

    /// Names in display order: journals, then article groups.
    pub fn flattened(&self) -> impl Iterator<Item = (&str, Variant)> {
        let journals = self.partition.journals.iter().map(|n| (n.as_str(), Variant::Journal));
        let groups = self
            .partition
            .article_groups
            .iter()
            .map(|n| (n.as_str(), Variant::ArticleGroup));
        journals.chain(groups)
    }
}
