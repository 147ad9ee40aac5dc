//! Collection variant classification.
//!
//! Collections carry no schema tag. The backend names article search output
//! `articles_<source>`, so the name alone decides how records are read.

use std::fmt;

const ARTICLE_PREFIX: &str = "articles_";

/// Record shape stored in a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Sinta journal metadata, one document per journal.
    Journal,
    /// Garuda search results, one document per source journal.
    ArticleGroup,
}

impl Variant {
    pub fn label(&self) -> &'static str {
        match self {
            Variant::Journal => "Sinta Journals",
            Variant::ArticleGroup => "Sinta Articles",
        }
    }

    /// Noun used in the detail header count line.
    pub fn unit(&self, count: usize) -> &'static str {
        match (self, count) {
            (Variant::Journal, 1) => "journal",
            (Variant::Journal, _) => "journals",
            (Variant::ArticleGroup, 1) => "document",
            (Variant::ArticleGroup, _) => "documents",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Variant::Journal => "▤",
            Variant::ArticleGroup => "≡",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a collection by name: case-insensitive `articles_` prefix means
/// [`Variant::ArticleGroup`], anything else is [`Variant::Journal`].
pub fn classify(name: &str) -> Variant {
    let is_articles = name
        .get(..ARTICLE_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(ARTICLE_PREFIX));
    if is_articles {
        Variant::ArticleGroup
    } else {
        Variant::Journal
    }
}

/// Card title: underscores become spaces and each word is capitalized.
pub fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Detail header title: underscores become spaces, casing kept.
pub fn spaced(name: &str) -> String {
    name.replace('_', " ")
}
