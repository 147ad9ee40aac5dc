//! Display rows built from records, independent of any renderer.

use crate::core::records::{ArticleGroupRecord, ArticleRecord, JournalRecord, Records};

pub const NO_TITLE: &str = "No Title";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Link(String),
}

/// Labeled value shown when a row is expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleLine {
    /// 1-based position in the group.
    pub number: usize,
    pub title: String,
    pub download_link: Option<String>,
}

/// A link the operator can open from an expanded row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub label: String,
    pub url: String,
}

/// One collapsible row per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub index: usize,
    pub title: String,
    pub badges: Vec<String>,
    pub fields: Vec<Field>,
    pub articles: Vec<ArticleLine>,
}

impl Row {
    /// Actionable links in display order: fields first, then downloads.
    pub fn links(&self) -> Vec<LinkTarget> {
        let fields = self.fields.iter().filter_map(|field| match &field.value {
            FieldValue::Link(url) => Some(LinkTarget {
                label: field.label.to_string(),
                url: url.clone(),
            }),
            FieldValue::Text(_) => None,
        });
        let downloads = self.articles.iter().filter_map(|article| {
            article.download_link.as_ref().map(|url| LinkTarget {
                label: format!("Download #{}", article.number),
                url: url.clone(),
            })
        });
        fields.chain(downloads).collect()
    }

    pub fn field(&self, label: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|field| field.label == label)
            .map(|field| &field.value)
    }
}

fn placeholder_title(index: usize) -> String {
    format!("Journal {}", index + 1)
}

fn sinta_badge(level: i64) -> String {
    format!("Sinta {level}")
}

pub fn journal_row(index: usize, record: &JournalRecord) -> Row {
    let mut badges = Vec::new();
    let mut fields = Vec::new();

    // Level 0 means the scraper found no rank.
    if let Some(level) = record.sinta_level.filter(|&level| level != 0) {
        badges.push(sinta_badge(level));
        fields.push(Field {
            label: "Sinta Level",
            value: FieldValue::Text(sinta_badge(level)),
        });
    }
    if let Some(link) = &record.sinta_link {
        fields.push(Field {
            label: "Sinta Link",
            value: FieldValue::Link(link.clone()),
        });
    }
    if let Some(link) = &record.garuda_link {
        fields.push(Field {
            label: "Garuda Link",
            value: FieldValue::Link(link.clone()),
        });
    }

    Row {
        index,
        title: record
            .name
            .clone()
            .unwrap_or_else(|| placeholder_title(index)),
        badges,
        fields,
        articles: Vec::new(),
    }
}

pub fn article_group_row(index: usize, record: &ArticleGroupRecord) -> Row {
    let mut badges = Vec::new();
    if let Some(count) = record.results_count {
        badges.push(format!("{count} articles"));
    }
    if let Some(level) = record.sinta_level {
        badges.push(sinta_badge(level));
    }

    let mut fields = Vec::new();
    if let Some(link) = &record.garuda_link {
        fields.push(Field {
            label: "Journal Garuda Link",
            value: FieldValue::Link(link.clone()),
        });
    }
    if let Some(query) = &record.query {
        fields.push(Field {
            label: "Search Query",
            value: FieldValue::Text(query.clone()),
        });
    }

    Row {
        index,
        title: record
            .journal_name
            .clone()
            .unwrap_or_else(|| placeholder_title(index)),
        badges,
        fields,
        articles: record
            .results
            .iter()
            .enumerate()
            .map(|(i, article)| article_line(i, article))
            .collect(),
    }
}

fn article_line(position: usize, article: &ArticleRecord) -> ArticleLine {
    ArticleLine {
        number: position + 1,
        title: article
            .title
            .clone()
            .unwrap_or_else(|| NO_TITLE.to_string()),
        download_link: article.download_link.clone(),
    }
}

impl Records {
    pub fn rows(&self) -> Vec<Row> {
        match self {
            Records::Journal(records) => records
                .iter()
                .enumerate()
                .map(|(i, r)| journal_row(i, r))
                .collect(),
            Records::ArticleGroup(records) => records
                .iter()
                .enumerate()
                .map(|(i, r)| article_group_row(i, r))
                .collect(),
        }
    }
}
