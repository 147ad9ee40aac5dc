//! Record models for the two collection variants.
//!
//! Documents are scraped from third-party sites and are not validated by the
//! backend, so decoding is lenient: wrong-typed fields become absent and a
//! document with the wrong shape becomes an empty record of its variant.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::core::api::ApiError;
use crate::core::collection::Variant;

/// Stored in `sinta_link` when a journal has no Sinta profile.
pub const NO_SINTA_LINK: &str = "no sinta link";
/// Stored in `garuda_link` when a journal has no Garuda profile.
pub const NO_GARUDA_LINK: &str = "no garuda link";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JournalRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, rename = "sinta", deserialize_with = "lenient_int")]
    pub sinta_level: Option<i64>,
    #[serde(default, deserialize_with = "sinta_link")]
    pub sinta_link: Option<String>,
    #[serde(default, deserialize_with = "garuda_link")]
    pub garuda_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArticleGroupRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub journal_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub results_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub sinta_level: Option<i64>,
    #[serde(default, deserialize_with = "garuda_link")]
    pub garuda_link: Option<String>,
    /// Search query that produced this group.
    #[serde(default, deserialize_with = "lenient_text")]
    pub query: Option<String>,
    #[serde(default, deserialize_with = "lenient_articles")]
    pub results: Vec<ArticleRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArticleRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_link")]
    pub download_link: Option<String>,
}

/// Ordered records of one collection, tagged by variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Records {
    Journal(Vec<JournalRecord>),
    ArticleGroup(Vec<ArticleGroupRecord>),
}

impl Records {
    /// Decode each document as the record shape of `variant`.
    pub fn from_documents(variant: Variant, documents: Vec<Value>) -> Self {
        match variant {
            Variant::Journal => Records::Journal(documents.into_iter().map(decode_or_empty).collect()),
            Variant::ArticleGroup => {
                Records::ArticleGroup(documents.into_iter().map(decode_or_empty).collect())
            }
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            Records::Journal(_) => Variant::Journal,
            Records::ArticleGroup(_) => Variant::ArticleGroup,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Records::Journal(records) => records.len(),
            Records::ArticleGroup(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse an export body into its top-level documents.
pub fn parse_documents(body: &[u8]) -> Result<Vec<Value>, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Array(documents)) => Ok(documents),
        Ok(other) => Err(ApiError::Decode(format!(
            "expected a JSON array of documents, got {}",
            kind_of(&other)
        ))),
        Err(e) => Err(ApiError::Decode(e.to_string())),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn decode_or_empty<T: for<'de> Deserialize<'de> + Default>(document: Value) -> T {
    // Arrays would otherwise bind positionally to struct fields.
    if !document.is_object() {
        return T::default();
    }
    serde_json::from_value(document).unwrap_or_default()
}

fn int_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn link_of(value: &Value, sentinels: &[&str]) -> Option<String> {
    let Value::String(s) = value else {
        return None;
    };
    let trimmed = s.trim();
    if trimmed.is_empty() || sentinels.iter().any(|s| trimmed.eq_ignore_ascii_case(s)) {
        return None;
    }
    Some(trimmed.to_string())
}

fn lenient_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(int_of))
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(text_of))
}

fn lenient_link<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?
        .as_ref()
        .and_then(|v| link_of(v, &[NO_SINTA_LINK, NO_GARUDA_LINK])))
}

fn sinta_link<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?
        .as_ref()
        .and_then(|v| link_of(v, &[NO_SINTA_LINK])))
}

fn garuda_link<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?
        .as_ref()
        .and_then(|v| link_of(v, &[NO_GARUDA_LINK])))
}

fn lenient_articles<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<ArticleRecord>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Array(items)) => items.into_iter().map(decode_or_empty).collect(),
        _ => Vec::new(),
    })
}
