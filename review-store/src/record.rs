//! Core data models used by the library.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Placeholder the review scraper writes when a rating has no text.
pub const NO_COMMENT: &str = "No comment";

/// One scraped professor review.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Professor name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f64>,
    /// Free-text review; this is what gets embedded.
    pub comment: String,
}

impl ReviewRecord {
    /// Deterministic id: UUIDv5 over `name` and `comment`.
    ///
    /// Re-ingesting the same dump overwrites instead of duplicating.
    pub fn stable_id(&self) -> String {
        let key = format!("{}\u{1f}{}", self.name.trim(), self.comment.trim());
        Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes()).to_string()
    }

    /// Flat metadata stored next to the vector (`name`, `comment`, ...).
    pub fn metadata(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(m)) => m,
            _ => Map::new(),
        }
    }

    /// `true` if the comment carries no usable text.
    pub fn has_comment(&self) -> bool {
        let c = self.comment.trim();
        !c.is_empty() && c != NO_COMMENT
    }
}

/// A vector with its id and metadata, ready for upsert.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VectorPoint {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: Map<String, Value>,
}

/// One similarity-search hit, in backend order (descending score).
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ScoredMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Summary of the index contents.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct IndexStats {
    pub backend: &'static str,
    pub index: String,
    pub dimension: Option<u64>,
    pub total_vectors: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(name: &str, comment: &str) -> ReviewRecord {
        ReviewRecord {
            name: name.into(),
            subject: Some("CSCI".into()),
            quality: Some(4.5),
            difficulty: None,
            comment: comment.into(),
        }
    }

    #[test]
    fn stable_id_depends_on_name_and_comment_only() {
        let a = review("Dr. Lee", "Great explanations");
        let mut b = a.clone();
        b.quality = Some(1.0);
        assert_eq!(a.stable_id(), b.stable_id());
        assert_ne!(a.stable_id(), review("Dr. Kim", "Great explanations").stable_id());
        assert!(Uuid::parse_str(&a.stable_id()).is_ok());
    }

    #[test]
    fn metadata_uses_plain_keys_and_skips_missing_fields() {
        let m = review("Dr. Lee", "Great explanations").metadata();
        assert_eq!(m.get("name").and_then(Value::as_str), Some("Dr. Lee"));
        assert_eq!(
            m.get("comment").and_then(Value::as_str),
            Some("Great explanations")
        );
        assert!(!m.contains_key("difficulty"));
    }

    #[test]
    fn placeholder_comment_is_not_usable() {
        assert!(!review("Dr. Lee", "  No comment ").has_comment());
        assert!(!review("Dr. Lee", "").has_comment());
        assert!(review("Dr. Lee", "ok").has_comment());
    }
}
