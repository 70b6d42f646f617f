//! Maps loosely-shaped scraped JSON objects into [`ReviewRecord`]s.
//!
//! Scrapers disagree on key names and number formats (`"4.5"` vs `4.5`), so
//! each field accepts a few aliases.

use serde_json::{Map, Value};

use crate::record::ReviewRecord;

/// Maps one dump entry; `None` if it is not an object or has no professor name.
///
/// The comment may be empty here; filtering happens in ingestion.
pub fn map_review(v: &Value) -> Option<ReviewRecord> {
    let obj = v.as_object()?;

    let name = pick_str(obj, &["name", "teacherName", "professor"])?
        .trim()
        .to_string();
    if name.is_empty() {
        return None;
    }

    Some(ReviewRecord {
        name,
        subject: pick_str(obj, &["subject", "department", "course"])
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        quality: pick_num(obj, &["quality", "rating", "stars"]),
        difficulty: pick_num(obj, &["difficulty"]),
        comment: pick_str(obj, &["comment", "review", "text"])
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    })
}

// ----- small helpers -----

/// Picks the first string among the given keys.
fn pick_str<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| obj.get(*k).and_then(Value::as_str))
}

/// Picks the first number (or numeric string) among the given keys.
fn pick_num(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| match obj.get(*k)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_scraper_output() {
        let r = map_review(&json!({
            "name": " Dr. Lee ",
            "subject": "Computer Science",
            "quality": "4.5",
            "difficulty": 3,
            "comment": "Great explanations"
        }))
        .unwrap();
        assert_eq!(r.name, "Dr. Lee");
        assert_eq!(r.subject.as_deref(), Some("Computer Science"));
        assert_eq!(r.quality, Some(4.5));
        assert_eq!(r.difficulty, Some(3.0));
        assert_eq!(r.comment, "Great explanations");
    }

    #[test]
    fn accepts_aliases_and_tolerates_missing_fields() {
        let r = map_review(&json!({"teacherName": "Dr. Kim", "review": "Fair"})).unwrap();
        assert_eq!(r.name, "Dr. Kim");
        assert_eq!(r.comment, "Fair");
        assert_eq!(r.quality, None);
    }

    #[test]
    fn rejects_nameless_entries() {
        assert!(map_review(&json!({"comment": "orphan"})).is_none());
        assert!(map_review(&json!({"name": "  "})).is_none());
        assert!(map_review(&json!("just a string")).is_none());
    }
}
