//! Public API types re-used by external crates (e.g., the HTTP API layer).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OrchestratorError;

/// Chat request payload.
///
/// `question` is kept as raw JSON so that numbers, objects, or `null` reach
/// validation instead of failing deserialization.
///
/// # Example
/// ```
/// use orchestrator::Query;
/// let q: Query = serde_json::from_str(r#"{"question": 42}"#).unwrap();
/// assert!(q.question_text().is_err());
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Query {
    #[serde(default)]
    pub question: Option<Value>,
}

impl Query {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: Some(Value::String(question.into())),
        }
    }

    /// The question text, verbatim, if it is a non-empty string.
    pub fn question_text(&self) -> Result<&str, OrchestratorError> {
        match &self.question {
            Some(Value::String(s)) if !s.is_empty() => Ok(s.as_str()),
            _ => Err(OrchestratorError::invalid_question()),
        }
    }
}

/// One retrieved review as shown to the model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RetrievedMatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "teacherName", skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
}

impl RetrievedMatch {
    /// Reads `comment` and `name` from match metadata.
    pub fn from_metadata(m: &serde_json::Map<String, Value>) -> Self {
        let text = |k: &str| m.get(k).and_then(Value::as_str).map(str::to_string);
        Self {
            comment: text("comment"),
            teacher_name: text("name"),
        }
    }
}

/// Result envelope returned to the chat UI.
///
/// Exactly one of `data` (success) or `message` (failure) is present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OrchestratorResponse {
    pub fn ok(data: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

impl From<&OrchestratorError> for OrchestratorResponse {
    fn from(e: &OrchestratorError) -> Self {
        Self::fail(e.user_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn question_must_be_a_non_empty_string() {
        let bad = [
            json!({}),
            json!({"question": null}),
            json!({"question": 42}),
            json!({"question": ["a"]}),
            json!({"question": ""}),
        ];
        for b in bad {
            let q: Query = serde_json::from_value(b.clone()).unwrap();
            let err = q.question_text().unwrap_err();
            assert!(err.to_string().contains("Invalid question"), "{b}");
        }
        let q = Query::new("  who?  ");
        assert_eq!(q.question_text().unwrap(), "  who?  ");
        let q = Query::new("   ");
        assert_eq!(q.question_text().unwrap(), "   ");
    }

    #[test]
    fn retrieved_match_uses_teacher_name_key() {
        let m = json!({"name": "Dr. Lee", "comment": "Great explanations", "quality": 5});
        let r = RetrievedMatch::from_metadata(m.as_object().unwrap());
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({"comment": "Great explanations", "teacherName": "Dr. Lee"})
        );

        let kim = json!({"name": "Dr. Kim"});
        let partial = RetrievedMatch::from_metadata(kim.as_object().unwrap());
        assert_eq!(
            serde_json::to_value(&partial).unwrap(),
            json!({"teacherName": "Dr. Kim"})
        );
    }

    #[test]
    fn response_carries_exactly_one_of_data_or_message() {
        let ok = serde_json::to_value(OrchestratorResponse::ok("hi")).unwrap();
        assert_eq!(ok, json!({"success": true, "data": "hi"}));
        let fail = serde_json::to_value(OrchestratorResponse::fail("nope")).unwrap();
        assert_eq!(fail, json!({"success": false, "message": "nope"}));
    }
}
