//! Prompt builder: fixed instruction, the question verbatim, then the reviews as JSON.

use crate::api_types::RetrievedMatch;

/// Fixed instruction framing the assistant's role.
pub const SYSTEM_INSTRUCTION: &str = "You are HunterMatch, an assistant that helps students choose professors. \
Answer the question below using the professor reviews provided as context. \
Mention professors by name, and say so plainly if the reviews do not cover the question.";

/// Marker introducing the serialized matches.
pub const CONTEXT_MARKER: &str = "Use the following as context:";

/// Builds the generation prompt.
///
/// The context block is omitted when `matches` is empty.
///
/// # Example
/// ```
/// use orchestrator::prompt::build_prompt;
/// let p = build_prompt("Who teaches algorithms well?", &[]);
/// assert!(p.contains("Who teaches algorithms well?"));
/// assert!(!p.contains("Use the following as context:"));
/// ```
pub fn build_prompt(question: &str, matches: &[RetrievedMatch]) -> String {
    let mut out = String::with_capacity(SYSTEM_INSTRUCTION.len() + question.len() + 256);
    out.push_str(SYSTEM_INSTRUCTION);
    out.push_str("\n\n");
    out.push_str(question);

    if !matches.is_empty() {
        // Vec<RetrievedMatch> of plain strings always serializes.
        let context = serde_json::to_string(matches).unwrap_or_else(|_| "[]".to_string());
        out.push_str("\n\n");
        out.push_str(CONTEXT_MARKER);
        out.push(' ');
        out.push_str(&context);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(comment: &str, name: &str) -> RetrievedMatch {
        RetrievedMatch {
            comment: Some(comment.into()),
            teacher_name: Some(name.into()),
        }
    }

    fn context_entries(prompt: &str) -> usize {
        prompt
            .split_once(CONTEXT_MARKER)
            .map(|(_, json)| {
                serde_json::from_str::<Vec<serde_json::Value>>(json.trim())
                    .map(|v| v.len())
                    .unwrap_or(usize::MAX)
            })
            .unwrap_or(0)
    }

    #[test]
    fn contains_every_match_and_the_question_verbatim() {
        let q = "  Who is best for \"Data Structures\"?\n";
        for n in 0..=5 {
            let matches: Vec<_> = (0..n).map(|i| m("solid", &format!("Prof {i}"))).collect();
            let p = build_prompt(q, &matches);
            assert!(p.starts_with(SYSTEM_INSTRUCTION));
            assert!(p.contains(q));
            assert_eq!(context_entries(&p), n);
        }
    }

    #[test]
    fn serializes_teacher_name_key() {
        let p = build_prompt("q", &[m("Great explanations", "Dr. Lee")]);
        assert!(p.ends_with(r#"[{"comment":"Great explanations","teacherName":"Dr. Lee"}]"#));
    }
}
