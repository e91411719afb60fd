//! Structured review feedback and model-output parsing.

use serde::{Deserialize, Serialize};

use crate::error::{CritiqError, Result};

/// Structured feedback for one piece of code.
///
/// All three fields are required; a model response missing any of them is a
/// format error, never a partially filled value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewFeedback {
    /// Brief overview of the code quality.
    pub summary: String,
    /// Specific, actionable improvement suggestions.
    pub improvements: Vec<String>,
    /// Language-relevant best practices worth adopting.
    pub best_practices: Vec<String>,
}

/// Parse the model's raw text into [`ReviewFeedback`].
///
/// The prompt demands a bare JSON object, so the trimmed text is tried as-is
/// first. Models still routinely wrap JSON in a markdown fence, so a fenced
/// block (```json or untagged) is tried as a fallback before giving up.
///
/// # Errors
///
/// Returns [`CritiqError::UpstreamFormat`] when no strategy yields a JSON
/// object with all three fields.
pub fn parse_feedback(raw: &str) -> Result<ReviewFeedback> {
    let trimmed = raw.trim();

    if let Ok(parsed) = serde_json::from_str::<ReviewFeedback>(trimmed) {
        return Ok(parsed);
    }

    if let Some(block) = extract_fenced_block(trimmed) {
        if let Ok(parsed) = serde_json::from_str::<ReviewFeedback>(&block) {
            return Ok(parsed);
        }
    }

    Err(CritiqError::UpstreamFormat(
        "model output is not a valid feedback JSON object".to_string(),
    ))
}

/// Extract the first markdown code fence whose tag is `json` or empty.
///
/// Fences tagged with another language (```python etc.) are skipped whole,
/// opener through closer, so a code sample inside prose cannot shadow the
/// actual payload.
fn extract_fenced_block(content: &str) -> Option<String> {
    let fence = "```";
    let mut search = content;

    loop {
        let start = search.find(fence)?;
        let after_open = &search[start + fence.len()..];

        let line_end = after_open.find('\n')?;
        let tag = after_open[..line_end].trim();
        let body = &after_open[line_end + 1..];
        let end = body.find(fence)?;

        if tag.is_empty() || tag.eq_ignore_ascii_case("json") {
            return Some(body[..end].trim().to_string());
        }

        search = &body[end + fence.len()..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "summary": "Clean and readable",
        "improvements": ["handle the empty case"],
        "best_practices": ["type hints"]
    }"#;

    #[test]
    fn test_parse_bare_json_object() {
        let feedback = parse_feedback(VALID).unwrap();
        assert_eq!(feedback.summary, "Clean and readable");
        assert_eq!(feedback.improvements, vec!["handle the empty case"]);
        assert_eq!(feedback.best_practices, vec!["type hints"]);
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        let padded = format!("\n\n  {VALID}  \n");
        assert!(parse_feedback(&padded).is_ok());
    }

    #[test]
    fn test_parse_json_fence() {
        let wrapped = format!("Here is the review:\n```json\n{VALID}\n```\n");
        let feedback = parse_feedback(&wrapped).unwrap();
        assert_eq!(feedback.summary, "Clean and readable");
    }

    #[test]
    fn test_parse_untagged_fence() {
        let wrapped = format!("```\n{VALID}\n```");
        assert!(parse_feedback(&wrapped).is_ok());
    }

    #[test]
    fn test_parse_skips_non_json_fence() {
        let wrapped = format!("```python\nprint('hi')\n```\n```json\n{VALID}\n```");
        assert!(parse_feedback(&wrapped).is_ok());
    }

    #[test]
    fn test_parse_rejects_prose() {
        let err = parse_feedback("This code looks mostly fine to me.").unwrap_err();
        assert!(matches!(err, CritiqError::UpstreamFormat(_)));
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let partial = r#"{"summary": "ok", "improvements": []}"#;
        let err = parse_feedback(partial).unwrap_err();
        assert!(
            matches!(err, CritiqError::UpstreamFormat(_)),
            "missing best_practices must not produce a partial value"
        );
    }

    #[test]
    fn test_parse_rejects_wrong_field_types() {
        let wrong = r#"{"summary": "ok", "improvements": "not a list", "best_practices": []}"#;
        assert!(parse_feedback(wrong).is_err());
    }

    #[test]
    fn test_parse_rejects_truncated_json() {
        let truncated = r#"{"summary": "ok", "improvements": ["one","#;
        assert!(parse_feedback(truncated).is_err());
    }

    #[test]
    fn test_feedback_serializes_with_expected_keys() {
        let feedback = parse_feedback(VALID).unwrap();
        let value = serde_json::to_value(&feedback).unwrap();
        assert!(value.get("summary").is_some());
        assert!(value.get("improvements").is_some());
        assert!(value.get("best_practices").is_some());
    }
}
