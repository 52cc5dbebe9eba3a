//! Detection of the clarifying-questions payload a model may embed in its reply.
//!
//! The payload has the shape `{"questions": ["...", "..."]}` and can be the whole
//! reply or sit somewhere inside prose. Locating it (a byte range) and parsing it
//! are separate steps.

use serde::Deserialize;
use std::ops::Range;

/// At most this many questions are put to the user; the rest are dropped.
pub const MAX_QUESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClarifyingQuestion {
    pub question: String,
    pub answer: String,
}

impl ClarifyingQuestion {
    pub fn new(question: impl Into<String>) -> Self {
        ClarifyingQuestion { question: question.into(), answer: String::new() }
    }

    pub fn answered(&self) -> bool {
        !self.answer.is_empty()
    }
}

#[derive(Deserialize)]
struct QuestionsPayload {
    questions: Vec<String>,
}

/// Extract clarifying questions from a model reply.
///
/// Returns `None` when no payload is found or its question list is empty.
pub fn extract_questions(response: &str) -> Option<Vec<ClarifyingQuestion>> {
    if let Ok(payload) = serde_json::from_str::<QuestionsPayload>(response.trim()) {
        if !payload.questions.is_empty() {
            log::debug!("Found questions in complete JSON response");
            return Some(into_questions(payload.questions));
        }
    }

    let Some(range) = locate_questions_payload(response) else {
        log::debug!("No questions JSON found in response");
        return None;
    };

    let candidate = &response[range];
    log::debug!("Found potential questions JSON: {candidate}");

    match serde_json::from_str::<QuestionsPayload>(candidate) {
        Ok(payload) if !payload.questions.is_empty() => Some(into_questions(payload.questions)),
        Ok(_) => {
            log::debug!("Questions array was empty");
            None
        }
        Err(e) => {
            log::warn!("Failed to parse questions JSON: {e}");
            None
        }
    }
}

fn into_questions(mut questions: Vec<String>) -> Vec<ClarifyingQuestion> {
    if questions.len() > MAX_QUESTIONS {
        log::info!("Limiting questions to {MAX_QUESTIONS} (received {})", questions.len());
        questions.truncate(MAX_QUESTIONS);
    }
    questions.into_iter().map(ClarifyingQuestion::new).collect()
}

/// Remove the embedded payload and keep the prose around it.
///
/// Text before and after are joined by a blank line; if only one side has
/// content that side is returned; if neither does the result is empty.
/// Text without a payload comes back unchanged.
pub fn strip_questions_payload(response: &str) -> String {
    let Some(range) = locate_questions_payload(response) else {
        return response.to_string();
    };

    let before = response[..range.start].trim();
    let after = response[range.end..].trim();

    match (before.is_empty(), after.is_empty()) {
        (false, false) => format!("{before}\n\n{after}"),
        (false, true) => before.to_string(),
        (true, false) => after.to_string(),
        (true, true) => String::new(),
    }
}

/// Byte range of the first object that opens with a `"questions"` key bound to
/// an array, through its matching closing brace.
pub fn locate_questions_payload(text: &str) -> Option<Range<usize>> {
    let bytes = text.as_bytes();

    for (start, _) in text.match_indices('{') {
        if !opens_with_questions_array(&bytes[start + 1..]) {
            continue;
        }
        if let Some(end) = matching_brace(bytes, start) {
            return Some(start..end + 1);
        }
    }

    None
}

/// `\s* "questions" \s* : \s* [`
fn opens_with_questions_array(rest: &[u8]) -> bool {
    const KEY: &[u8] = b"\"questions\"";

    let rest = skip_whitespace(rest);
    let Some(rest) = rest.strip_prefix(KEY) else {
        return false;
    };
    let rest = skip_whitespace(rest);
    let Some(rest) = rest.strip_prefix(b":") else {
        return false;
    };
    skip_whitespace(rest).first() == Some(&b'[')
}

fn skip_whitespace(bytes: &[u8]) -> &[u8] {
    let n = bytes.iter().take_while(|b| b.is_ascii_whitespace()).count();
    &bytes[n..]
}

/// Index of the `}` closing the `{` at `open`, counting depth and ignoring
/// braces inside string literals.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(qs: &[ClarifyingQuestion]) -> Vec<&str> {
        qs.iter().map(|q| q.question.as_str()).collect()
    }

    #[test]
    fn whole_response_payload() {
        let qs = extract_questions("  {\"questions\": [\"Why?\", \"How?\"]}\n").unwrap();
        assert_eq!(texts(&qs), vec!["Why?", "How?"]);
        assert!(qs.iter().all(|q| q.answer.is_empty() && !q.answered()));
    }

    #[test]
    fn embedded_payload_in_prose_keeps_order() {
        let response = "Before I write this up:\n{\"questions\":[\"A\",\"B\"]}\nThanks!";
        let qs = extract_questions(response).unwrap();
        assert_eq!(qs, vec![ClarifyingQuestion::new("A"), ClarifyingQuestion::new("B")]);
    }

    #[test]
    fn embedded_payload_tolerates_newlines() {
        let response = "Some context.\n{\n  \"questions\" :\n  [\n    \"What is the ticket?\"\n  ]\n}\n";
        let qs = extract_questions(response).unwrap();
        assert_eq!(texts(&qs), vec!["What is the ticket?"]);
    }

    #[test]
    fn caps_at_three_questions() {
        let response = r#"{"questions": ["1", "2", "3", "4", "5"]}"#;
        let qs = extract_questions(response).unwrap();
        assert_eq!(texts(&qs), vec!["1", "2", "3"]);
    }

    #[test]
    fn empty_array_means_no_questions() {
        assert!(extract_questions(r#"{"questions": []}"#).is_none());
        assert!(extract_questions("Prose {\"questions\": []} more prose").is_none());
    }

    #[test]
    fn plain_document_has_no_questions() {
        assert!(extract_questions("## Summary\nFixed the {thing}.\n## Testing\n").is_none());
    }

    #[test]
    fn other_first_key_is_not_a_payload() {
        assert!(locate_questions_payload(r#"{"title": "x", "questions": ["q"]}"#).is_none());
    }

    #[test]
    fn malformed_payload_is_ignored() {
        assert!(extract_questions(r#"Hmm {"questions": [1, 2]} ok"#).is_none());
    }

    #[test]
    fn locate_returns_exact_range() {
        let text = "abc {\"questions\": [\"a}b\", \"{c\"]} xyz";
        let range = locate_questions_payload(text).unwrap();
        assert_eq!(&text[range], "{\"questions\": [\"a}b\", \"{c\"]}");
    }

    #[test]
    fn locate_skips_unrelated_objects() {
        let text = "{\"a\": 1} then {\"questions\": [\"q\"]}";
        let range = locate_questions_payload(text).unwrap();
        assert_eq!(&text[range], "{\"questions\": [\"q\"]}");
    }

    #[test]
    fn unbalanced_payload_is_not_located() {
        assert!(locate_questions_payload("{\"questions\": [\"q\"]").is_none());
    }

    #[test]
    fn strip_joins_surrounding_prose() {
        let text = "## Summary\nDraft.\n\n{\"questions\":[\"A\"]}\n\n## Notes\nMore.";
        assert_eq!(strip_questions_payload(text), "## Summary\nDraft.\n\n## Notes\nMore.");
    }

    #[test]
    fn strip_keeps_the_only_non_empty_side() {
        assert_eq!(strip_questions_payload("Draft body\n{\"questions\":[\"A\"]}"), "Draft body");
        assert_eq!(strip_questions_payload("{\"questions\":[\"A\"]}\nDraft body"), "Draft body");
    }

    #[test]
    fn strip_payload_only_is_empty() {
        assert_eq!(strip_questions_payload("  {\"questions\":[\"A\"]}  "), "");
    }

    #[test]
    fn strip_without_payload_is_identity() {
        let text = "## Summary\nNothing to strip {here}.";
        assert_eq!(strip_questions_payload(text), text);
    }
}
