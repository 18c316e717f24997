//! Response parsing: coerce free-form model output into a quiz.
//!
//! The model is asked for a bare JSON array but routinely wraps it in prose
//! or a ```json fence. Parsing never fails; anything unusable degrades to an
//! empty list. The strategy, in order:
//!
//! 1. Strict parse of the whole trimmed text.
//! 2. Greedy extraction: from the first `[` to the last `]` across lines.
//!    This is the long-standing behaviour and is kept for compatibility. It
//!    breaks when prose after the array contains a `]`.
//!
//! Items that decode but violate the quiz contract (not exactly five options,
//! or an answer index outside them) are dropped individually.

use crate::model::QuizItem;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

static RE_JSON_ARRAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*\]").unwrap());

/// Locate the first `[` … last `]` substring of `text`, if any.
pub fn extract_json_array(text: &str) -> Option<&str> {
    RE_JSON_ARRAY.find(text).map(|m| m.as_str())
}

/// Parse raw model output into well-formed quiz items. Never fails.
pub fn parse_quiz_array(raw: &str) -> Vec<QuizItem> {
    let trimmed = raw.trim();

    let values = match serde_json::from_str::<Vec<Value>>(trimmed) {
        Ok(values) => values,
        Err(_) => match extract_json_array(trimmed) {
            Some(candidate) => match serde_json::from_str::<Vec<Value>>(candidate) {
                Ok(values) => values,
                Err(e) => {
                    warn!("Quiz output is not a valid JSON array: {}", e);
                    return Vec::new();
                }
            },
            None => {
                warn!("Quiz output contains no JSON array");
                return Vec::new();
            }
        },
    };

    let total = values.len();
    let items: Vec<QuizItem> = values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match serde_json::from_value::<QuizItem>(value) {
            Ok(item) if item.is_well_formed() => Some(item),
            Ok(item) => {
                warn!(
                    "Dropping quiz item {}: {} options, answerIndex {}",
                    idx + 1,
                    item.options.len(),
                    item.answer_index
                );
                None
            }
            Err(e) => {
                warn!("Dropping quiz item {}: {}", idx + 1, e);
                None
            }
        })
        .collect();

    debug!("Parsed {}/{} quiz items", items.len(), total);
    items
}

/// Normalise a summary response: surrounding whitespace removed, nothing else.
pub fn clean_summary(raw: &str) -> String {
    raw.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_json(q: &str, answer: i64) -> String {
        format!(
            r#"{{"question": "{q}", "options": ["a", "b", "c", "d", "e"], "answerIndex": {answer}, "explanation": "because"}}"#
        )
    }

    #[test]
    fn bare_array_parses() {
        let raw = format!("[{}, {}]", item_json("Q1", 0), item_json("Q2", 4));
        let items = parse_quiz_array(&raw);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].question, "Q1");
        assert_eq!(items[1].answer_index, 4);
    }

    #[test]
    fn array_surrounded_by_prose_is_extracted() {
        let raw = format!(
            "Here is your quiz:\n[{}]\nGood luck with the exam!",
            item_json("What is a semaphore?", 2)
        );
        let items = parse_quiz_array(&raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].answer_index, 2);
    }

    #[test]
    fn fenced_json_is_extracted() {
        let raw = format!("```json\n[\n  {}\n]\n```", item_json("Q", 1));
        assert_eq!(parse_quiz_array(&raw).len(), 1);
    }

    #[test]
    fn no_brackets_yields_empty() {
        assert!(parse_quiz_array("I could not generate a quiz.").is_empty());
        assert!(parse_quiz_array("").is_empty());
    }

    #[test]
    fn trailing_comma_yields_empty_not_partial() {
        let raw = format!("[{}, {},]", item_json("Q1", 0), item_json("Q2", 1));
        assert!(parse_quiz_array(&raw).is_empty());
    }

    #[test]
    fn bracket_in_trailing_prose_defeats_greedy_match() {
        let raw = format!("[{}]\nSee [1] for details.", item_json("Q", 0));
        assert!(parse_quiz_array(&raw).is_empty());
    }

    #[test]
    fn bracket_inside_string_survives_strict_parse() {
        let raw = r#"[{"question": "What does a[i] return?", "options": ["x]", "y", "z", "w", "v"], "answerIndex": 0, "explanation": "indexing"}]"#;
        let items = parse_quiz_array(raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].options[0], "x]");
    }

    #[test]
    fn malformed_items_are_dropped_individually() {
        let four_options = r#"{"question": "Q", "options": ["a","b","c","d"], "answerIndex": 0, "explanation": "e"}"#;
        let out_of_range = item_json("Q", 5);
        let negative = item_json("Q", -1);
        let missing_fields = r#"{"question": "Q"}"#;
        let good = item_json("keep me", 3);
        let raw = format!("[{four_options}, {out_of_range}, {negative}, {missing_fields}, {good}]");
        let items = parse_quiz_array(&raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].question, "keep me");
    }

    #[test]
    fn object_instead_of_array_yields_empty() {
        assert!(parse_quiz_array(&item_json("Q", 0)).is_empty());
    }

    #[test]
    fn quiz_survives_serialise_then_parse() {
        let original = vec![
            QuizItem {
                question: "Which normal form requires atomic values?".into(),
                options: ["1NF", "2NF", "3NF", "BCNF", "none"]
                    .map(String::from)
                    .to_vec(),
                answer_index: 0,
                explanation: "1NF forbids repeating groups.".into(),
            },
            QuizItem {
                question: "What is printed?\n```python\nprint(2 ** 3)\n```".into(),
                options: ["6", "8", "9", "5", "error"].map(String::from).to_vec(),
                answer_index: 1,
                explanation: "$2^3 = 8$".into(),
            },
        ];
        let json = serde_json::to_string_pretty(&original).unwrap();
        assert_eq!(parse_quiz_array(&json), original);
    }

    #[test]
    fn summary_is_trimmed_only() {
        let raw = "\n\n## Paging 핵심 요약\n\n- `TLB` caches translations\n  \n";
        assert_eq!(
            clean_summary(raw),
            "## Paging 핵심 요약\n\n- `TLB` caches translations"
        );
    }
}
