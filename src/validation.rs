// src/validation.rs

use std::fmt;

use serde_json::error::Category;

use crate::schema::{GeneratedQuestion, validate_questions};

const FENCE: &str = "```";

/// Why a model response was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    /// Not parseable as JSON at all.
    MalformedJson(String),
    /// Valid JSON, but not a valid question array.
    SchemaMismatch(String),
    Unexpected(String),
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseError::MalformedJson(msg) => write!(f, "Invalid JSON format: {}", msg),
            ResponseError::SchemaMismatch(msg) => write!(f, "Schema validation failed: {}", msg),
            ResponseError::Unexpected(msg) => {
                write!(f, "Unexpected error during validation: {}", msg)
            }
        }
    }
}

impl std::error::Error for ResponseError {}

impl From<serde_json::Error> for ResponseError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Syntax | Category::Eof => ResponseError::MalformedJson(err.to_string()),
            Category::Data => ResponseError::SchemaMismatch(err.to_string()),
            Category::Io => ResponseError::Unexpected(err.to_string()),
        }
    }
}

/// Strips whitespace and a surrounding Markdown code fence.
///
/// A leading fence line (including any language tag such as ```` ```json ````)
/// and a trailing fence line are dropped.
pub fn clean_response(text: &str) -> &str {
    let mut cleaned = text.trim();
    if cleaned.starts_with(FENCE) {
        cleaned = cleaned.split_once('\n').map_or("", |(_, rest)| rest);
    }
    if cleaned.ends_with(FENCE) {
        cleaned = cleaned.rsplit_once('\n').map_or("", |(rest, _)| rest);
    }
    cleaned.trim()
}

/// Cleans, parses and checks a model response.
pub fn validate_quiz_response(text: &str) -> Result<Vec<GeneratedQuestion>, ResponseError> {
    let questions: Vec<GeneratedQuestion> = serde_json::from_str(clean_response(text))?;
    validate_questions(&questions).map_err(ResponseError::SchemaMismatch)?;
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"[{"id": "q_topic_001", "topic": "Python", "difficulty": "Easy", "type": "MCQ", "question_text": "What is Python?", "options": [{"option_id": "a", "text": "A snake"}, {"option_id": "b", "text": "A programming language"}, {"option_id": "c", "text": "A car"}, {"option_id": "d", "text": "A fruit"}], "correct_answer_id": "b", "explanation": "Python is a programming language."}]"#;

    #[test]
    fn valid_response_passes() {
        let questions = validate_quiz_response(VALID).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options.len(), 4);
    }

    #[test]
    fn missing_fields_fail_schema() {
        let err = validate_quiz_response(r#"[{"id": "q_topic_001", "topic": "Python"}]"#)
            .unwrap_err();
        assert!(matches!(err, ResponseError::SchemaMismatch(_)));
        assert!(err.to_string().contains("Schema validation failed"));
    }

    #[test]
    fn broken_json_is_malformed() {
        for text in ["[{\"id\": ", "not json", "", "```json\n```"] {
            let err = validate_quiz_response(text).unwrap_err();
            assert!(
                err.to_string().starts_with("Invalid JSON format:"),
                "{text:?}: {err}"
            );
        }
    }

    #[test]
    fn wrong_top_level_type_is_schema_mismatch() {
        let err = validate_quiz_response(r#"{"questions": []}"#).unwrap_err();
        assert!(matches!(err, ResponseError::SchemaMismatch(_)));
    }

    #[test]
    fn unknown_difficulty_is_schema_mismatch() {
        let text = VALID.replace("\"Easy\"", "\"Trivial\"");
        let err = validate_quiz_response(&text).unwrap_err();
        assert!(matches!(err, ResponseError::SchemaMismatch(_)), "{err}");
    }

    #[test]
    fn fenced_response_is_cleaned() {
        let fenced = format!("  ```json\n{}\n```  \n", VALID);
        assert_eq!(clean_response(&fenced), VALID);
        assert!(validate_quiz_response(&fenced).is_ok());
    }

    #[test]
    fn clean_leaves_plain_text_alone() {
        assert_eq!(clean_response("  [1, 2]\n"), "[1, 2]");
        assert_eq!(clean_response("```"), "");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let text = VALID.replace("\"topic\": \"Python\"", "\"topic\": \"Python\", \"source\": \"docs\"");
        assert!(validate_quiz_response(&text).is_ok());
    }
}
