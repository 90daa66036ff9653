// src/schema.rs

//! Shape of the question array the model is asked to produce.
//!
//! Type-level rules (required fields, enums) are enforced by serde while
//! deserializing; pattern and count rules by `validator`.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::quiz::QuestionType;

/// `q_<topic letters>_<three digits>`, e.g. `q_topic_001`.
static QUESTION_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^q_[a-zA-Z]*_[0-9]{3}$").expect("question id regex"));

pub const OPTIONS_PER_QUESTION: usize = 4;
pub const MAX_OPTION_TEXT_LEN: usize = 200;

/// Option identifier: one of `a`, `b`, `c`, `d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedOption {
    pub option_id: OptionKey,
    pub text: String,
}

/// One element of the generated array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeneratedQuestion {
    #[validate(custom(function = validate_question_id))]
    pub id: String,
    pub topic: String,
    pub difficulty: Difficulty,
    /// Generated quizzes are multiple choice only.
    #[serde(rename = "type")]
    #[validate(custom(function = validate_generated_type))]
    pub question_type: QuestionType,
    pub question_text: String,
    #[validate(
        length(equal = 4, message = "exactly 4 options are required"),
        custom(function = validate_options)
    )]
    pub options: Vec<GeneratedOption>,
    pub correct_answer_id: OptionKey,
    pub explanation: String,
}

impl GeneratedQuestion {
    /// The 1-based position encoded in the id suffix (`q_topic_007` → 7).
    pub fn order_in_quiz(&self) -> Option<i32> {
        self.id.rsplit('_').next()?.parse().ok()
    }

    pub fn is_correct(&self, option: &GeneratedOption) -> bool {
        option.option_id == self.correct_answer_id
    }
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_question_id(id: &str) -> Result<(), ValidationError> {
    if !QUESTION_ID_RE.is_match(id) {
        return Err(error(
            "invalid_question_id",
            "id must match the pattern 'q_topic_XXX'",
        ));
    }
    if id.ends_with("_000") {
        return Err(error(
            "invalid_question_number",
            "question number in id must be at least 001",
        ));
    }
    Ok(())
}

fn validate_generated_type(question_type: &QuestionType) -> Result<(), ValidationError> {
    if *question_type != QuestionType::MultipleChoice {
        return Err(error("invalid_question_type", "type must be 'MCQ'"));
    }
    Ok(())
}

fn validate_options(options: &[GeneratedOption]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for opt in options {
        if !seen.insert(opt.option_id) {
            return Err(error(
                "duplicate_option_id",
                "option ids must be distinct within a question",
            ));
        }
        if opt.text.chars().count() > MAX_OPTION_TEXT_LEN {
            return Err(error(
                "option_too_long",
                "option text must be at most 200 characters",
            ));
        }
    }
    Ok(())
}

/// Checks every question and the cross-question rules.
///
/// Returns a description of the first violation, prefixed with the array
/// index of the offending element.
pub fn validate_questions(questions: &[GeneratedQuestion]) -> Result<(), String> {
    if questions.is_empty() {
        return Err("expected at least one question".to_string());
    }

    let mut orders: HashMap<i32, usize> = HashMap::new();
    for (index, question) in questions.iter().enumerate() {
        question
            .validate()
            .map_err(|e| format!("item {}: {}", index, e))?;

        // Ordering is derived from the id, so two equal suffixes would
        // collide on (quiz, order).
        if let Some(order) = question.order_in_quiz() {
            if let Some(first) = orders.insert(order, index) {
                return Err(format!(
                    "item {}: id '{}' repeats question number {} of item {}",
                    index, question.id, order, first
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_question(id: &str, correct: OptionKey) -> GeneratedQuestion {
        GeneratedQuestion {
            id: id.to_string(),
            topic: "Python".to_string(),
            difficulty: Difficulty::Easy,
            question_type: QuestionType::MultipleChoice,
            question_text: "What is Python?".to_string(),
            options: vec![
                GeneratedOption { option_id: OptionKey::A, text: "A snake".to_string() },
                GeneratedOption { option_id: OptionKey::B, text: "A programming language".to_string() },
                GeneratedOption { option_id: OptionKey::C, text: "A car".to_string() },
                GeneratedOption { option_id: OptionKey::D, text: "A fruit".to_string() },
            ],
            correct_answer_id: correct,
            explanation: "Python is a programming language.".to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_question() {
        let questions = vec![sample_question("q_topic_001", OptionKey::B)];
        assert_eq!(validate_questions(&questions), Ok(()));
    }

    #[test]
    fn order_comes_from_id_suffix() {
        assert_eq!(sample_question("q_python_012", OptionKey::A).order_in_quiz(), Some(12));
        assert_eq!(sample_question("q__003", OptionKey::A).order_in_quiz(), Some(3));
    }

    #[test]
    fn rejects_bad_ids() {
        for id in ["topic_001", "q_topic_01", "q_topic_0001", "q_py3_001", "q_topic_000"] {
            let err = validate_questions(&[sample_question(id, OptionKey::A)]).unwrap_err();
            assert!(err.starts_with("item 0:"), "{id}: {err}");
        }
    }

    #[test]
    fn rejects_wrong_option_count() {
        let mut question = sample_question("q_topic_001", OptionKey::A);
        question.options.pop();
        let err = validate_questions(&[question]).unwrap_err();
        assert!(err.contains("exactly 4 options"), "{err}");
    }

    #[test]
    fn rejects_duplicate_option_ids() {
        let mut question = sample_question("q_topic_001", OptionKey::A);
        question.options[3].option_id = OptionKey::A;
        let err = validate_questions(&[question]).unwrap_err();
        assert!(err.contains("distinct"), "{err}");
    }

    #[test]
    fn rejects_long_option_text() {
        let mut question = sample_question("q_topic_001", OptionKey::A);
        question.options[1].text = "x".repeat(MAX_OPTION_TEXT_LEN + 1);
        assert!(validate_questions(&[question]).is_err());
    }

    #[test]
    fn rejects_true_false_type() {
        let mut question = sample_question("q_topic_001", OptionKey::A);
        question.question_type = QuestionType::TrueFalse;
        let err = validate_questions(&[question]).unwrap_err();
        assert!(err.contains("MCQ"), "{err}");
    }

    #[test]
    fn rejects_repeated_question_numbers() {
        let questions = vec![
            sample_question("q_topic_001", OptionKey::A),
            sample_question("q_other_001", OptionKey::B),
        ];
        let err = validate_questions(&questions).unwrap_err();
        assert!(err.starts_with("item 1:"), "{err}");
    }

    #[test]
    fn rejects_empty_array() {
        assert!(validate_questions(&[]).is_err());
    }
}
