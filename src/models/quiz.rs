// src/models/quiz.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Kind of question stored in `questions.question_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum QuestionType {
    /// Multiple choice.
    #[serde(rename = "MCQ")]
    MultipleChoice,
    /// True/False.
    #[serde(rename = "TF")]
    TrueFalse,
}

impl QuestionType {
    /// Column value, matching the CHECK constraint of the table.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "MCQ",
            QuestionType::TrueFalse => "TF",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MCQ" => Ok(QuestionType::MultipleChoice),
            "TF" => Ok(QuestionType::TrueFalse),
            other => Err(format!("unknown question type '{}'", other)),
        }
    }
}

/// One row of the quiz listing, joined with its question count.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct QuizSummary {
    pub quiz_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub question_count: i64,
}

/// A quiz with all of its questions and answer options.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuizDetail {
    pub quiz_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Sorted by `order_in_quiz`.
    pub questions: Vec<QuestionDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionDetail {
    pub question_id: i64,
    pub question_text: String,
    pub question_type: QuestionType,
    /// 1-based position, unique within the quiz.
    pub order_in_quiz: i32,
    /// Sorted by `option_id`.
    pub options: Vec<OptionDetail>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct OptionDetail {
    pub option_id: i64,
    pub option_text: String,
    pub is_correct: bool,
}

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 200;

/// Query parameters for listing quizzes.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuizzesParams {
    /// Case-insensitive search over title and description.
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuizzesParams {
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    /// The search keyword, or `None` when blank.
    pub fn keyword(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_uses_column_codes() {
        assert_eq!(
            serde_json::to_string(&QuestionType::MultipleChoice).unwrap(),
            "\"MCQ\""
        );
        assert_eq!("TF".parse::<QuestionType>(), Ok(QuestionType::TrueFalse));
        assert!("Essay".parse::<QuestionType>().is_err());
    }

    #[test]
    fn list_params_are_clamped() {
        let params = ListQuizzesParams {
            q: Some("   ".to_string()),
            limit: Some(10_000),
            offset: Some(-3),
        };
        assert_eq!(params.limit(), MAX_LIST_LIMIT);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.keyword(), None);

        let defaults = ListQuizzesParams::default();
        assert_eq!(defaults.limit(), DEFAULT_LIST_LIMIT);
    }
}
