// src/store/mod.rs

pub mod plan;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::quiz::{ListQuizzesParams, QuizDetail, QuizSummary},
};

pub use plan::{PlannedOption, PlannedQuestion, QuizPlan};
pub use postgres::PgQuizStore;

/// Storage for generated quizzes.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Inserts the quiz with all of its questions and options, atomically.
    /// Returns the new quiz id.
    async fn create_quiz(&self, plan: &QuizPlan) -> Result<i64, AppError>;

    /// Newest first.
    async fn list_quizzes(&self, params: &ListQuizzesParams) -> Result<Vec<QuizSummary>, AppError>;

    async fn get_quiz(&self, quiz_id: i64) -> Result<Option<QuizDetail>, AppError>;

    /// Returns `false` when no such quiz exists.
    async fn delete_quiz(&self, quiz_id: i64) -> Result<bool, AppError>;
}
