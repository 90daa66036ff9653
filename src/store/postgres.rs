// src/store/postgres.rs

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::{
    error::AppError,
    models::quiz::{ListQuizzesParams, OptionDetail, QuestionDetail, QuizDetail, QuizSummary},
    store::{QuizPlan, QuizStore},
};

/// `QuizStore` over the `quizzes`, `questions` and `answer_options` tables.
#[derive(Clone)]
pub struct PgQuizStore {
    pool: PgPool,
}

impl PgQuizStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Quiz row first (for its id), then all questions in one statement,
    /// then all options in one statement. One transaction.
    async fn insert_plan(&self, plan: &QuizPlan) -> Result<i64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let quiz_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO quizzes (title, description)
            VALUES ($1, $2)
            RETURNING quiz_id
            "#,
        )
        .bind(&plan.title)
        .bind(&plan.description)
        .fetch_one(&mut *tx)
        .await?;

        if plan.questions.is_empty() {
            tx.commit().await?;
            return Ok(quiz_id);
        }

        let mut question_builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO questions (quiz_id, question_text, question_type, order_in_quiz) ",
        );
        question_builder.push_values(&plan.questions, |mut row, q| {
            row.push_bind(quiz_id)
                .push_bind(q.question_text.clone())
                .push_bind(q.question_type.as_str())
                .push_bind(q.order_in_quiz);
        });
        question_builder.push(" RETURNING question_id, order_in_quiz");

        let inserted: Vec<(i64, i32)> = question_builder
            .build_query_as()
            .fetch_all(&mut *tx)
            .await?;

        // RETURNING order is not guaranteed; orders are unique per quiz.
        let ids_by_order: HashMap<i32, i64> =
            inserted.into_iter().map(|(id, order)| (order, id)).collect();

        let mut option_rows = Vec::with_capacity(plan.option_count());
        for question in &plan.questions {
            let question_id = *ids_by_order.get(&question.order_in_quiz).ok_or_else(|| {
                sqlx::Error::Protocol(format!(
                    "no inserted question for order {}",
                    question.order_in_quiz
                ))
            })?;
            option_rows.extend(question.options.iter().map(|opt| (question_id, opt)));
        }

        if !option_rows.is_empty() {
            let mut option_builder = QueryBuilder::<Postgres>::new(
                "INSERT INTO answer_options (question_id, option_text, is_correct) ",
            );
            option_builder.push_values(option_rows, |mut row, (question_id, opt)| {
                row.push_bind(question_id)
                    .push_bind(opt.option_text.clone())
                    .push_bind(opt.is_correct);
            });
            option_builder.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(quiz_id)
    }
}

#[derive(FromRow)]
struct QuizRow {
    quiz_id: i64,
    title: String,
    description: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(FromRow)]
struct QuestionRow {
    question_id: i64,
    question_text: String,
    question_type: String,
    order_in_quiz: i32,
}

#[derive(FromRow)]
struct OptionRow {
    option_id: i64,
    question_id: i64,
    option_text: String,
    is_correct: bool,
}

#[async_trait]
impl QuizStore for PgQuizStore {
    async fn create_quiz(&self, plan: &QuizPlan) -> Result<i64, AppError> {
        let quiz_id = self
            .insert_plan(plan)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        tracing::info!(
            quiz_id,
            questions = plan.questions.len(),
            options = plan.option_count(),
            "Quiz saved"
        );
        Ok(quiz_id)
    }

    async fn list_quizzes(&self, params: &ListQuizzesParams) -> Result<Vec<QuizSummary>, AppError> {
        let search_pattern = params.keyword().map(|k| format!("%{}%", k));

        let quizzes = sqlx::query_as::<_, QuizSummary>(
            r#"
            SELECT
                q.quiz_id,
                q.title,
                q.description,
                q.created_at,
                COUNT(qs.question_id) AS question_count
            FROM quizzes q
            LEFT JOIN questions qs ON qs.quiz_id = q.quiz_id
            WHERE ($1::TEXT IS NULL OR q.title ILIKE $1 OR q.description ILIKE $1)
            GROUP BY q.quiz_id
            ORDER BY q.created_at DESC, q.quiz_id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search_pattern)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list quizzes: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(quizzes)
    }

    async fn get_quiz(&self, quiz_id: i64) -> Result<Option<QuizDetail>, AppError> {
        let Some(quiz) = sqlx::query_as::<_, QuizRow>(
            "SELECT quiz_id, title, description, created_at FROM quizzes WHERE quiz_id = $1",
        )
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let questions = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT question_id, question_text, question_type, order_in_quiz
            FROM questions
            WHERE quiz_id = $1
            ORDER BY order_in_quiz
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        let question_ids: Vec<i64> = questions.iter().map(|q| q.question_id).collect();
        let options = sqlx::query_as::<_, OptionRow>(
            r#"
            SELECT option_id, question_id, option_text, is_correct
            FROM answer_options
            WHERE question_id = ANY($1)
            ORDER BY option_id
            "#,
        )
        .bind(&question_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut options_by_question: HashMap<i64, Vec<OptionDetail>> = HashMap::new();
        for opt in options {
            options_by_question
                .entry(opt.question_id)
                .or_default()
                .push(OptionDetail {
                    option_id: opt.option_id,
                    option_text: opt.option_text,
                    is_correct: opt.is_correct,
                });
        }

        let questions = questions
            .into_iter()
            .map(|q| {
                Ok(QuestionDetail {
                    question_id: q.question_id,
                    question_type: q
                        .question_type
                        .parse()
                        .map_err(AppError::InternalServerError)?,
                    question_text: q.question_text,
                    order_in_quiz: q.order_in_quiz,
                    options: options_by_question.remove(&q.question_id).unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(Some(QuizDetail {
            quiz_id: quiz.quiz_id,
            title: quiz.title,
            description: quiz.description,
            created_at: quiz.created_at,
            questions,
        }))
    }

    async fn delete_quiz(&self, quiz_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM quizzes WHERE quiz_id = $1")
            .bind(quiz_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete quiz: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }
}
