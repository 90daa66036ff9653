// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppError,
    models::quiz::{ListQuizzesParams, QuizDetail, QuizSummary},
    prompt::build_quiz_prompt,
    state::AppState,
    store::{QuizPlan, QuizStore},
    utils::dump::dump_raw_response,
    validation::validate_quiz_response,
};

/// Body of a generation request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenerateQuizRequest {
    /// Topic the quiz should cover, in plain language.
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters."))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateQuizResponse {
    pub success: bool,
    pub quiz_id: i64,
    pub title: String,
    pub question_count: usize,
    /// The model's raw text, as received.
    pub response: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Generates a quiz from a description and stores it.
///
/// * Builds the prompt and sends it to the generator.
/// * Keeps a debug copy of the raw answer.
/// * Validates the answer against the question schema.
/// * Saves quiz, questions and options in one transaction.
#[utoipa::path(
    post,
    path = "/query-gemini",
    tag = "quiz",
    request_body = GenerateQuizRequest,
    responses(
        (status = 200, description = "Quiz generated and saved", body = GenerateQuizResponse),
        (status = 400, description = "Missing or invalid description", body = ErrorResponse),
        (status = 405, description = "Not a POST", body = ErrorResponse),
        (status = 500, description = "Generator, validation or storage failure", body = ErrorResponse)
    )
)]
pub async fn query_gemini(
    State(state): State<AppState>,
    payload: Result<Json<GenerateQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let description = payload.description.as_deref().unwrap_or_default().trim();
    if description.is_empty() {
        return Err(AppError::BadRequest("Please enter a description.".to_string()));
    }
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let generator = state.generator.as_ref().ok_or_else(|| {
        AppError::NotConfigured("Gemini API is not configured correctly.".to_string())
    })?;

    let prompt = build_quiz_prompt(description);
    tracing::info!(description_len = description.len(), "Sending quiz prompt to Gemini");
    let raw = generator.generate(&prompt).await?;

    dump_raw_response(state.config.response_dump_path.as_deref(), &raw).await;

    let questions = validate_quiz_response(&raw)?;
    let plan = QuizPlan::from_questions(description, &questions);
    let quiz_id = state.store.create_quiz(&plan).await?;

    Ok(Json(GenerateQuizResponse {
        success: true,
        quiz_id,
        title: plan.title,
        question_count: plan.questions.len(),
        response: raw,
    }))
}

/// Answers every method other than POST on the generation route.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Lists stored quizzes, newest first, optionally filtered by keyword.
#[utoipa::path(
    get,
    path = "/api/quizzes",
    tag = "quiz",
    params(ListQuizzesParams),
    responses((status = 200, description = "Stored quizzes", body = [QuizSummary]))
)]
pub async fn list_quizzes(
    State(store): State<Arc<dyn QuizStore>>,
    Query(params): Query<ListQuizzesParams>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = store.list_quizzes(&params).await?;
    Ok(Json(quizzes))
}

/// Retrieves a quiz with its questions and answer options.
#[utoipa::path(
    get,
    path = "/api/quizzes/{id}",
    tag = "quiz",
    params(("id" = i64, Path, description = "Quiz id")),
    responses(
        (status = 200, description = "The quiz", body = QuizDetail),
        (status = 404, description = "No such quiz", body = ErrorResponse)
    )
)]
pub async fn get_quiz(
    State(store): State<Arc<dyn QuizStore>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = store
        .get_quiz(id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(quiz))
}

/// Deletes a quiz together with its questions and options.
#[utoipa::path(
    delete,
    path = "/api/quizzes/{id}",
    tag = "quiz",
    params(("id" = i64, Path, description = "Quiz id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such quiz", body = ErrorResponse)
    )
)]
pub async fn delete_quiz(
    State(store): State<Arc<dyn QuizStore>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !store.delete_quiz(id).await? {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
