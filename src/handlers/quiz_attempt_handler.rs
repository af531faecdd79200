use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{AttemptQueryParams, PaginationMetadata, QuizAttemptPage, SubmitQuizAttemptRequest},
};

/// Grade answers without a session (untimed, no progress tracking).
#[post("/quiz/{quiz_id}/attempt")]
async fn submit_quiz_attempt(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    request: web::Json<SubmitQuizAttemptRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let attempt = state
        .quiz_attempt_service
        .submit_direct(&quiz_id, &auth.0.sub, &request.answers)
        .await?;
    Ok(HttpResponse::Ok().json(attempt))
}

#[get("/my-quiz-attempts")]
async fn get_my_quiz_attempts(
    state: web::Data<AppState>,
    query: web::Query<AttemptQueryParams>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let query = query.into_inner();
    let pagination = query.pagination();
    let (items, total) = state
        .quiz_attempt_service
        .list_user_attempts(&auth.0.sub, query.quiz_id, pagination.offset(), pagination.limit())
        .await?;

    Ok(HttpResponse::Ok().json(QuizAttemptPage {
        items,
        pagination: PaginationMetadata::new(pagination.offset(), pagination.limit(), total),
    }))
}

#[get("/quiz-attempts/{id}")]
async fn get_quiz_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let attempt = state.quiz_attempt_service.get_attempt(&id, &auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(attempt))
}
