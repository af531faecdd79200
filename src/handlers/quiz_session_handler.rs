use actix_web::{get, post, put, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{require_capability, AuthenticatedUser},
    errors::AppError,
    models::{
        domain::Capability,
        dto::{SessionAckResponse, StartQuizSessionRequest, UpdateQuizSessionRequest},
    },
};

#[post("/quiz-session/start")]
async fn start_quiz_session(
    state: web::Data<AppState>,
    request: web::Json<StartQuizSessionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_capability(&auth.0, Capability::TakeQuiz)?;
    request.validate()?;

    let request = request.into_inner();
    let session = state
        .quiz_session_service
        .start(&request.quiz_id, &auth.0.sub, request.time_limit_minutes)
        .await?;
    Ok(HttpResponse::Ok().json(session))
}

#[post("/quiz-session/{id}/activate")]
async fn activate_quiz_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let session = state.quiz_session_service.activate(&id, &auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(session))
}

#[get("/quiz-session/{id}/status")]
async fn get_quiz_session_status(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let session = state.quiz_session_service.get_status(&id, &auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(session))
}

#[put("/quiz-session/{id}/update")]
async fn update_quiz_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuizSessionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let request = request.into_inner();
    let session = state
        .quiz_session_service
        .update(&id, &auth.0.sub, request.current_question_index, request.answers)
        .await?;
    Ok(HttpResponse::Ok().json(SessionAckResponse::new("Quiz session updated", &session)))
}

#[get("/quiz-session/{id}/pause")]
async fn pause_quiz_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let session = state.quiz_session_service.pause(&id, &auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(SessionAckResponse::new("Quiz session paused", &session)))
}

#[get("/quiz-session/{id}/resume")]
async fn resume_quiz_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let session = state.quiz_session_service.resume(&id, &auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(SessionAckResponse::new("Quiz session resumed", &session)))
}

#[post("/quiz-session/{id}/submit")]
async fn submit_quiz_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let attempt = state.quiz_session_service.submit(&id, &auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(attempt))
}

#[get("/my-quiz-sessions")]
async fn get_my_quiz_sessions(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let sessions = state.quiz_session_service.list_for_user(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(sessions))
}
