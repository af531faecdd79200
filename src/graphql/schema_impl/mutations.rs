use async_graphql::{Context, ErrorExtensions, Object, Result, ID};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{extract_claims_from_context, require_capability},
    errors::AppError,
    models::{
        domain::{Capability, QuizAttempt, QuizSession},
        dto::{StartQuizSessionRequest, SubmitQuizAttemptRequest},
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn start_quiz_session(
        &self,
        ctx: &Context<'_>,
        input: StartQuizSessionRequest,
    ) -> Result<QuizSession> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        require_capability(&claims, Capability::TakeQuiz).map_err(|e| e.extend())?;
        input
            .validate()
            .map_err(|e| AppError::from(e).extend())?;

        state
            .quiz_session_service
            .start(&input.quiz_id, &claims.sub, input.time_limit_minutes)
            .await
            .map_err(|e| e.extend())
    }

    async fn submit_quiz_session(&self, ctx: &Context<'_>, id: ID) -> Result<QuizAttempt> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        state
            .quiz_session_service
            .submit(&id, &claims.sub)
            .await
            .map_err(|e| e.extend())
    }

    async fn submit_quiz_attempt(
        &self,
        ctx: &Context<'_>,
        quiz_id: ID,
        input: SubmitQuizAttemptRequest,
    ) -> Result<QuizAttempt> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        state
            .quiz_attempt_service
            .submit_direct(&quiz_id, &claims.sub, &input.answers)
            .await
            .map_err(|e| e.extend())
    }
}
