use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use crate::{
    app_state::AppState,
    auth::extract_claims_from_context,
    models::{
        domain::QuizSession,
        dto::{PaginationMetadata, QuizAttemptPage},
    },
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn my_quiz_sessions(&self, ctx: &Context<'_>) -> Result<Vec<QuizSession>> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        state
            .quiz_session_service
            .list_for_user(&claims.sub)
            .await
            .map_err(|e| e.extend())
    }

    /// Live status of one of the caller's sessions; may expire it.
    async fn quiz_session(&self, ctx: &Context<'_>, id: ID) -> Result<QuizSession> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        state
            .quiz_session_service
            .get_status(&id, &claims.sub)
            .await
            .map_err(|e| e.extend())
    }

    async fn my_quiz_attempts(
        &self,
        ctx: &Context<'_>,
        quiz_id: Option<ID>,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> Result<QuizAttemptPage> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        let offset = offset.unwrap_or(0).max(0);
        let limit = limit.unwrap_or(20).clamp(1, 100);

        let (items, total) = state
            .quiz_attempt_service
            .list_user_attempts(&claims.sub, quiz_id.map(|id| id.to_string()), offset, limit)
            .await
            .map_err(|e| e.extend())?;

        Ok(QuizAttemptPage {
            items,
            pagination: PaginationMetadata::new(offset, limit, total),
        })
    }
}
