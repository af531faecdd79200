use async_graphql::Context;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::Capability,
};

/// Gate an action on a role capability.
pub fn require_capability(claims: &Claims, capability: Capability) -> AppResult<()> {
    if !claims.role.can(capability) {
        let message = match capability {
            Capability::TakeQuiz => "Admins cannot take quizzes",
        };
        return Err(AppError::Forbidden(message.to_string()));
    }
    Ok(())
}

/// Ownership guard for per-user resources. A resource owned by someone else
/// is reported as missing so its existence does not leak.
pub fn require_owner(caller_id: &str, owner_id: &str, resource: &str) -> AppResult<()> {
    if caller_id != owner_id {
        return Err(AppError::NotFound(format!("{} not found", resource)));
    }
    Ok(())
}

pub fn extract_claims_from_context(ctx: &Context<'_>) -> AppResult<Claims> {
    ctx.data::<Claims>()
        .cloned()
        .map_err(|_| AppError::Unauthorized("Authentication required".to_string()))
}
