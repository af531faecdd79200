pub mod graphql_handler;
pub mod health_handler;
pub mod quiz_attempt_handler;
pub mod quiz_session_handler;

use actix_web::web;

use crate::auth::AuthMiddleware;

pub use graphql_handler::graphql;
pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use quiz_attempt_handler::{get_my_quiz_attempts, get_quiz_attempt, submit_quiz_attempt};
pub use quiz_session_handler::{
    activate_quiz_session, get_my_quiz_sessions, get_quiz_session_status, pause_quiz_session,
    resume_quiz_session, start_quiz_session, submit_quiz_session, update_quiz_session,
};

/// Registers every route. Health probes are public; everything else sits
/// behind bearer-token authentication.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(health_check_ready)
        .service(
            web::scope("")
                .wrap(AuthMiddleware)
                .service(start_quiz_session)
                .service(activate_quiz_session)
                .service(get_quiz_session_status)
                .service(update_quiz_session)
                .service(pause_quiz_session)
                .service(resume_quiz_session)
                .service(submit_quiz_session)
                .service(get_my_quiz_sessions)
                .service(submit_quiz_attempt)
                .service(get_my_quiz_attempts)
                .service(get_quiz_attempt)
                .service(graphql),
        );
}
