use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/plan", get(handlers::get_plan))
        .route("/api/days/:day", get(handlers::get_day))
        .route("/api/outcome", post(handlers::record_outcome))
        .route("/api/feedback", get(handlers::get_feedback))
        .route("/api/timers", get(handlers::list_timers))
        .route("/api/timers/toggle", post(handlers::toggle_timer))
        .route("/api/timers/reset", post(handlers::reset_timer))
        .route("/api/timers/completions", post(handlers::take_completions))
        .with_state(state)
}
