use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/foods/search", get(handlers::search_foods))
        .route("/api/challenges/today", get(handlers::get_today))
        .route("/api/challenges/history", get(handlers::get_history))
        .route("/api/challenges/stats", get(handlers::get_stats))
        .route("/api/challenges/:id/complete", post(handlers::complete))
        .route("/api/challenges/:id/uncomplete", post(handlers::uncomplete))
        .with_state(state)
}
