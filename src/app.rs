use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/report", get(handlers::get_report))
        .route("/api/records", get(handlers::get_records))
        .with_state(state)
}
