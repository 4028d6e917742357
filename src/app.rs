use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/steps", post(handlers::submit_steps))
        .route("/history", get(handlers::history))
        .route("/history/:id/edit", post(handlers::start_edit))
        .route("/history/:id/delete", post(handlers::delete_entry))
        .route("/edit/save", post(handlers::save_edit))
        .route("/edit/cancel", post(handlers::cancel_edit))
        .route("/calendar", get(handlers::calendar))
        .route("/progress", get(handlers::progress))
        .route("/api/entries", get(handlers::list_entries))
        .route("/api/entries/today", post(handlers::upsert_today))
        .route(
            "/api/entries/:id",
            put(handlers::update_entry).delete(handlers::remove_entry),
        )
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/calendar", get(handlers::get_calendar))
        .with_state(state)
}
