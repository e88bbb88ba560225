pub mod exercises;
pub mod health;
pub mod sessions;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /exercises      exercise registry and last-session lookup
/// /templates      workout templates and their line items
/// /sessions       logged workout sessions
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/exercises", exercises::router())
        .nest("/templates", templates::router())
        .nest("/sessions", sessions::router())
}
