//! Route definitions for the `/sessions` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::workout_session;
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> log
/// GET    /{id}    -> get_by_id
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(workout_session::list).post(workout_session::log))
        .route(
            "/{id}",
            get(workout_session::get_by_id).delete(workout_session::delete),
        )
}
