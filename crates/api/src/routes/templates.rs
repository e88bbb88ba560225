//! Route definitions for the `/templates` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::workout_template;
use crate::state::AppState;

/// Routes mounted at `/templates`.
///
/// ```text
/// GET    /        -> list (?include_inactive=)
/// POST   /        -> create
/// POST   /seed    -> seed
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update (reconciliation)
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(workout_template::list).post(workout_template::create),
        )
        .route("/seed", post(workout_template::seed))
        .route(
            "/{id}",
            get(workout_template::get_by_id)
                .put(workout_template::update)
                .delete(workout_template::delete),
        )
}
