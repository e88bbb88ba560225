//! Route definitions for the `/exercises` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::exercise;
use crate::state::AppState;

/// Routes mounted at `/exercises`.
///
/// ```text
/// GET    /                    -> list
/// POST   /                    -> create (find-or-create by name)
/// GET    /{id}/last-session   -> last_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(exercise::list).post(exercise::create))
        .route("/{id}/last-session", get(exercise::last_session))
}
