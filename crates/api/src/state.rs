/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: liftlog_db::DbPool,
}
