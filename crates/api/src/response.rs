//! Shared response envelope types for API handlers.
//!
//! All successful responses use a `{ "data": ... }` envelope. Reads that find
//! nothing serialize as `{ "data": null }` via `DataResponse<Option<T>>`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: sessions }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
