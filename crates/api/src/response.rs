//! Shared response bodies for API handlers.

use serde::Serialize;
use sweep_core::types::DbId;

/// `{ "ok": true }` acknowledgement, optionally carrying the id of a
/// created row.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
}

impl OkResponse {
    pub fn new() -> Self {
        Self { ok: true, id: None }
    }

    pub fn created(id: DbId) -> Self {
        Self { ok: true, id: Some(id) }
    }
}

impl Default for OkResponse {
    fn default() -> Self {
        Self::new()
    }
}
