//! Response bodies that are not records
//!
//! Records themselves are returned as stored, for example:
//!
//! ```json
//! {
//!   "id": "01890a5d-ac96-774b-bcce-b302099a8057",
//!   "name": "grapefruit",
//!   "color": "pink",
//!   "readyToEat": true,
//!   "createdAt": "2024-05-01T10:00:00.000Z",
//!   "updatedAt": "2024-05-01T10:00:00.000Z"
//! }
//! ```

use serde::Serialize;
use std::collections::BTreeMap;

use crate::observability::MetricsSnapshot;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
    /// Resource name -> mount path
    pub resources: BTreeMap<String, String>,
    pub metrics: MetricsSnapshot,
}
