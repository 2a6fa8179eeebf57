//! Keyfob data models and API request/response types.
//!
//! A keyfob ("druppel") has two identifiers: the registry id assigned on
//! creation, and the physical key code encoded on the badge itself.

use serde::{Deserialize, Serialize};

/// A keyfob row joined with the attached user's display fields.
///
/// # Database Table
///
/// Maps to `keyfobs LEFT JOIN users`. The user columns are `None` when the
/// fob is unattached or the user row is missing.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct Keyfob {
    /// Registry identifier
    pub keyfob_id: i64,

    /// Physical badge code
    pub keyfob_key: i64,

    /// User currently holding this fob
    pub attached_user_id: Option<i64>,

    /// Disabled fobs never grant access and are hidden from listings
    pub disabled: bool,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub affix: Option<String>,
    pub role: Option<String>,
}

/// Request body for `PUT /api/druppel/init-keyfob`.
///
/// ```json
/// { "keyfob_key": 7235 }
/// ```
#[derive(Debug, Deserialize)]
pub struct InitKeyfobRequest {
    pub keyfob_key: i64,
}

/// Request body for `PUT /api/druppel/attach-user`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachUserRequest {
    pub user_id: i64,
    pub keyfob_id: i64,
}

/// Request body for endpoints that only name a keyfob
/// (`detach-user`, `disable-keyfob`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyfobRefRequest {
    pub keyfob_id: i64,
}

/// Request body for `PUT /api/druppel/set-keyfob-key`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetKeyfobKeyRequest {
    pub keyfob_id: i64,
    pub new_key: i64,
}

/// Result body for keyfob mutations: the id of the keyfob that was created
/// or changed.
#[derive(Debug, Serialize)]
pub struct KeyfobResult {
    pub keyfob_id: i64,
}

/// Response body for `GET /api/druppel/keyfobs`.
#[derive(Debug, Serialize)]
pub struct KeyfobsResponse {
    pub keyfobs: Vec<Keyfob>,
}
