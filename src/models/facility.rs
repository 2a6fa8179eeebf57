//! Facility data models and API request/response types.

use serde::{Deserialize, Serialize};

/// Represents a facility record from the database.
///
/// `active` is the soft-delete flag; `broken` is the operational status and
/// is independent of it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct Facility {
    pub facility_id: i64,

    /// Free-text category, e.g. "Wasmachine" or "Zwembad"
    pub facility_type: String,

    pub capacity: i32,
    pub active: bool,
    pub broken: bool,
}

/// Request body for `PUT /api/facility/create-facility`.
///
/// ```json
/// { "facilityType": "Wasmachine", "capacity": 4 }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFacilityRequest {
    pub facility_type: String,
    pub capacity: i32,
}

/// Partial update for `PATCH /api/facility/update-facility/{id}`.
///
/// Only the supplied fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacilityUpdate {
    pub facility_type: Option<String>,
    pub capacity: Option<i32>,
    pub active: Option<bool>,
    pub broken: Option<bool>,
}

impl FacilityUpdate {
    pub fn is_empty(&self) -> bool {
        self.facility_type.is_none()
            && self.capacity.is_none()
            && self.active.is_none()
            && self.broken.is_none()
    }
}

/// Query string for `GET /api/facility/facilities`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFacilitiesQuery {
    #[serde(default = "default_active_only")]
    pub active_only: bool,
}

fn default_active_only() -> bool {
    true
}

/// Result body for facility mutations: the id of the facility that was
/// created or changed.
#[derive(Debug, Serialize)]
pub struct FacilityResult {
    pub facility_id: i64,
}

/// Response body for `GET /api/facility/facilities`.
#[derive(Debug, Serialize)]
pub struct FacilitiesResponse {
    pub facilities: Vec<Facility>,
}
