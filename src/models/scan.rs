//! Scan log data models and API request/response types.
//!
//! Every badge scan produces exactly one row in the `logs` table, whether
//! access was granted or denied. Rows are never updated.

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, MySql, Type,
    encode::IsNull,
    error::BoxDynError,
    mysql::{MySqlTypeInfo, MySqlValueRef},
};

/// Direction of a facility access event.
///
/// Stored as the text "in"/"out" in a VARCHAR column. The sqlx impls are
/// written by hand because the derived enum type only matches MySQL ENUM
/// columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

impl Type<MySql> for Direction {
    fn type_info() -> MySqlTypeInfo {
        <str as Type<MySql>>::type_info()
    }

    fn compatible(ty: &MySqlTypeInfo) -> bool {
        <str as Type<MySql>>::compatible(ty)
    }
}

impl<'q> Encode<'q, MySql> for Direction {
    fn encode_by_ref(
        &self,
        buf: &mut <MySql as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        <&str as Encode<'q, MySql>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> Decode<'r, MySql> for Direction {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        match <&str as Decode<'r, MySql>>::decode(value)? {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            other => Err(format!("invalid scan direction {other:?}").into()),
        }
    }
}

/// Represents a scan log record from the database.
///
/// `allowed` is a snapshot of the decision at scan time. It is not
/// recomputed if the keyfob changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct ScanLog {
    pub id: i64,
    pub keyfob_id: i64,
    pub facility_id: i64,

    /// Epoch milliseconds, assigned by the server
    pub timestamp: i64,

    pub in_out: Direction,
    pub allowed: bool,
}

/// A log row that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScanLog {
    pub keyfob_id: i64,
    pub facility_id: i64,
    pub timestamp: i64,
    pub in_out: Direction,
    pub allowed: bool,
}

/// Request body for `POST /api/druppel/scans`, sent by the badge reader.
///
/// ```json
/// { "tag_id": 42, "location_id": 3, "inout": "in" }
/// ```
///
/// There is no timestamp field: the server stamps the scan itself.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub tag_id: i64,
    pub location_id: i64,
    pub inout: Direction,
}

/// Access decision returned to the reader.
///
/// ```json
/// {
///   "message": "Access granted",
///   "state": 1,
///   "allowed": true,
///   "logResult": "Scan logged with grant"
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanDecision {
    pub message: &'static str,
    pub state: u8,
    pub allowed: bool,
    pub log_result: &'static str,
}

impl ScanDecision {
    pub fn new(allowed: bool) -> Self {
        if allowed {
            Self {
                message: "Access granted",
                state: 1,
                allowed,
                log_result: "Scan logged with grant",
            }
        } else {
            Self {
                message: "Access denied",
                state: 0,
                allowed,
                log_result: "Scan logged with denial",
            }
        }
    }
}

/// Query string for `GET /api/druppel/scans/recent`.
#[derive(Debug, Deserialize)]
pub struct RecentScansQuery {
    pub limit: Option<u32>,
}

/// Response body for scan listings.
#[derive(Debug, Serialize)]
pub struct ScansResponse {
    pub scans: Vec<ScanLog>,
}

/// Request body for `POST /api/druppel/test-logs`.
#[derive(Debug, Deserialize)]
pub struct GenerateLogsRequest {
    pub count: u32,
}

/// Result body for `test-logs`.
#[derive(Debug, Serialize)]
pub struct GenerateLogsResult {
    pub inserted: u64,
}
