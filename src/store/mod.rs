//! Persistence seams.
//!
//! Services talk to the database through these traits. Production uses
//! [`MySqlStore`]; tests use an in-memory implementation.
//!
//! Mutations report whether a row *matched*, not whether a value changed, so
//! callers can tell "no such row" (404) apart from a failed query (500).

use async_trait::async_trait;

use crate::models::{
    facility::{Facility, FacilityUpdate},
    keyfob::Keyfob,
    scan::{NewScanLog, ScanLog},
};

mod mysql;

#[cfg(test)]
pub mod memory;

pub use mysql::MySqlStore;

#[async_trait]
pub trait KeyfobStore: Send + Sync {
    /// Insert an unattached, enabled keyfob and return its registry id.
    async fn insert_keyfob(&self, keyfob_key: i64) -> Result<i64, sqlx::Error>;

    /// Set or clear the attached user. Returns false if the keyfob does not exist.
    async fn set_attached_user(
        &self,
        keyfob_id: i64,
        user_id: Option<i64>,
    ) -> Result<bool, sqlx::Error>;

    /// Overwrite the physical key. Returns false if the keyfob does not exist.
    async fn set_keyfob_key(&self, keyfob_id: i64, keyfob_key: i64) -> Result<bool, sqlx::Error>;

    /// Mark a keyfob disabled. Returns false if the keyfob does not exist.
    async fn disable_keyfob(&self, keyfob_id: i64) -> Result<bool, sqlx::Error>;

    /// All keyfobs that are not disabled, joined with their user's display fields.
    async fn list_active_keyfobs(&self) -> Result<Vec<Keyfob>, sqlx::Error>;

    /// True if the keyfob exists, is attached to a user and is not disabled.
    async fn is_access_allowed(&self, keyfob_id: i64) -> Result<bool, sqlx::Error>;
}

#[async_trait]
pub trait FacilityStore: Send + Sync {
    async fn insert_facility(&self, facility_type: &str, capacity: i32)
    -> Result<i64, sqlx::Error>;

    async fn list_facilities(&self, active_only: bool) -> Result<Vec<Facility>, sqlx::Error>;

    /// Soft delete. Returns false if the facility does not exist.
    async fn deactivate_facility(&self, facility_id: i64) -> Result<bool, sqlx::Error>;

    /// Apply the supplied fields. Returns false if the facility does not exist.
    async fn update_facility(
        &self,
        facility_id: i64,
        update: &FacilityUpdate,
    ) -> Result<bool, sqlx::Error>;
}

#[async_trait]
pub trait ScanLogStore: Send + Sync {
    /// Append one immutable log row and return its id.
    async fn append_log(&self, log: &NewScanLog) -> Result<i64, sqlx::Error>;

    /// Append many rows; returns the number written.
    async fn append_logs(&self, logs: &[NewScanLog]) -> Result<u64, sqlx::Error>;

    /// Full history in insertion order.
    async fn list_logs(&self) -> Result<Vec<ScanLog>, sqlx::Error>;

    /// The `limit` most recent rows, newest first.
    async fn recent_logs(&self, limit: u32) -> Result<Vec<ScanLog>, sqlx::Error>;
}

/// Everything the HTTP layer needs from persistence.
#[async_trait]
pub trait Store: KeyfobStore + FacilityStore + ScanLogStore {
    /// Round-trip to the database to prove connectivity.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}
