//! Access-scan recorder.
//!
//! A scan is evaluated, stamped and logged in that order:
//!
//! 1. Access is allowed only if the keyfob exists, is attached to a user and
//!    is not disabled
//! 2. The timestamp is taken from the server clock, never from the reader
//! 3. Exactly one log row is appended, for grants and denials alike
//!
//! A denial is a normal result, not an error. If the log write fails the
//! error propagates and no decision is returned; retrying is up to the reader.

use chrono::Utc;

use crate::{
    error::AppError,
    models::scan::{Direction, NewScanLog, ScanLog},
    store::{KeyfobStore, ScanLogStore},
};

/// Default and upper bound for the recent-scans listing.
pub const DEFAULT_RECENT_LIMIT: u32 = 10;
pub const MAX_RECENT_LIMIT: u32 = 100;

/// Evaluate and log one badge scan. Returns whether access was allowed.
///
/// # Errors
///
/// - `Database`: The access check or the log write failed. Nothing is
///   returned to the reader in that case and the scan counts as unrecorded.
pub async fn record_scan<S>(
    store: &S,
    keyfob_id: i64,
    facility_id: i64,
    direction: Direction,
) -> Result<bool, AppError>
where
    S: KeyfobStore + ScanLogStore + ?Sized,
{
    let allowed = store.is_access_allowed(keyfob_id).await?;
    let timestamp = Utc::now().timestamp_millis();

    let log_id = store
        .append_log(&NewScanLog {
            keyfob_id,
            facility_id,
            timestamp,
            in_out: direction,
            allowed,
        })
        .await?;

    if allowed {
        tracing::info!(
            log_id,
            keyfob_id,
            facility_id,
            direction = direction.as_str(),
            "access granted"
        );
    } else {
        tracing::warn!(
            log_id,
            keyfob_id,
            facility_id,
            direction = direction.as_str(),
            "access denied"
        );
    }

    Ok(allowed)
}

/// Full scan history, oldest first.
pub async fn list_scans<S>(store: &S) -> Result<Vec<ScanLog>, AppError>
where
    S: ScanLogStore + ?Sized,
{
    Ok(store.list_logs().await?)
}

/// Most recent scans, newest first. `limit` defaults to
/// [`DEFAULT_RECENT_LIMIT`] and is clamped to `1..=MAX_RECENT_LIMIT`.
pub async fn recent_scans<S>(store: &S, limit: Option<u32>) -> Result<Vec<ScanLog>, AppError>
where
    S: ScanLogStore + ?Sized,
{
    let limit = limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_RECENT_LIMIT);

    Ok(store.recent_logs(limit).await?)
}
