//! Synthetic scan history for demos and dashboards.
//!
//! Each generated row is independent: a random active facility, a random
//! keyfob that is attached and enabled, a random direction and a random
//! moment inside a fixed three-month window, restricted to 06:00-22:00 UTC.
//! Rows are always `allowed = true`, which matches what a real scan of such a
//! keyfob would record. Consecutive "in"/"out" events per facility are not
//! alternated, so generated histories can contain impossible sequences.

use rand::Rng;

use crate::{
    error::AppError,
    models::scan::{Direction, NewScanLog},
    store::{FacilityStore, KeyfobStore, ScanLogStore},
};

/// 2025-09-01T00:00:00Z
pub const WINDOW_START_MS: i64 = 1_756_684_800_000;
/// Days from 2025-09-01 up to (not including) 2025-12-01.
pub const WINDOW_DAYS: i64 = 91;
pub const FIRST_HOUR: i64 = 6;
pub const LAST_HOUR: i64 = 22;
pub const MAX_COUNT: u32 = 10_000;

const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Insert `count` synthetic log rows. Returns the number written.
///
/// # Errors
///
/// - `InvalidRequest`: `count` outside `1..=MAX_COUNT`, or there is no active
///   facility or attached keyfob to attribute rows to
/// - `Database`: Database error occurred
pub async fn generate_synthetic_logs<S>(store: &S, count: u32) -> Result<u64, AppError>
where
    S: KeyfobStore + FacilityStore + ScanLogStore + ?Sized,
{
    if count == 0 || count > MAX_COUNT {
        return Err(AppError::InvalidRequest(format!(
            "count must be between 1 and {MAX_COUNT}"
        )));
    }

    let facilities: Vec<i64> = store
        .list_facilities(true)
        .await?
        .into_iter()
        .map(|f| f.facility_id)
        .collect();
    if facilities.is_empty() {
        return Err(AppError::InvalidRequest(
            "no active facilities to generate logs for".to_string(),
        ));
    }

    let keyfobs: Vec<i64> = store
        .list_active_keyfobs()
        .await?
        .into_iter()
        .filter(|k| k.attached_user_id.is_some())
        .map(|k| k.keyfob_id)
        .collect();
    if keyfobs.is_empty() {
        return Err(AppError::InvalidRequest(
            "no attached keyfobs to generate logs for".to_string(),
        ));
    }

    // ThreadRng is not Send; keep it out of scope across awaits
    let logs = {
        let mut rng = rand::rng();
        synthesize(&mut rng, &facilities, &keyfobs, count)
    };

    let inserted = store.append_logs(&logs).await?;
    tracing::info!(inserted, "synthetic scan logs generated");

    Ok(inserted)
}

fn synthesize<R: Rng>(
    rng: &mut R,
    facilities: &[i64],
    keyfobs: &[i64],
    count: u32,
) -> Vec<NewScanLog> {
    (0..count)
        .map(|_| NewScanLog {
            keyfob_id: keyfobs[rng.random_range(0..keyfobs.len())],
            facility_id: facilities[rng.random_range(0..facilities.len())],
            timestamp: random_timestamp(&mut *rng),
            in_out: if rng.random_bool(0.5) {
                Direction::In
            } else {
                Direction::Out
            },
            allowed: true,
        })
        .collect()
}

/// Every day in the window has the same 16-hour band, so picking the day
/// first and then the offset inside the band is uniform over the whole set.
fn random_timestamp<R: Rng>(rng: &mut R) -> i64 {
    let day = rng.random_range(0..WINDOW_DAYS);
    let offset = rng.random_range(FIRST_HOUR * MS_PER_HOUR..LAST_HOUR * MS_PER_HOUR);

    WINDOW_START_MS + day * MS_PER_DAY + offset
}
