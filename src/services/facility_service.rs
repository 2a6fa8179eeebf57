//! Facility registry.
//!
//! Facilities are soft-deleted by clearing `active`; no operation removes a
//! row.

use crate::{
    error::AppError,
    models::facility::{Facility, FacilityUpdate},
    store::FacilityStore,
};

/// Create an active, working facility.
///
/// # Errors
///
/// - `InvalidRequest`: blank type or negative capacity
/// - `Database`: Database error occurred
pub async fn create<S>(store: &S, facility_type: &str, capacity: i32) -> Result<i64, AppError>
where
    S: FacilityStore + ?Sized,
{
    let facility_type = validate_type(facility_type)?;
    validate_capacity(capacity)?;

    let facility_id = store.insert_facility(facility_type, capacity).await?;
    tracing::info!(facility_id, facility_type, capacity, "facility created");

    Ok(facility_id)
}

pub async fn list<S>(store: &S, active_only: bool) -> Result<Vec<Facility>, AppError>
where
    S: FacilityStore + ?Sized,
{
    Ok(store.list_facilities(active_only).await?)
}

/// Mark a facility inactive. Idempotent.
pub async fn soft_delete<S>(store: &S, facility_id: i64) -> Result<(), AppError>
where
    S: FacilityStore + ?Sized,
{
    if !store.deactivate_facility(facility_id).await? {
        return Err(AppError::FacilityNotFound);
    }

    tracing::info!(facility_id, "facility deactivated");
    Ok(())
}

/// Apply a partial update. Only the supplied fields change.
///
/// # Errors
///
/// - `InvalidRequest`: no field supplied, blank type or negative capacity
/// - `FacilityNotFound`: No facility with this id
/// - `Database`: Database error occurred
pub async fn update<S>(
    store: &S,
    facility_id: i64,
    mut update: FacilityUpdate,
) -> Result<(), AppError>
where
    S: FacilityStore + ?Sized,
{
    if update.is_empty() {
        return Err(AppError::InvalidRequest(
            "at least one of facility_type, capacity, active, broken is required".to_string(),
        ));
    }
    if let Some(facility_type) = update.facility_type.take() {
        update.facility_type = Some(validate_type(&facility_type)?.to_string());
    }
    if let Some(capacity) = update.capacity {
        validate_capacity(capacity)?;
    }

    if !store.update_facility(facility_id, &update).await? {
        return Err(AppError::FacilityNotFound);
    }

    tracing::info!(facility_id, ?update, "facility updated");
    Ok(())
}

fn validate_type(facility_type: &str) -> Result<&str, AppError> {
    let trimmed = facility_type.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidRequest(
            "facility type must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

fn validate_capacity(capacity: i32) -> Result<(), AppError> {
    if capacity < 0 {
        return Err(AppError::InvalidRequest(
            "capacity must be zero or greater".to_string(),
        ));
    }
    Ok(())
}
