//! Facility HTTP handlers.
//!
//! - PUT /api/facility/create-facility - Create a facility
//! - GET /api/facility/facilities - List facilities
//! - DELETE /api/facility/delete-facility/{id} - Soft delete
//! - PATCH /api/facility/update-facility/{id} - Partial update

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    error::AppError,
    extract::{ApiJson, ApiPath, ApiQuery},
    models::{
        MessageResponse,
        facility::{
            CreateFacilityRequest, FacilitiesResponse, FacilityResult, FacilityUpdate,
            ListFacilitiesQuery,
        },
    },
    services::facility_service,
    state::AppState,
};

/// Create a facility.
///
/// # Request Body
///
/// ```json
/// { "facilityType": "Wasmachine", "capacity": 4 }
/// ```
///
/// # Response
///
/// - **201 Created**: `result.facility_id` holds the new id
/// - **400**: Missing field, blank type or negative capacity
pub async fn create_facility(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateFacilityRequest>,
) -> Result<(StatusCode, Json<MessageResponse<FacilityResult>>), AppError> {
    let facility_id =
        facility_service::create(state.store(), &request.facility_type, request.capacity).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Facility created successfully",
            FacilityResult { facility_id },
        )),
    ))
}

/// List facilities. Only active ones unless `?activeOnly=false`.
pub async fn list_facilities(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListFacilitiesQuery>,
) -> Result<Json<FacilitiesResponse>, AppError> {
    let facilities = facility_service::list(state.store(), query.active_only).await?;

    Ok(Json(FacilitiesResponse { facilities }))
}

/// Soft delete: the row stays, `active` becomes false.
pub async fn delete_facility(
    State(state): State<AppState>,
    ApiPath(facility_id): ApiPath<i64>,
) -> Result<Json<MessageResponse<FacilityResult>>, AppError> {
    facility_service::soft_delete(state.store(), facility_id).await?;

    Ok(Json(MessageResponse::new(
        "Facility deleted successfully",
        FacilityResult { facility_id },
    )))
}

/// Partial update.
///
/// # Request Body
///
/// Any subset of:
///
/// ```json
/// { "facility_type": "Droger", "capacity": 2, "active": true, "broken": false }
/// ```
pub async fn update_facility(
    State(state): State<AppState>,
    ApiPath(facility_id): ApiPath<i64>,
    ApiJson(update): ApiJson<FacilityUpdate>,
) -> Result<Json<MessageResponse<FacilityResult>>, AppError> {
    facility_service::update(state.store(), facility_id, update).await?;

    Ok(Json(MessageResponse::new(
        "Facility updated successfully",
        FacilityResult { facility_id },
    )))
}
