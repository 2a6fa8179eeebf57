//! Keyfob ("druppel") and scan HTTP handlers.
//!
//! This module implements the badge-related API endpoints:
//! - POST /api/druppel/scans - Record a scan from a reader
//! - GET /api/druppel/scans - Full scan history
//! - GET /api/druppel/scans/recent - Latest scans, newest first
//! - PUT /api/druppel/attach-user - Attach a user to a keyfob
//! - PUT /api/druppel/detach-user - Detach the user from a keyfob
//! - PUT /api/druppel/set-keyfob-key - Rekey a keyfob
//! - PUT /api/druppel/init-keyfob - Register a new keyfob
//! - PUT /api/druppel/disable-keyfob - Take a keyfob out of service
//! - GET /api/druppel/keyfobs - Keyfobs still in service
//! - POST /api/druppel/test-logs - Generate synthetic scan history

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    error::AppError,
    extract::{ApiJson, ApiQuery},
    models::{
        MessageResponse,
        keyfob::{
            AttachUserRequest, InitKeyfobRequest, KeyfobRefRequest, KeyfobResult, KeyfobsResponse,
            SetKeyfobKeyRequest,
        },
        scan::{
            GenerateLogsRequest, GenerateLogsResult, RecentScansQuery, ScanDecision, ScanRequest,
            ScansResponse,
        },
    },
    services::{keyfob_service, scan_service, test_data_service},
    state::AppState,
};

/// Record a badge scan.
///
/// # Request Body
///
/// ```json
/// { "tag_id": 42, "location_id": 3, "inout": "in" }
/// ```
///
/// # Response
///
/// - **201 Created**: The scan was logged; `result.allowed` carries the
///   decision. A denial is still a 201.
/// - **400**: Missing or wrong-typed field, or `inout` not "in"/"out"
/// - **500**: The scan could not be logged and must be treated as unrecorded
pub async fn record_scan(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ScanRequest>,
) -> Result<(StatusCode, Json<MessageResponse<ScanDecision>>), AppError> {
    let allowed = scan_service::record_scan(
        state.store(),
        request.tag_id,
        request.location_id,
        request.inout,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Scan logged successfully",
            ScanDecision::new(allowed),
        )),
    ))
}

/// Full scan history, unpaginated.
pub async fn list_scans(State(state): State<AppState>) -> Result<Json<ScansResponse>, AppError> {
    let scans = scan_service::list_scans(state.store()).await?;

    Ok(Json(ScansResponse { scans }))
}

/// Latest scans for the dashboard. `?limit=` defaults to 10, max 100.
pub async fn recent_scans(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RecentScansQuery>,
) -> Result<Json<ScansResponse>, AppError> {
    let scans = scan_service::recent_scans(state.store(), query.limit).await?;

    Ok(Json(ScansResponse { scans }))
}

/// Attach a user to a keyfob.
///
/// # Request Body
///
/// ```json
/// { "userId": 7, "keyfobId": 42 }
/// ```
///
/// # Response
///
/// - **200 OK**: `result.keyfob_id` echoes the keyfob
/// - **404**: Keyfob does not exist
pub async fn attach_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AttachUserRequest>,
) -> Result<Json<MessageResponse<KeyfobResult>>, AppError> {
    keyfob_service::attach(state.store(), request.user_id, request.keyfob_id).await?;

    Ok(Json(MessageResponse::new(
        "User attached to keyfob successfully",
        KeyfobResult {
            keyfob_id: request.keyfob_id,
        },
    )))
}

/// Detach whoever is attached to a keyfob.
pub async fn detach_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<KeyfobRefRequest>,
) -> Result<Json<MessageResponse<KeyfobResult>>, AppError> {
    keyfob_service::detach(state.store(), request.keyfob_id).await?;

    Ok(Json(MessageResponse::new(
        "User detached from keyfob successfully",
        KeyfobResult {
            keyfob_id: request.keyfob_id,
        },
    )))
}

/// Overwrite a keyfob's physical key.
///
/// # Request Body
///
/// ```json
/// { "keyfobId": 42, "newKey": 99999 }
/// ```
pub async fn set_keyfob_key(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SetKeyfobKeyRequest>,
) -> Result<Json<MessageResponse<KeyfobResult>>, AppError> {
    keyfob_service::rekey(state.store(), request.keyfob_id, request.new_key).await?;

    Ok(Json(MessageResponse::new(
        "Keyfob key updated successfully",
        KeyfobResult {
            keyfob_id: request.keyfob_id,
        },
    )))
}

/// Register a new, unattached keyfob.
///
/// # Request Body
///
/// ```json
/// { "keyfob_key": 7235 }
/// ```
pub async fn init_keyfob(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<InitKeyfobRequest>,
) -> Result<Json<MessageResponse<KeyfobResult>>, AppError> {
    let keyfob_id = keyfob_service::initialize(state.store(), request.keyfob_key).await?;

    Ok(Json(MessageResponse::new(
        "Keyfob initialized successfully",
        KeyfobResult { keyfob_id },
    )))
}

pub async fn disable_keyfob(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<KeyfobRefRequest>,
) -> Result<Json<MessageResponse<KeyfobResult>>, AppError> {
    keyfob_service::disable(state.store(), request.keyfob_id).await?;

    Ok(Json(MessageResponse::new(
        "Keyfob disabled successfully",
        KeyfobResult {
            keyfob_id: request.keyfob_id,
        },
    )))
}

/// Keyfobs still in service, with attached user names and roles.
pub async fn list_keyfobs(
    State(state): State<AppState>,
) -> Result<Json<KeyfobsResponse>, AppError> {
    let keyfobs = keyfob_service::list_active(state.store()).await?;

    Ok(Json(KeyfobsResponse { keyfobs }))
}

/// Fill the log table with synthetic scans for demos.
///
/// # Request Body
///
/// ```json
/// { "count": 500 }
/// ```
pub async fn generate_test_logs(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<GenerateLogsRequest>,
) -> Result<(StatusCode, Json<MessageResponse<GenerateLogsResult>>), AppError> {
    let inserted = test_data_service::generate_synthetic_logs(state.store(), request.count)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Test logs generated successfully",
            GenerateLogsResult { inserted },
        )),
    ))
}
