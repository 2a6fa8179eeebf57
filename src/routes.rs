//! HTTP router.

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

/// Build the full application router with its shared state.
pub fn router(state: AppState) -> Router {
    let druppel_routes = Router::new()
        .route(
            "/scans",
            post(handlers::druppel::record_scan).get(handlers::druppel::list_scans),
        )
        .route("/scans/recent", get(handlers::druppel::recent_scans))
        .route("/attach-user", put(handlers::druppel::attach_user))
        .route("/detach-user", put(handlers::druppel::detach_user))
        .route("/set-keyfob-key", put(handlers::druppel::set_keyfob_key))
        .route("/init-keyfob", put(handlers::druppel::init_keyfob))
        .route("/disable-keyfob", put(handlers::druppel::disable_keyfob))
        .route("/keyfobs", get(handlers::druppel::list_keyfobs))
        .route("/test-logs", post(handlers::druppel::generate_test_logs));

    let facility_routes = Router::new()
        .route(
            "/create-facility",
            put(handlers::facilities::create_facility),
        )
        .route("/facilities", get(handlers::facilities::list_facilities))
        .route(
            "/delete-facility/{id}",
            delete(handlers::facilities::delete_facility),
        )
        .route(
            "/update-facility/{id}",
            patch(handlers::facilities::update_facility),
        );

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .nest("/api/druppel", druppel_routes)
        .nest("/api/facility", facility_routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": {
                "code": "not_found",
                "message": "Not Found"
            }
        })),
    )
}
