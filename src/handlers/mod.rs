//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Extracts and validates request data (JSON body, path, query)
//! 2. Calls into a service
//! 3. Returns a JSON response with the right status code

/// Keyfob and scan endpoints
pub mod druppel;
/// Facility endpoints
pub mod facilities;
/// Liveness and health endpoints
pub mod health;
