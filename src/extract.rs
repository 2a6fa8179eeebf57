//! Request extractors that reject with [`AppError`].
//!
//! Axum's stock extractors answer malformed input with their own status
//! codes (422 for a JSON body with wrong field types, for instance). These
//! wrappers route every rejection through `AppError::InvalidRequest`, so a
//! missing or wrong-typed field is always a 400 and never reaches the
//! database.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
