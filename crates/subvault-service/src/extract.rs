//! Request extractors.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// JSON body extractor whose rejections become [`ApiError::BadRequest`].
///
/// Plain `axum::Json` answers malformed bodies with a 4xx text response that
/// echoes the deserializer's message.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
