use crate::error::ApiError;

pub mod auth_service;
pub mod booking_service;
pub mod cors_fairing;
pub mod membership_service;
pub mod payment_gateway;
pub mod payment_service;

/// Trims a required request field; absent or blank values are a
/// validation error.
pub(crate) fn require_field(value: Option<String>) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing required fields".to_string()))
}

/// Like [`require_field`] but absence is not an error.
pub(crate) fn optional_field(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
