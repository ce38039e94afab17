use crate::domain::model::Fingerprint;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::Value as JsonValue;

pub type ApiError = (StatusCode, Json<ApiResponse>);

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

pub fn ok(data: JsonValue) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }),
    )
}

pub fn fail(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(error.into()),
        }),
    )
}

pub fn parse_fingerprint(raw: &str) -> Result<Fingerprint, ApiError> {
    raw.parse::<Fingerprint>()
        .map_err(|e| fail(StatusCode::BAD_REQUEST, format!("Invalid fingerprint: {}", e)))
}

/// Header-based admin check. Open when no admin token is configured (local dev).
pub fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Ok(());
    };
    let presented = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if presented == expected {
        Ok(())
    } else {
        Err(fail(StatusCode::UNAUTHORIZED, "Not authorized"))
    }
}
