use crate::error::RegistryError;
use crate::transport::http::handlers::common::{fail, ok, parse_fingerprint, require_admin};
use crate::transport::http::types::{AppState, RegisterCodeRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/codes/register",
    request_body = RegisterCodeRequest,
    responses(
        (status = 200, description = "Short code minted", body = crate::transport::http::types::ApiResponse),
        (status = 400, description = "Invalid fingerprint", body = crate::transport::http::types::ApiResponse),
        (status = 401, description = "Missing or wrong X-Admin-Token", body = crate::transport::http::types::ApiResponse),
        (status = 409, description = "Fingerprint already has a short code", body = crate::transport::http::types::ApiResponse),
        (status = 422, description = "Invalid JSON body", body = crate::transport::http::types::ApiResponse),
        (status = 500, description = "Code store failure", body = crate::transport::http::types::ApiResponse)
    )
)]
pub async fn register_code_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Result<Json<RegisterCodeRequest>, JsonRejection>,
) -> impl IntoResponse {
    if let Err(resp) = require_admin(&state, &headers) {
        return resp.into_response();
    }
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return fail(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Invalid JSON body: {} (expected: {{\"fingerprint\": \"0x...\"}})", e),
            )
            .into_response();
        }
    };
    let fingerprint = match parse_fingerprint(&request.fingerprint) {
        Ok(fp) => fp,
        Err(resp) => return resp.into_response(),
    };

    match state.service.engine().register(fingerprint).await {
        Ok(code) => ok(serde_json::json!({
            "fingerprint": fingerprint,
            "shortCode": code,
        }))
        .into_response(),
        Err(e @ RegistryError::AlreadyRegistered { .. }) => {
            fail(StatusCode::CONFLICT, e.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!(%fingerprint, error = %e, "short code registration failed");
            fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/codes/{fingerprint}",
    params(
        ("fingerprint" = String, Path, description = "Fingerprint (0x + 64 hex)")
    ),
    responses(
        (status = 200, description = "Stored short code", body = crate::transport::http::types::ApiResponse),
        (status = 400, description = "Invalid fingerprint", body = crate::transport::http::types::ApiResponse),
        (status = 401, description = "Missing or wrong X-Admin-Token", body = crate::transport::http::types::ApiResponse),
        (status = 404, description = "No code stored for this fingerprint", body = crate::transport::http::types::ApiResponse),
        (status = 500, description = "Code store failure", body = crate::transport::http::types::ApiResponse)
    )
)]
pub async fn get_code_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(fingerprint): Path<String>,
) -> impl IntoResponse {
    if let Err(resp) = require_admin(&state, &headers) {
        return resp.into_response();
    }
    let fingerprint = match parse_fingerprint(&fingerprint) {
        Ok(fp) => fp,
        Err(resp) => return resp.into_response(),
    };

    match state.service.engine().registry().lookup(&fingerprint).await {
        Ok(Some(code)) => ok(serde_json::json!({
            "fingerprint": fingerprint,
            "shortCode": code,
        }))
        .into_response(),
        Ok(None) => fail(StatusCode::NOT_FOUND, "No code stored for this fingerprint").into_response(),
        Err(e) => fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
