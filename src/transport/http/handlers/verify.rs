use crate::transport::http::handlers::common::{fail, ok, parse_fingerprint};
use crate::transport::http::types::{AppState, VerifyRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verdict (authentic or fake, with reason)", body = crate::transport::http::types::ApiResponse),
        (status = 400, description = "Invalid fingerprint", body = crate::transport::http::types::ApiResponse),
        (status = 422, description = "Invalid JSON body", body = crate::transport::http::types::ApiResponse),
        (status = 500, description = "Code store failure", body = crate::transport::http::types::ApiResponse)
    )
)]
pub async fn verify_handler(
    State(state): State<AppState>,
    request: Result<Json<VerifyRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return fail(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!(
                    "Invalid JSON body: {} (expected: {{\"fingerprint\": \"0x...\", \"shortCode\": \"...\"}})",
                    e
                ),
            )
            .into_response();
        }
    };
    let fingerprint = match parse_fingerprint(&request.fingerprint) {
        Ok(fp) => fp,
        Err(resp) => return resp.into_response(),
    };

    match state.service.engine().verify(fingerprint, &request.short_code).await {
        Ok(verdict) => {
            tracing::info!(%fingerprint, reason = %verdict.reason, "verification completed");
            match serde_json::to_value(&verdict) {
                Ok(data) => ok(data).into_response(),
                Err(e) => fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
            }
        }
        Err(e) => {
            tracing::error!(%fingerprint, error = %e, "verification failed on code store");
            fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
