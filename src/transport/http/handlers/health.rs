use crate::transport::http::handlers::common::{fail, ok};
use crate::transport::http::types::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (code store reachable)", body = crate::transport::http::types::ApiResponse),
        (status = 503, description = "Service is unhealthy (code store unreachable)", body = crate::transport::http::types::ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.store().ping().await {
        Ok(()) => ok(serde_json::json!({
            "status": "ok",
            "contract": state.service.engine().contract().to_hex(),
        }))
        .into_response(),
        Err(e) => fail(StatusCode::SERVICE_UNAVAILABLE, format!("Code store ping failed: {}", e))
            .into_response(),
    }
}
