use crate::transport::http::handlers::common::fail;
use crate::transport::http::types::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/artifact",
    responses(
        (status = 200, description = "The loaded contract artifact (abi + networks)"),
        (status = 404, description = "No artifact was loaded", body = crate::transport::http::types::ApiResponse)
    )
)]
pub async fn artifact_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.artifact() {
        Some(artifact) => (StatusCode::OK, Json(artifact.as_ref())).into_response(),
        None => fail(StatusCode::NOT_FOUND, "Contract artifact not loaded").into_response(),
    }
}
