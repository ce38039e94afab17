use crate::transport::http::handlers::{artifact, codes, health, products, verify};
use crate::transport::http::rate_limit::limit_by_client;
use crate::transport::http::types::{
    ApiResponse, FingerprintRequest, RegisterCodeRequest, VerifyRequest,
};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        artifact::artifact_handler,
        products::fingerprint_handler,
        products::product_record_handler,
        codes::register_code_handler,
        codes::get_code_handler,
        verify::verify_handler
    ),
    components(schemas(ApiResponse, FingerprintRequest, RegisterCodeRequest, VerifyRequest))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    let verify_route = match app_state.verify_limiter.clone() {
        Some(limiter) => post(verify::verify_handler)
            .route_layer(middleware::from_fn_with_state(limiter, limit_by_client)),
        None => post(verify::verify_handler),
    };

    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/artifact", get(artifact::artifact_handler))
        .route("/fingerprint", post(products::fingerprint_handler))
        .route("/products/:fingerprint", get(products::product_record_handler))
        .route("/codes/register", post(codes::register_code_handler))
        .route("/codes/:fingerprint", get(codes::get_code_handler))
        .route("/verify", verify_route)
        .with_state(app_state)
}
