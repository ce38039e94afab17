// src/bin/api_server.rs

use authenticity_engine::infra::telemetry;
use authenticity_engine::transport;
use authenticity_engine::transport::http::RateLimiter;
use authenticity_engine::{AuthenticityService, Settings};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();
    let settings = Settings::from_env()?;

    // --- Service Initialization ---
    tracing::info!(rpc_url = %settings.rpc_url, "initializing authenticity service");
    let service = Arc::new(AuthenticityService::from_settings(&settings).await?);
    tracing::info!(
        contract = %service.engine().contract(),
        artifact_loaded = service.artifact().is_some(),
        "authenticity service initialized"
    );
    if settings.admin_api_key.is_none() {
        tracing::warn!("ADMIN_API_KEY is not set; admin endpoints are open");
    }

    let mut app_state = transport::http::AppState::new(service, settings.admin_api_key.clone());
    if settings.verify_rate_limit > 0 {
        tracing::info!(
            limit = settings.verify_rate_limit,
            window_secs = settings.verify_rate_window.as_secs(),
            "throttling /verify per client"
        );
        app_state = app_state
            .with_verify_limiter(RateLimiter::new(settings.verify_rate_limit, settings.verify_rate_window));
    } else {
        tracing::warn!("VERIFY_RATE_LIMIT=0; /verify is not throttled");
    }

    // --- API Server Initialization ---
    let origins: Vec<HeaderValue> = settings
        .cors_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    let cors = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    }
    .allow_methods(Any)
    .allow_headers(Any);

    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("API server listening on http://{}", settings.bind_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", settings.bind_addr);

    tokio::select! {
        result = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}
