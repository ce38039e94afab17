use crate::app::authenticity_service::AuthenticityService;
use crate::transport::http::rate_limit::RateLimiter;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AuthenticityService>,
    /// When set, admin routes require a matching `X-Admin-Token` header.
    pub admin_token: Option<String>,
    /// Per-client throttle on `POST /verify`; unthrottled when `None`.
    pub verify_limiter: Option<Arc<RateLimiter>>,
}

impl AppState {
    pub fn new(service: Arc<AuthenticityService>, admin_token: Option<String>) -> Self {
        Self { service, admin_token, verify_limiter: None }
    }

    pub fn with_verify_limiter(mut self, limiter: RateLimiter) -> Self {
        self.verify_limiter = Some(Arc::new(limiter));
        self
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct FingerprintRequest {
    pub name: String,
    pub color: String,
    pub material: String,
    /// Price in minor currency units.
    pub price: u64,
    /// Defaults to the current year.
    #[serde(default)]
    pub year: Option<u32>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterCodeRequest {
    /// `0x` + 64 hex characters.
    #[serde(alias = "productId", alias = "product_id")]
    pub fingerprint: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct VerifyRequest {
    /// `0x` + 64 hex characters.
    #[serde(alias = "productId", alias = "product_id")]
    pub fingerprint: String,
    /// Short code from the product card; case-insensitive.
    #[serde(rename = "shortCode", alias = "short_code", alias = "code")]
    pub short_code: String,
}
