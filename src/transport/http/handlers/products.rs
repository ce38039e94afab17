use crate::crypto::{derive_fingerprint, FINGERPRINT_SCHEME};
use crate::domain::model::ProductAttributes;
use crate::transport::http::handlers::common::{fail, ok, parse_fingerprint};
use crate::transport::http::types::{AppState, FingerprintRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/fingerprint",
    request_body = FingerprintRequest,
    responses(
        (status = 200, description = "Fingerprint derived from the attributes", body = crate::transport::http::types::ApiResponse),
        (status = 400, description = "Malformed attributes", body = crate::transport::http::types::ApiResponse),
        (status = 422, description = "Invalid JSON body", body = crate::transport::http::types::ApiResponse)
    )
)]
pub async fn fingerprint_handler(
    request: Result<Json<FingerprintRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return fail(StatusCode::UNPROCESSABLE_ENTITY, format!("Invalid JSON body: {}", e))
                .into_response();
        }
    };
    let attrs = ProductAttributes::new(
        request.name,
        request.color,
        request.material,
        request.price,
        request.year,
    );
    if let Err(e) = attrs.validate() {
        return fail(StatusCode::BAD_REQUEST, e.to_string()).into_response();
    }

    ok(serde_json::json!({
        "fingerprint": derive_fingerprint(&attrs),
        "scheme": FINGERPRINT_SCHEME,
        "product": attrs,
    }))
    .into_response()
}

#[utoipa::path(
    get,
    path = "/products/{fingerprint}",
    params(
        ("fingerprint" = String, Path, description = "Fingerprint (0x + 64 hex)")
    ),
    responses(
        (status = 200, description = "Ledger record for the fingerprint", body = crate::transport::http::types::ApiResponse),
        (status = 400, description = "Invalid fingerprint", body = crate::transport::http::types::ApiResponse),
        (status = 404, description = "No ledger record", body = crate::transport::http::types::ApiResponse),
        (status = 503, description = "Ledger unavailable", body = crate::transport::http::types::ApiResponse)
    )
)]
pub async fn product_record_handler(
    State(state): State<AppState>,
    Path(fingerprint): Path<String>,
) -> impl IntoResponse {
    let fingerprint = match parse_fingerprint(&fingerprint) {
        Ok(fp) => fp,
        Err(resp) => return resp.into_response(),
    };

    match state.service.engine().read_record(fingerprint).await {
        Ok(Some(product)) if !product.is_unset() => ok(serde_json::json!({
            "fingerprint": fingerprint,
            "product": product,
        }))
        .into_response(),
        Ok(_) => fail(StatusCode::NOT_FOUND, "No ledger record for this fingerprint").into_response(),
        Err(e) => {
            tracing::warn!(%fingerprint, error = %e, "ledger read failed");
            fail(StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
        }
    }
}
