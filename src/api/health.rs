use actix_web::{web, HttpResponse, Responder};
use crate::services::UserService;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub store: String,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "API is running", body = String, content_type = "text/plain")
    )
)]
pub async fn root() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("API is running...")
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and store are healthy", body = HealthResponse),
        (status = 503, description = "Store is unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(service: web::Data<UserService>) -> impl Responder {
    let store_ok = service.store_reachable().await;

    let body = HealthResponse {
        status: if store_ok { "healthy" } else { "degraded" }.to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: if store_ok { "connected" } else { "unavailable" }.to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    };

    if store_ok {
        HttpResponse::Ok().json(body)
    } else {
        log::warn!("⚠️  Health check: store unavailable");
        HttpResponse::ServiceUnavailable().json(body)
    }
}
