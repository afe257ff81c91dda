use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use tracing::warn;

use super::SystemService;
use crate::models::{ApiResponse, AppStartTime, ErrorCode};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub system_name: String,
    pub environment: String,
    pub version: &'static str,
    pub store: &'static str,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub uptime_seconds: Option<i64>,
}

pub async fn health(service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    let started_at = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|t| t.start_datetime);

    let mut response = HealthResponse {
        system_name: config.app.system_name.clone(),
        environment: config.app.environment.clone(),
        version: env!("CARGO_PKG_VERSION"),
        store: "ok",
        started_at,
        uptime_seconds: started_at.map(|t| (chrono::Utc::now() - t).num_seconds()),
    };

    if let Err(e) = storage.ping().await {
        warn!("Health check failed: {}", e);
        response.store = "unavailable";
        return Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::error(
            ErrorCode::StoreUnavailable,
            response,
            "Record store unavailable",
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Service is healthy")))
}
