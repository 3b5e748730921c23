use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde_json::json;

use crate::domain::AttendanceService;

/// Liveness plus a round trip to the store.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database reachable", body = Object, example = json!({
            "status": "OK",
            "timestamp": "2026-01-05T10:00:00.000Z",
            "database": "connected"
        })),
        (status = 503, description = "Database unreachable", body = Object, example = json!({
            "status": "ERROR",
            "timestamp": "2026-01-05T10:00:00.000Z",
            "database": "unreachable"
        }))
    ),
    tag = "Health"
)]
pub async fn health(service: web::Data<AttendanceService>) -> impl Responder {
    let timestamp = Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    match service.health().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "OK",
            "timestamp": timestamp,
            "database": "connected"
        })),
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Health check failed");
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "ERROR",
                "timestamp": timestamp,
                "database": "unreachable"
            }))
        }
    }
}
