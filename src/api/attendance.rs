use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::AttendanceService;
use crate::error::AppError;
use crate::model::attendance::AttendanceRecord;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PunchRequest {
    #[schema(example = "ATS0123")]
    pub emp_id: Option<String>,
}

impl PunchRequest {
    fn emp_id(self) -> Result<String, AppError> {
        self.emp_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::validation("Employee ID is required"))
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PunchResponse {
    #[schema(example = "Punch-in recorded")]
    pub message: String,
    pub record: AttendanceRecord,
    /// Stale open punch closed by this punch-in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_closed: Option<AttendanceRecord>,
}

#[derive(Serialize, ToSchema)]
pub struct ReviewResponse {
    #[schema(example = "Attendance approved")]
    pub message: String,
    pub record: AttendanceRecord,
}

#[derive(Deserialize, IntoParams)]
pub struct DateQuery {
    /// Calendar day `YYYY-MM-DD`; today when omitted
    #[param(example = "2026-01-05")]
    pub date: Option<String>,
}

/// Punch-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/punch-in",
    request_body = PunchRequest,
    responses(
        (status = 200, description = "Punch-in recorded", body = PunchResponse),
        (status = 400, description = "Malformed ID or already punched in", body = Object, example = json!({
            "error": "You are already punched in. Please punch out first.",
            "alreadyPunchedIn": true,
            "record": {
                "id": 1,
                "emp_id": "ATS0123",
                "punch_in": "2026-01-05T09:58:12",
                "punch_out": null,
                "status": "in-progress",
                "hr_approval": "pending"
            }
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn punch_in(
    service: web::Data<AttendanceService>,
    payload: web::Json<PunchRequest>,
) -> Result<HttpResponse, AppError> {
    let emp_id = payload.into_inner().emp_id()?;
    let outcome = service.punch_in(&emp_id).await?;

    Ok(HttpResponse::Ok().json(PunchResponse {
        message: outcome.message.to_string(),
        record: outcome.record,
        auto_closed: outcome.auto_closed,
    }))
}

/// Punch-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/punch-out",
    request_body = PunchRequest,
    responses(
        (status = 200, description = "Punch-out recorded", body = PunchResponse),
        (status = 400, description = "Malformed ID or no open punch-in", body = Object, example = json!({
            "error": "No open punch-in found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn punch_out(
    service: web::Data<AttendanceService>,
    payload: web::Json<PunchRequest>,
) -> Result<HttpResponse, AppError> {
    let emp_id = payload.into_inner().emp_id()?;
    let outcome = service.punch_out(&emp_id).await?;

    Ok(HttpResponse::Ok().json(PunchResponse {
        message: outcome.message.to_string(),
        record: outcome.record,
        auto_closed: None,
    }))
}

/// Attendance history of one employee, newest first
#[utoipa::path(
    get,
    path = "/api/attendance/{emp_id}",
    params(
        ("emp_id" = String, Path, description = "Employee ID, e.g. ATS0123")
    ),
    responses(
        (status = 200, description = "Attendance records", body = [AttendanceRecord]),
        (status = 400, description = "Invalid Employee ID format", body = Object, example = json!({
            "error": "Invalid Employee ID format"
        }))
    ),
    tag = "Attendance"
)]
pub async fn history(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let records = service.history(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Attendance of every employee for one day
#[utoipa::path(
    get,
    path = "/api/attendance/all",
    params(DateQuery),
    responses(
        (status = 200, description = "Attendance records punched in on the day", body = [AttendanceRecord]),
        (status = 400, description = "Invalid date", body = Object, example = json!({
            "error": "Invalid date, expected YYYY-MM-DD"
        }))
    ),
    tag = "Attendance"
)]
pub async fn all_for_date(
    service: web::Data<AttendanceService>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, AppError> {
    let date = match query.into_inner().date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::validation("Invalid date, expected YYYY-MM-DD"))?,
        ),
    };

    let records = service.attendance_on(date).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// HR approval of a finished attendance record
#[utoipa::path(
    put,
    path = "/api/attendance/approve/{id}",
    params(
        ("id" = u64, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Attendance approved", body = ReviewResponse),
        (status = 400, description = "Record still open", body = Object, example = json!({
            "error": "Attendance record is still open and cannot be reviewed",
            "recordOpen": true
        })),
        (status = 404, description = "Record not found", body = Object, example = json!({
            "error": "Attendance record not found"
        }))
    ),
    tag = "Attendance"
)]
pub async fn approve(
    service: web::Data<AttendanceService>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let record = service.approve(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ReviewResponse {
        message: "Attendance approved".to_string(),
        record,
    }))
}

/// HR rejection of a finished attendance record
#[utoipa::path(
    put,
    path = "/api/attendance/reject/{id}",
    params(
        ("id" = u64, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Attendance rejected", body = ReviewResponse),
        (status = 400, description = "Record still open", body = Object, example = json!({
            "error": "Attendance record is still open and cannot be reviewed",
            "recordOpen": true
        })),
        (status = 404, description = "Record not found", body = Object, example = json!({
            "error": "Attendance record not found"
        }))
    ),
    tag = "Attendance"
)]
pub async fn reject(
    service: web::Data<AttendanceService>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let record = service.reject(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ReviewResponse {
        message: "Attendance rejected".to_string(),
        record,
    }))
}
