use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::AttendanceService;
use crate::error::AppError;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    #[schema(example = "ATS0123")]
    pub emp_id: Option<String>,
    /// Checked against the stored credential when present
    #[schema(example = "password123")]
    pub password: Option<String>,
}

/// Validate an employee identifier, and optionally its password
#[utoipa::path(
    post,
    path = "/api/auth/validate",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Known employee", body = Object, example = json!({
            "message": "Validation successful",
            "empId": "ATS0123",
            "isNewEmployee": false
        })),
        (status = 400, description = "Missing or malformed employee ID", body = Object, example = json!({
            "error": "Invalid Employee ID format"
        })),
        (status = 401, description = "Password mismatch", body = Object, example = json!({
            "error": "Invalid password"
        })),
        (status = 404, description = "Unknown employee", body = Object, example = json!({
            "error": "Employee not found",
            "isNewEmployee": true
        }))
    ),
    tag = "Auth"
)]
pub async fn validate(
    service: web::Data<AttendanceService>,
    payload: web::Json<ValidateRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let emp_id = payload
        .emp_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::validation("Employee ID is required"))?;

    let emp_id = service
        .validate_employee(&emp_id, payload.password.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Validation successful",
        "empId": emp_id.as_str(),
        "isNewEmployee": false
    })))
}
