use actix_web::{HttpResponse, web};

use crate::domain::AttendanceService;
use crate::error::AppError;
use crate::model::employee::Employee;

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employee/{emp_id}",
    params(
        ("emp_id" = String, Path, description = "Employee ID, e.g. ATS0123")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 400, description = "Invalid Employee ID format", body = Object, example = json!({
            "error": "Invalid Employee ID format"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employee = service.employee(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}
