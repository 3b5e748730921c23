use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::AttendanceService;
use crate::error::AppError;
use crate::model::asset::AssetRequest;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetRequest {
    #[schema(example = "ATS0123")]
    pub emp_id: Option<String>,
    #[schema(example = "laptop")]
    pub asset_type: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AssetRequestResponse {
    #[schema(example = "Asset request submitted")]
    pub message: String,
    pub request: AssetRequest,
}

/// Submit an asset request for a known employee
#[utoipa::path(
    post,
    path = "/api/assets",
    request_body = CreateAssetRequest,
    responses(
        (status = 201, description = "Asset request submitted", body = AssetRequestResponse),
        (status = 400, description = "Missing or invalid fields", body = Object, example = json!({
            "error": "Asset type is required"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Employee not found"
        }))
    ),
    tag = "Assets"
)]
pub async fn create_asset_request(
    service: web::Data<AttendanceService>,
    payload: web::Json<CreateAssetRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let emp_id = payload
        .emp_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::validation("Employee ID is required"))?;
    let asset_type = payload.asset_type.unwrap_or_default();

    let request = service.request_asset(&emp_id, &asset_type).await?;

    Ok(HttpResponse::Created().json(AssetRequestResponse {
        message: "Asset request submitted".to_string(),
        request,
    }))
}

/// Asset requests of one employee, newest first
#[utoipa::path(
    get,
    path = "/api/assets/{emp_id}",
    params(
        ("emp_id" = String, Path, description = "Employee ID, e.g. ATS0123")
    ),
    responses(
        (status = 200, description = "Asset requests", body = [AssetRequest]),
        (status = 400, description = "Invalid Employee ID format")
    ),
    tag = "Assets"
)]
pub async fn list_asset_requests(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let requests = service.asset_requests(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(requests))
}
