use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AssetRequest {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "ATS0123")]
    pub emp_id: String,

    #[schema(example = "laptop")]
    pub asset_type: String,

    #[schema(example = "2026-01-05T10:15:00", format = "date-time", value_type = String)]
    pub request_date: NaiveDateTime,

    #[schema(example = "pending")]
    pub status: String,
}

pub const ASSET_STATUS_PENDING: &str = "pending";
