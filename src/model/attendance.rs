use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Shift status derived by the punch lifecycle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AttendanceStatus {
    /// Known employee, shift still open
    InProgress,
    /// Unknown employee, waiting for HR onboarding
    Pending,
    FullDay,
    /// Auto-closed after the open punch went stale
    NotDefined,
}

impl TryFrom<String> for AttendanceStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HrApproval {
    Pending,
    Approved,
    Rejected,
}

impl TryFrom<String> for HrApproval {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "emp_id": "ATS0123",
    "punch_in": "2026-01-05T09:58:12",
    "punch_out": "2026-01-05T19:02:40",
    "status": "full-day",
    "hr_approval": "pending"
}))]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "ATS0123")]
    pub emp_id: String,

    #[schema(example = "2026-01-05T09:58:12", format = "date-time", value_type = String)]
    pub punch_in: NaiveDateTime,

    #[schema(example = "2026-01-05T19:02:40", format = "date-time", value_type = String, nullable = true)]
    pub punch_out: Option<NaiveDateTime>,

    #[sqlx(try_from = "String")]
    pub status: AttendanceStatus,

    #[sqlx(try_from = "String")]
    pub hr_approval: HrApproval,
}

impl AttendanceRecord {
    pub fn is_open(&self) -> bool {
        self.punch_out.is_none()
    }
}
