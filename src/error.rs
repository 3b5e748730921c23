use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::model::attendance::AttendanceRecord;

/// Every failure a handler can return. Rendered as `{ "error": ... }` plus
/// the flag a client needs to tell conflicts apart.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid Employee ID format")]
    InvalidEmpId,

    #[error("Invalid password")]
    InvalidCredentials,

    /// Unknown to the directory; the client may offer onboarding.
    #[error("Employee not found")]
    UnknownEmployee,

    #[error("Employee not found")]
    EmployeeNotFound,

    #[error("Attendance record not found")]
    RecordNotFound,

    #[error("You are already punched in. Please punch out first.")]
    AlreadyPunchedIn(Box<AttendanceRecord>),

    #[error("No open punch-in found")]
    NoOpenPunch,

    #[error("Attendance record is still open and cannot be reviewed")]
    RecordStillOpen(Box<AttendanceRecord>),

    #[error("Internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::InvalidEmpId
            | AppError::AlreadyPunchedIn(_)
            | AppError::NoOpenPunch
            | AppError::RecordStillOpen(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::UnknownEmployee | AppError::EmployeeNotFound | AppError::RecordNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::AlreadyPunchedIn(record) => json!({
                "error": self.to_string(),
                "alreadyPunchedIn": true,
                "record": record,
            }),
            AppError::RecordStillOpen(record) => json!({
                "error": self.to_string(),
                "recordOpen": true,
                "record": record,
            }),
            AppError::UnknownEmployee => json!({
                "error": self.to_string(),
                "isNewEmployee": true,
            }),
            AppError::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), "Request failed");
                json!({ "error": "Internal server error" })
            }
            _ => json!({ "error": self.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
