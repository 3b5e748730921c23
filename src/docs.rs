use crate::api::asset::{AssetRequestResponse, CreateAssetRequest};
use crate::api::attendance::{PunchRequest, PunchResponse, ReviewResponse};
use crate::api::auth::ValidateRequest;
use crate::model::asset::AssetRequest;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, HrApproval};
use crate::model::employee::Employee;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance API",
        version = "1.0.0",
        description = r#"
## Employee Attendance Tracking

Employees punch in and out with their employee ID (`ATS0` followed by three digits).
HR reviews finished shifts and approves or rejects them.

- An open punch older than 12 hours is closed automatically (status `not-defined`)
  by the next punch-in.
- Unknown employee IDs may punch; their records stay `pending` until HR onboarding.
- Employees can file asset requests.

Errors are returned as `{ "error": "..." }`.
"#,
    ),
    paths(
        crate::api::health::health,
        crate::api::auth::validate,

        crate::api::attendance::punch_in,
        crate::api::attendance::punch_out,
        crate::api::attendance::all_for_date,
        crate::api::attendance::history,
        crate::api::attendance::approve,
        crate::api::attendance::reject,

        crate::api::employee::get_employee,

        crate::api::asset::create_asset_request,
        crate::api::asset::list_asset_requests
    ),
    components(
        schemas(
            ValidateRequest,
            PunchRequest,
            PunchResponse,
            ReviewResponse,
            AttendanceRecord,
            AttendanceStatus,
            HrApproval,
            Employee,
            CreateAssetRequest,
            AssetRequestResponse,
            AssetRequest
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Auth", description = "Employee ID validation"),
        (name = "Attendance", description = "Punch in/out and HR review"),
        (name = "Employee", description = "Employee directory"),
        (name = "Assets", description = "Asset requests"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Document with the `/api` paths moved under the configured prefix.
    pub fn with_prefix(api_prefix: &str) -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        let prefix = api_prefix.trim_end_matches('/');

        doc.paths.paths = std::mem::take(&mut doc.paths.paths)
            .into_iter()
            .map(|(path, item)| match path.strip_prefix("/api/") {
                Some(rest) => (format!("{prefix}/{rest}"), item),
                None => (path, item),
            })
            .collect();
        doc
    }
}
