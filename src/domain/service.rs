use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, info, instrument};

use super::clock::{Clock, SystemClock};
use super::emp_id::EmpId;
use super::lifecycle;
use crate::auth::password::verify_password;
use crate::error::AppError;
use crate::model::{
    asset::AssetRequest,
    attendance::{AttendanceRecord, HrApproval},
    employee::Employee,
};
use crate::store::{AttendanceStore, PunchIn, Review};

const MAX_ASSET_TYPE_LEN: usize = 50;

#[derive(Debug)]
pub struct PunchInOutcome {
    pub message: &'static str,
    pub record: AttendanceRecord,
    pub auto_closed: Option<AttendanceRecord>,
}

#[derive(Debug)]
pub struct PunchOutOutcome {
    pub message: &'static str,
    pub record: AttendanceRecord,
}

/// Attendance lifecycle over an injected store handle.
///
/// Identifiers are validated here, before the store sees them.
pub struct AttendanceService {
    store: Arc<dyn AttendanceStore>,
    clock: Arc<dyn Clock>,
}

impl AttendanceService {
    pub fn new(store: Arc<dyn AttendanceStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn with_system_clock(store: Arc<dyn AttendanceStore>) -> Self {
        Self::new(store, Arc::new(SystemClock))
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub async fn health(&self) -> anyhow::Result<()> {
        self.store.ping().await
    }

    /// Checks that the employee exists and, when a password is given, that it
    /// matches the stored credential.
    #[instrument(name = "validate_employee", skip(self, password))]
    pub async fn validate_employee(
        &self,
        emp_id: &str,
        password: Option<&str>,
    ) -> Result<EmpId, AppError> {
        let emp_id = EmpId::parse(emp_id)?;

        if self.store.find_employee(&emp_id).await?.is_none() {
            info!("Validation for unknown employee");
            return Err(AppError::UnknownEmployee);
        }

        if let Some(password) = password {
            let verified = self
                .store
                .credential_hash(&emp_id)
                .await?
                .is_some_and(|hash| verify_password(password, &hash));
            if !verified {
                info!("Invalid credentials: password mismatch");
                return Err(AppError::InvalidCredentials);
            }
        }

        Ok(emp_id)
    }

    #[instrument(name = "punch_in", skip(self))]
    pub async fn punch_in(&self, emp_id: &str) -> Result<PunchInOutcome, AppError> {
        let emp_id = EmpId::parse(emp_id)?;
        let now = self.now();

        match self.store.punch_in(&emp_id, now).await? {
            PunchIn::AlreadyOpen(record) => {
                debug!(record_id = record.id, "Already punched in");
                Err(AppError::AlreadyPunchedIn(Box::new(record)))
            }
            PunchIn::Recorded {
                record,
                auto_closed,
            } => {
                info!(record_id = record.id, status = %record.status, "Punch-in recorded");
                Ok(PunchInOutcome {
                    message: lifecycle::punch_in_message(record.status),
                    record,
                    auto_closed,
                })
            }
        }
    }

    #[instrument(name = "punch_out", skip(self))]
    pub async fn punch_out(&self, emp_id: &str) -> Result<PunchOutOutcome, AppError> {
        let emp_id = EmpId::parse(emp_id)?;
        let now = self.now();

        let record = self
            .store
            .punch_out(&emp_id, now)
            .await?
            .ok_or(AppError::NoOpenPunch)?;

        info!(record_id = record.id, status = %record.status, "Punch-out recorded");
        Ok(PunchOutOutcome {
            message: lifecycle::punch_out_message(record.status),
            record,
        })
    }

    pub async fn approve(&self, record_id: u64) -> Result<AttendanceRecord, AppError> {
        self.review(record_id, HrApproval::Approved).await
    }

    pub async fn reject(&self, record_id: u64) -> Result<AttendanceRecord, AppError> {
        self.review(record_id, HrApproval::Rejected).await
    }

    #[instrument(name = "hr_review", skip(self))]
    async fn review(
        &self,
        record_id: u64,
        decision: HrApproval,
    ) -> Result<AttendanceRecord, AppError> {
        match self.store.review(record_id, decision).await? {
            Review::Updated(record) => {
                info!("HR decision recorded");
                Ok(record)
            }
            Review::NotFound => Err(AppError::RecordNotFound),
            Review::StillOpen(record) => Err(AppError::RecordStillOpen(Box::new(record))),
        }
    }

    pub async fn history(&self, emp_id: &str) -> Result<Vec<AttendanceRecord>, AppError> {
        let emp_id = EmpId::parse(emp_id)?;
        Ok(self.store.history(&emp_id).await?)
    }

    /// Records punched in on `date` (local day), today when `None`.
    pub async fn attendance_on(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let date = date.unwrap_or_else(|| self.now().date());
        let next = date
            .succ_opt()
            .ok_or_else(|| AppError::validation("Date out of range"))?;

        let records = self
            .store
            .records_between(date.and_time(NaiveTime::MIN), next.and_time(NaiveTime::MIN))
            .await?;
        Ok(records)
    }

    pub async fn employee(&self, emp_id: &str) -> Result<Employee, AppError> {
        let emp_id = EmpId::parse(emp_id)?;
        self.store
            .find_employee(&emp_id)
            .await?
            .ok_or(AppError::EmployeeNotFound)
    }

    #[instrument(name = "request_asset", skip(self))]
    pub async fn request_asset(
        &self,
        emp_id: &str,
        asset_type: &str,
    ) -> Result<AssetRequest, AppError> {
        let emp_id = EmpId::parse(emp_id)?;
        let asset_type = asset_type.trim();
        if asset_type.is_empty() {
            return Err(AppError::validation("Asset type is required"));
        }
        if asset_type.chars().count() > MAX_ASSET_TYPE_LEN {
            return Err(AppError::validation(format!(
                "Asset type must be at most {MAX_ASSET_TYPE_LEN} characters"
            )));
        }

        if self.store.find_employee(&emp_id).await?.is_none() {
            return Err(AppError::EmployeeNotFound);
        }

        let request = self
            .store
            .create_asset_request(&emp_id, asset_type, self.now())
            .await?;
        info!(request_id = request.id, "Asset request created");
        Ok(request)
    }

    pub async fn asset_requests(&self, emp_id: &str) -> Result<Vec<AssetRequest>, AppError> {
        let emp_id = EmpId::parse(emp_id)?;
        Ok(self.store.asset_requests(&emp_id).await?)
    }
}
