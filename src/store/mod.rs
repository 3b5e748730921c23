//! Persistence seam for the attendance service.
//!
//! Every multi-step lifecycle operation is one method here, and implementations
//! must run it atomically: the open-record check and the write that depends on
//! it happen under one transaction (MySQL) or one lock (in-memory).

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::domain::emp_id::EmpId;
use crate::model::{
    asset::AssetRequest,
    attendance::{AttendanceRecord, HrApproval},
    employee::Employee,
};

pub mod memory;
pub mod mysql;

pub use memory::InMemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PunchIn {
    Recorded {
        record: AttendanceRecord,
        /// The stale open record that was closed before inserting, if any.
        auto_closed: Option<AttendanceRecord>,
    },
    AlreadyOpen(AttendanceRecord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Review {
    Updated(AttendanceRecord),
    NotFound,
    StillOpen(AttendanceRecord),
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn ping(&self) -> anyhow::Result<()>;

    async fn find_employee(&self, emp_id: &EmpId) -> anyhow::Result<Option<Employee>>;

    /// Stored argon2 hash, `None` for unknown employees or ones without a credential.
    async fn credential_hash(&self, emp_id: &EmpId) -> anyhow::Result<Option<String>>;

    async fn punch_in(&self, emp_id: &EmpId, now: NaiveDateTime) -> anyhow::Result<PunchIn>;

    /// Closes the open record. `None` when there is nothing to close.
    async fn punch_out(
        &self,
        emp_id: &EmpId,
        now: NaiveDateTime,
    ) -> anyhow::Result<Option<AttendanceRecord>>;

    async fn review(&self, record_id: u64, decision: HrApproval) -> anyhow::Result<Review>;

    /// All records of one employee, newest punch-in first.
    async fn history(&self, emp_id: &EmpId) -> anyhow::Result<Vec<AttendanceRecord>>;

    /// Records with `from <= punch_in < to`, newest first.
    async fn records_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> anyhow::Result<Vec<AttendanceRecord>>;

    async fn create_asset_request(
        &self,
        emp_id: &EmpId,
        asset_type: &str,
        now: NaiveDateTime,
    ) -> anyhow::Result<AssetRequest>;

    async fn asset_requests(&self, emp_id: &EmpId) -> anyhow::Result<Vec<AssetRequest>>;
}
