use std::collections::HashMap;

use anyhow::bail;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use parking_lot::{Mutex, MutexGuard};
use tracing::info;

use super::{AttendanceStore, PunchIn, Review};
use crate::domain::emp_id::EmpId;
use crate::domain::lifecycle::{self, PunchInDecision};
use crate::model::{
    asset::{ASSET_STATUS_PENDING, AssetRequest},
    attendance::{AttendanceRecord, AttendanceStatus, HrApproval},
    employee::Employee,
};

/// Process-local store. Each operation holds one lock for its whole
/// check-then-write sequence, which gives the same atomicity as the MySQL
/// transactions.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    offline: bool,
    employees: HashMap<String, (Employee, Option<String>)>,
    attendance: Vec<AttendanceRecord>,
    assets: Vec<AssetRequest>,
    next_attendance_id: u64,
    next_asset_id: u64,
}

impl State {
    fn open_record_mut(&mut self, emp_id: &EmpId) -> Option<&mut AttendanceRecord> {
        self.attendance
            .iter_mut()
            .filter(|r| r.emp_id == emp_id.as_str() && r.is_open())
            .max_by_key(|r| (r.punch_in, r.id))
    }
}

fn newest_first(records: &mut [AttendanceRecord]) {
    records.sort_by(|a, b| b.punch_in.cmp(&a.punch_in).then(b.id.cmp(&a.id)));
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directory entry. `password_hash` is an argon2 PHC string.
    pub fn insert_employee(&self, employee: Employee, password_hash: Option<String>) {
        self.state
            .lock()
            .employees
            .insert(employee.emp_id.clone(), (employee, password_hash));
    }

    /// Simulates losing the backing store: every call fails until re-enabled.
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    fn state(&self) -> anyhow::Result<MutexGuard<'_, State>> {
        let state = self.state.lock();
        if state.offline {
            bail!("in-memory store is offline");
        }
        Ok(state)
    }
}

#[async_trait]
impl AttendanceStore for InMemoryStore {
    async fn ping(&self) -> anyhow::Result<()> {
        self.state().map(|_| ())
    }

    async fn find_employee(&self, emp_id: &EmpId) -> anyhow::Result<Option<Employee>> {
        let state = self.state()?;
        Ok(state
            .employees
            .get(emp_id.as_str())
            .map(|(employee, _)| employee.clone()))
    }

    async fn credential_hash(&self, emp_id: &EmpId) -> anyhow::Result<Option<String>> {
        let state = self.state()?;
        Ok(state
            .employees
            .get(emp_id.as_str())
            .and_then(|(_, hash)| hash.clone()))
    }

    async fn punch_in(&self, emp_id: &EmpId, now: NaiveDateTime) -> anyhow::Result<PunchIn> {
        let mut state = self.state()?;

        let decision = lifecycle::decide_punch_in(state.open_record_mut(emp_id).as_deref(), now);
        let auto_closed = match decision {
            PunchInDecision::AlreadyOpen => {
                if let Some(open) = state.open_record_mut(emp_id) {
                    return Ok(PunchIn::AlreadyOpen(open.clone()));
                }
                None
            }
            PunchInDecision::AutoCloseThenOpen { record_id, close_at } => {
                let closed = state
                    .attendance
                    .iter_mut()
                    .find(|r| r.id == record_id)
                    .map(|record| {
                        record.punch_out = Some(close_at);
                        record.status = AttendanceStatus::NotDefined;
                        record.clone()
                    });
                info!(emp_id = %emp_id, record_id, %close_at, "Auto-punched out after 12 hours");
                closed
            }
            PunchInDecision::Open => None,
        };

        let known = state.employees.contains_key(emp_id.as_str());
        state.next_attendance_id += 1;
        let record = AttendanceRecord {
            id: state.next_attendance_id,
            emp_id: emp_id.to_string(),
            punch_in: now,
            punch_out: None,
            status: lifecycle::opening_status(known),
            hr_approval: HrApproval::Pending,
        };
        state.attendance.push(record.clone());

        Ok(PunchIn::Recorded {
            record,
            auto_closed,
        })
    }

    async fn punch_out(
        &self,
        emp_id: &EmpId,
        now: NaiveDateTime,
    ) -> anyhow::Result<Option<AttendanceRecord>> {
        let mut state = self.state()?;

        Ok(state.open_record_mut(emp_id).map(|record| {
            record.status = lifecycle::closing_status(record.status);
            record.punch_out = Some(now);
            record.hr_approval = HrApproval::Pending;
            record.clone()
        }))
    }

    async fn review(&self, record_id: u64, decision: HrApproval) -> anyhow::Result<Review> {
        let mut state = self.state()?;

        let Some(record) = state.attendance.iter_mut().find(|r| r.id == record_id) else {
            return Ok(Review::NotFound);
        };
        if !lifecycle::can_review(record) {
            return Ok(Review::StillOpen(record.clone()));
        }
        record.hr_approval = decision;
        Ok(Review::Updated(record.clone()))
    }

    async fn history(&self, emp_id: &EmpId) -> anyhow::Result<Vec<AttendanceRecord>> {
        let state = self.state()?;
        let mut records: Vec<_> = state
            .attendance
            .iter()
            .filter(|r| r.emp_id == emp_id.as_str())
            .cloned()
            .collect();
        newest_first(&mut records);
        Ok(records)
    }

    async fn records_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> anyhow::Result<Vec<AttendanceRecord>> {
        let state = self.state()?;
        let mut records: Vec<_> = state
            .attendance
            .iter()
            .filter(|r| r.punch_in >= from && r.punch_in < to)
            .cloned()
            .collect();
        newest_first(&mut records);
        Ok(records)
    }

    async fn create_asset_request(
        &self,
        emp_id: &EmpId,
        asset_type: &str,
        now: NaiveDateTime,
    ) -> anyhow::Result<AssetRequest> {
        let mut state = self.state()?;
        state.next_asset_id += 1;
        let request = AssetRequest {
            id: state.next_asset_id,
            emp_id: emp_id.to_string(),
            asset_type: asset_type.to_string(),
            request_date: now,
            status: ASSET_STATUS_PENDING.to_string(),
        };
        state.assets.push(request.clone());
        Ok(request)
    }

    async fn asset_requests(&self, emp_id: &EmpId) -> anyhow::Result<Vec<AssetRequest>> {
        let state = self.state()?;
        let mut requests: Vec<_> = state
            .assets
            .iter()
            .filter(|a| a.emp_id == emp_id.as_str())
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.request_date.cmp(&a.request_date).then(b.id.cmp(&a.id)));
        Ok(requests)
    }
}
