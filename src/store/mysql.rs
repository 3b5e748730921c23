use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{MySql, MySqlPool, Transaction};
use tracing::{debug, info, warn};

use super::{AttendanceStore, PunchIn, Review};
use crate::domain::emp_id::EmpId;
use crate::domain::lifecycle::{self, PunchInDecision};
use crate::model::{
    asset::{ASSET_STATUS_PENDING, AssetRequest},
    attendance::{AttendanceRecord, AttendanceStatus, HrApproval},
    employee::Employee,
};

// SQLSTATE for a duplicate key on the open-punch unique index, and for a
// deadlock between two punch-ins that both locked the same empty gap.
const DUPLICATE_KEY: &str = "23000";
const DEADLOCK: &str = "40001";

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Locking read, so it waits for a concurrent punch-in to commit.
    async fn open_record(&self, emp_id: &EmpId) -> Result<Option<AttendanceRecord>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let open = lock_open_record(&mut tx, emp_id).await?;
        tx.rollback().await?;
        Ok(open)
    }

    async fn try_punch_in(&self, emp_id: &EmpId, now: NaiveDateTime) -> Result<PunchIn, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let open = lock_open_record(&mut tx, emp_id).await?;

        let auto_closed = match (lifecycle::decide_punch_in(open.as_ref(), now), open) {
            (PunchInDecision::AlreadyOpen, Some(record)) => {
                tx.rollback().await?;
                return Ok(PunchIn::AlreadyOpen(record));
            }
            (PunchInDecision::AutoCloseThenOpen { record_id, close_at }, _) => {
                sqlx::query(
                    r#"
                    UPDATE attendance
                    SET punch_out = ?, status = ?
                    WHERE id = ?
                    "#,
                )
                .bind(close_at)
                .bind(AttendanceStatus::NotDefined.as_ref())
                .bind(record_id)
                .execute(&mut *tx)
                .await?;

                info!(emp_id = %emp_id, record_id, %close_at, "Auto-punched out after 12 hours");
                fetch_record(&mut tx, record_id).await?
            }
            _ => None,
        };

        let known: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE emp_id = ?")
            .bind(emp_id.as_str())
            .fetch_one(&mut *tx)
            .await?;
        let status = lifecycle::opening_status(known > 0);

        let inserted = sqlx::query(
            r#"
            INSERT INTO attendance (emp_id, punch_in, status, hr_approval)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(emp_id.as_str())
        .bind(now)
        .bind(status.as_ref())
        .bind(HrApproval::Pending.as_ref())
        .execute(&mut *tx)
        .await?;

        let record = fetch_record(&mut tx, inserted.last_insert_id())
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        tx.commit().await?;

        Ok(PunchIn::Recorded {
            record,
            auto_closed,
        })
    }
}

async fn lock_open_record(
    tx: &mut Transaction<'_, MySql>,
    emp_id: &EmpId,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, emp_id, punch_in, punch_out, status, hr_approval
        FROM attendance
        WHERE emp_id = ? AND punch_out IS NULL
        ORDER BY punch_in DESC
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(emp_id.as_str())
    .fetch_optional(&mut **tx)
    .await
}

async fn fetch_record(
    tx: &mut Transaction<'_, MySql>,
    record_id: u64,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, emp_id, punch_in, punch_out, status, hr_approval
        FROM attendance
        WHERE id = ?
        "#,
    )
    .bind(record_id)
    .fetch_optional(&mut **tx)
    .await
}

fn sqlstate(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| code.into_owned())
}

fn is_deadlock(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(DEADLOCK)
}

fn is_open_punch_conflict(err: &sqlx::Error) -> bool {
    matches!(sqlstate(err).as_deref(), Some(DUPLICATE_KEY) | Some(DEADLOCK))
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("database ping failed")?;
        Ok(())
    }

    async fn find_employee(&self, emp_id: &EmpId) -> anyhow::Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT emp_id, name, email, role, shift_timing
            FROM employees
            WHERE emp_id = ?
            "#,
        )
        .bind(emp_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch employee")?;

        Ok(employee)
    }

    async fn credential_hash(&self, emp_id: &EmpId) -> anyhow::Result<Option<String>> {
        let hash = sqlx::query_scalar::<_, Option<String>>(
            "SELECT password FROM employees WHERE emp_id = ?",
        )
        .bind(emp_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch employee credential")?;

        Ok(hash.flatten())
    }

    async fn punch_in(&self, emp_id: &EmpId, now: NaiveDateTime) -> anyhow::Result<PunchIn> {
        // A deadlock victim retries once: its locking read then waits on the
        // winner's row and sees it as already open.
        let attempt = match self.try_punch_in(emp_id, now).await {
            Err(e) if is_deadlock(&e) => {
                warn!(error = %e, emp_id = %emp_id, "Punch-in deadlocked, retrying once");
                self.try_punch_in(emp_id, now).await
            }
            other => other,
        };

        match attempt {
            Ok(outcome) => Ok(outcome),
            Err(e) if is_open_punch_conflict(&e) => {
                warn!(error = %e, emp_id = %emp_id, "Concurrent punch-in lost the race");
                match self.open_record(emp_id).await.context("failed to re-read open punch")? {
                    Some(record) => Ok(PunchIn::AlreadyOpen(record)),
                    None => Err(anyhow::Error::new(e).context("punch-in conflict without open punch")),
                }
            }
            Err(e) => Err(anyhow::Error::new(e).context("punch-in failed")),
        }
    }

    async fn punch_out(
        &self,
        emp_id: &EmpId,
        now: NaiveDateTime,
    ) -> anyhow::Result<Option<AttendanceRecord>> {
        let mut tx = self.pool.begin().await.context("failed to begin transaction")?;

        let Some(open) = lock_open_record(&mut tx, emp_id)
            .await
            .context("failed to lock open punch")?
        else {
            tx.rollback().await.context("failed to roll back")?;
            return Ok(None);
        };

        let status = lifecycle::closing_status(open.status);
        debug!(emp_id = %emp_id, record_id = open.id, %status, "Closing open punch");

        sqlx::query(
            r#"
            UPDATE attendance
            SET punch_out = ?, status = ?, hr_approval = ?
            WHERE id = ?
            "#,
        )
        .bind(now)
        .bind(status.as_ref())
        .bind(HrApproval::Pending.as_ref())
        .bind(open.id)
        .execute(&mut *tx)
        .await
        .context("failed to close open punch")?;

        let record = fetch_record(&mut tx, open.id)
            .await
            .context("failed to re-read closed punch")?;

        tx.commit().await.context("failed to commit punch-out")?;

        Ok(record)
    }

    async fn review(&self, record_id: u64, decision: HrApproval) -> anyhow::Result<Review> {
        let mut tx = self.pool.begin().await.context("failed to begin transaction")?;

        let record = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, emp_id, punch_in, punch_out, status, hr_approval
            FROM attendance
            WHERE id = ?
            FOR UPDATE
            "#,
        )
        .bind(record_id)
        .fetch_optional(&mut *tx)
        .await
        .context("failed to lock attendance record")?;

        let Some(mut record) = record else {
            tx.rollback().await.context("failed to roll back")?;
            return Ok(Review::NotFound);
        };

        if !lifecycle::can_review(&record) {
            tx.rollback().await.context("failed to roll back")?;
            return Ok(Review::StillOpen(record));
        }

        sqlx::query("UPDATE attendance SET hr_approval = ? WHERE id = ?")
            .bind(decision.as_ref())
            .bind(record_id)
            .execute(&mut *tx)
            .await
            .context("failed to update hr approval")?;

        tx.commit().await.context("failed to commit review")?;

        record.hr_approval = decision;
        Ok(Review::Updated(record))
    }

    async fn history(&self, emp_id: &EmpId) -> anyhow::Result<Vec<AttendanceRecord>> {
        let records = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, emp_id, punch_in, punch_out, status, hr_approval
            FROM attendance
            WHERE emp_id = ?
            ORDER BY punch_in DESC, id DESC
            "#,
        )
        .bind(emp_id.as_str())
        .fetch_all(&self.pool)
        .await
        .context("failed to fetch attendance history")?;

        Ok(records)
    }

    async fn records_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> anyhow::Result<Vec<AttendanceRecord>> {
        let records = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, emp_id, punch_in, punch_out, status, hr_approval
            FROM attendance
            WHERE punch_in >= ? AND punch_in < ?
            ORDER BY punch_in DESC, id DESC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .context("failed to fetch attendance for range")?;

        Ok(records)
    }

    async fn create_asset_request(
        &self,
        emp_id: &EmpId,
        asset_type: &str,
        now: NaiveDateTime,
    ) -> anyhow::Result<AssetRequest> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO assets (emp_id, asset_type, request_date, status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(emp_id.as_str())
        .bind(asset_type)
        .bind(now)
        .bind(ASSET_STATUS_PENDING)
        .execute(&self.pool)
        .await
        .context("failed to insert asset request")?;

        let request = sqlx::query_as::<_, AssetRequest>(
            r#"
            SELECT id, emp_id, asset_type, request_date, status
            FROM assets
            WHERE id = ?
            "#,
        )
        .bind(inserted.last_insert_id())
        .fetch_one(&self.pool)
        .await
        .context("failed to re-read asset request")?;

        Ok(request)
    }

    async fn asset_requests(&self, emp_id: &EmpId) -> anyhow::Result<Vec<AssetRequest>> {
        let requests = sqlx::query_as::<_, AssetRequest>(
            r#"
            SELECT id, emp_id, asset_type, request_date, status
            FROM assets
            WHERE emp_id = ?
            ORDER BY request_date DESC, id DESC
            "#,
        )
        .bind(emp_id.as_str())
        .fetch_all(&self.pool)
        .await
        .context("failed to fetch asset requests")?;

        Ok(requests)
    }
}
