//! Punch lifecycle rules shared by every store implementation.
//!
//! Stores run these decisions inside their own atomic section so the check and
//! the write cannot interleave with another request for the same employee.

use chrono::{Duration, NaiveDateTime};

use crate::model::attendance::{AttendanceRecord, AttendanceStatus};

/// An open punch this old (or older) is closed by the next punch-in.
pub const AUTO_PUNCH_OUT_HOURS: i64 = 12;

pub fn auto_punch_out_after() -> Duration {
    Duration::hours(AUTO_PUNCH_OUT_HOURS)
}

/// What a punch-in should do given the employee's current open record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunchInDecision {
    /// No open record: insert a new one.
    Open,
    /// The open record went stale: close it at `close_at`, then insert.
    AutoCloseThenOpen { record_id: u64, close_at: NaiveDateTime },
    /// A fresh open record exists; reject.
    AlreadyOpen,
}

pub fn decide_punch_in(open: Option<&AttendanceRecord>, now: NaiveDateTime) -> PunchInDecision {
    match open {
        None => PunchInDecision::Open,
        Some(record) if is_stale(record, now) => PunchInDecision::AutoCloseThenOpen {
            record_id: record.id,
            close_at: auto_close_time(record),
        },
        Some(_) => PunchInDecision::AlreadyOpen,
    }
}

pub fn is_stale(record: &AttendanceRecord, now: NaiveDateTime) -> bool {
    now - record.punch_in >= auto_punch_out_after()
}

/// Auto-closed records end at the 12-hour boundary, not at the time the
/// closure happened to be noticed.
pub fn auto_close_time(record: &AttendanceRecord) -> NaiveDateTime {
    record.punch_in + auto_punch_out_after()
}

/// Unknown employees get a provisional record that waits for HR onboarding.
pub fn opening_status(known_employee: bool) -> AttendanceStatus {
    if known_employee {
        AttendanceStatus::InProgress
    } else {
        AttendanceStatus::Pending
    }
}

pub fn closing_status(open_status: AttendanceStatus) -> AttendanceStatus {
    match open_status {
        AttendanceStatus::Pending => AttendanceStatus::Pending,
        _ => AttendanceStatus::FullDay,
    }
}

/// HR can only mark finished shifts; auto-closed ones count as finished.
pub fn can_review(record: &AttendanceRecord) -> bool {
    record.punch_out.is_some() || record.status == AttendanceStatus::NotDefined
}

pub fn punch_in_message(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Pending => "Punch-in recorded, pending HR approval",
        _ => "Punch-in recorded",
    }
}

pub fn punch_out_message(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Pending => "Punch-out recorded, pending HR approval",
        _ => "Punch-out recorded",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::HrApproval;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn open_record(punch_in: NaiveDateTime, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: 7,
            emp_id: "ATS0123".into(),
            punch_in,
            punch_out: None,
            status,
            hr_approval: HrApproval::Pending,
        }
    }

    #[test]
    fn no_open_record_opens() {
        assert_eq!(decide_punch_in(None, at(9, 0)), PunchInDecision::Open);
    }

    #[test]
    fn fresh_open_record_rejects() {
        let record = open_record(at(9, 0), AttendanceStatus::InProgress);
        assert_eq!(
            decide_punch_in(Some(&record), at(20, 59)),
            PunchInDecision::AlreadyOpen
        );
    }

    #[test]
    fn record_at_exactly_twelve_hours_is_auto_closed_at_boundary() {
        let record = open_record(at(8, 30), AttendanceStatus::InProgress);
        assert_eq!(
            decide_punch_in(Some(&record), at(20, 30)),
            PunchInDecision::AutoCloseThenOpen {
                record_id: 7,
                close_at: at(20, 30),
            }
        );

        let much_later = at(8, 30) + Duration::days(3);
        assert_eq!(
            decide_punch_in(Some(&record), much_later),
            PunchInDecision::AutoCloseThenOpen {
                record_id: 7,
                close_at: at(20, 30),
            }
        );
    }

    #[test]
    fn pending_stays_pending_on_close() {
        assert_eq!(
            closing_status(AttendanceStatus::Pending),
            AttendanceStatus::Pending
        );
        assert_eq!(
            closing_status(AttendanceStatus::InProgress),
            AttendanceStatus::FullDay
        );
        assert_eq!(opening_status(false), AttendanceStatus::Pending);
        assert_eq!(opening_status(true), AttendanceStatus::InProgress);
    }

    #[test]
    fn review_requires_closed_or_not_defined() {
        let mut record = open_record(at(9, 0), AttendanceStatus::InProgress);
        assert!(!can_review(&record));

        record.status = AttendanceStatus::Pending;
        assert!(!can_review(&record));

        record.status = AttendanceStatus::NotDefined;
        assert!(can_review(&record));

        record.status = AttendanceStatus::FullDay;
        record.punch_out = Some(at(18, 0));
        assert!(can_review(&record));
    }

    #[test]
    fn messages_mention_hr_only_for_pending() {
        assert!(punch_in_message(AttendanceStatus::Pending).contains("HR"));
        assert_eq!(punch_in_message(AttendanceStatus::InProgress), "Punch-in recorded");
        assert!(punch_out_message(AttendanceStatus::Pending).contains("HR"));
        assert_eq!(punch_out_message(AttendanceStatus::FullDay), "Punch-out recorded");
    }
}
