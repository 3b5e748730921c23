#![allow(clippy::unwrap_used, clippy::expect_used)]

//! MySQL store behaviour against a live server. Every test returns early when
//! `DATABASE_URL` is unset. Tables are created if missing, never dropped, and
//! each test owns its own employee IDs.

use std::sync::Arc;

use attendance::db;
use attendance::domain::EmpId;
use attendance::model::attendance::{AttendanceStatus, HrApproval};
use attendance::store::{AttendanceStore, MySqlStore, PunchIn, Review};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

async fn connect(emp_ids: &[&str]) -> Option<(MySqlPool, Arc<MySqlStore>)> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping MySQL store test");
        return None;
    };

    let pool = MySqlPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect to DATABASE_URL");
    db::prepare_schema(&pool, false).await.expect("create tables");

    for emp_id in emp_ids {
        sqlx::query("DELETE FROM attendance WHERE emp_id = ?")
            .bind(emp_id)
            .execute(&pool)
            .await
            .unwrap();
    }

    Some((pool.clone(), Arc::new(MySqlStore::new(pool))))
}

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 2, 2)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn emp(raw: &str) -> EmpId {
    EmpId::parse(raw).unwrap()
}

#[actix_web::test]
async fn punch_in_conflict_and_punch_out() {
    let Some((pool, store)) = connect(&["ATS0902"]).await else {
        return;
    };
    sqlx::query(
        "INSERT IGNORE INTO employees (emp_id, name, email) VALUES ('ATS0902', 'Store Test', 'ats0902@store.test')",
    )
    .execute(&pool)
    .await
    .unwrap();
    let id = emp("ATS0902");

    let PunchIn::Recorded { record, auto_closed } = store.punch_in(&id, at(9)).await.unwrap() else {
        panic!("first punch-in should be recorded");
    };
    assert_eq!(record.status, AttendanceStatus::InProgress);
    assert!(auto_closed.is_none());

    match store.punch_in(&id, at(10)).await.unwrap() {
        PunchIn::AlreadyOpen(open) => assert_eq!(open.id, record.id),
        other => panic!("expected open record, got {other:?}"),
    }

    let closed = store.punch_out(&id, at(18)).await.unwrap().unwrap();
    assert_eq!(closed.status, AttendanceStatus::FullDay);
    assert_eq!(closed.punch_out, Some(at(18)));
    assert!(store.punch_out(&id, at(19)).await.unwrap().is_none());
}

#[actix_web::test]
async fn stale_punch_is_closed_at_the_boundary() {
    let Some((_pool, store)) = connect(&["ATS0903"]).await else {
        return;
    };
    let id = emp("ATS0903");

    store.punch_in(&id, at(6)).await.unwrap();
    let PunchIn::Recorded { record, auto_closed } =
        store.punch_in(&id, at(6) + Duration::hours(20)).await.unwrap()
    else {
        panic!("stale punch should be replaced");
    };

    let closed = auto_closed.expect("stale record closed");
    assert_eq!(closed.status, AttendanceStatus::NotDefined);
    assert_eq!(closed.punch_out, Some(at(18)));
    // Not in the directory
    assert_eq!(record.status, AttendanceStatus::Pending);

    let history = store.history(&id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, record.id);
}

#[actix_web::test]
async fn review_requires_a_closed_record() {
    let Some((_pool, store)) = connect(&["ATS0904"]).await else {
        return;
    };
    let id = emp("ATS0904");

    let PunchIn::Recorded { record, .. } = store.punch_in(&id, at(8)).await.unwrap() else {
        panic!("punch-in should be recorded");
    };
    assert!(matches!(
        store.review(record.id, HrApproval::Approved).await.unwrap(),
        Review::StillOpen(_)
    ));

    store.punch_out(&id, at(16)).await.unwrap();
    match store.review(record.id, HrApproval::Rejected).await.unwrap() {
        Review::Updated(reviewed) => assert_eq!(reviewed.hr_approval, HrApproval::Rejected),
        other => panic!("expected update, got {other:?}"),
    }
    assert_eq!(
        store.history(&id).await.unwrap()[0].hr_approval,
        HrApproval::Rejected
    );
    assert!(matches!(
        store.review(u64::MAX, HrApproval::Approved).await.unwrap(),
        Review::NotFound
    ));
}

#[actix_web::test]
async fn unique_index_rejects_a_second_open_row() {
    let Some((pool, store)) = connect(&["ATS0905"]).await else {
        return;
    };
    store.punch_in(&emp("ATS0905"), at(9)).await.unwrap();

    let err = sqlx::query(
        "INSERT INTO attendance (emp_id, punch_in, status, hr_approval) VALUES ('ATS0905', ?, 'pending', 'pending')",
    )
    .bind(at(10))
    .execute(&pool)
    .await
    .unwrap_err();

    let code = err.as_database_error().and_then(|e| e.code()).unwrap();
    assert_eq!(code, "23000");
}

#[actix_web::test]
async fn concurrent_first_punch_ins_leave_one_open_record() {
    let Some((_pool, store)) = connect(&["ATS0906"]).await else {
        return;
    };

    let tasks: Vec<_> = (0..2)
        .map(|_| {
            let store = store.clone();
            actix_web::rt::spawn(async move { store.punch_in(&emp("ATS0906"), at(9)).await })
        })
        .collect();

    let mut recorded = 0;
    let mut already_open = 0;
    for task in tasks {
        match task.await.unwrap().expect("no internal error on a lost race") {
            PunchIn::Recorded { .. } => recorded += 1,
            PunchIn::AlreadyOpen(_) => already_open += 1,
        }
    }
    assert_eq!((recorded, already_open), (1, 1));

    let history = store.history(&emp("ATS0906")).await.unwrap();
    assert_eq!(history.iter().filter(|r| r.is_open()).count(), 1);
}
