#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Shared fixtures: an in-memory store, a hand-driven clock and the app config.

use std::sync::Arc;

use actix_web::test::TestRequest;
use actix_web::web::Data;
use attendance::config::Config;
use attendance::domain::{AttendanceService, Clock};
use attendance::model::employee::Employee;
use attendance::routes::RateLimits;
use attendance::store::InMemoryStore;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use parking_lot::Mutex;

pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn starting_at(now: NaiveDateTime) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}

/// Monday 2026-01-05 09:00 local time.
pub fn monday_morning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 5)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

pub fn employee(emp_id: &str, name: &str) -> Employee {
    Employee {
        emp_id: emp_id.to_string(),
        name: name.to_string(),
        email: format!("{}@company.com", emp_id.to_lowercase()),
        role: Some("Developer".to_string()),
        shift_timing: Some("10:00 AM - 7:00 PM".to_string()),
    }
}

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<ManualClock>,
    pub service: Data<AttendanceService>,
}

/// Directory with ATS0123 and ATS0456, no credentials stored.
pub fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    store.insert_employee(employee("ATS0123", "Employee One"), None);
    store.insert_employee(employee("ATS0456", "Employee Two"), None);

    let clock = ManualClock::starting_at(monday_morning());
    let service = Data::new(AttendanceService::new(store.clone(), clock.clone()));

    Harness {
        store,
        clock,
        service,
    }
}

pub fn test_config() -> Config {
    Config {
        rate_punch_per_min: 10_000,
        rate_api_per_min: 10_000,
        ..Config::default()
    }
}

pub fn test_limits() -> RateLimits {
    RateLimits::from_config(&test_config()).unwrap()
}

/// Rate limiting keys on the peer address, which test requests lack by default.
pub fn peer(req: TestRequest) -> TestRequest {
    req.peer_addr("127.0.0.1:40000".parse().unwrap())
}

/// Builds the full route table over a harness. Needs `#[macro_use] mod common;`.
#[allow(unused_macros)]
macro_rules! init_app {
    ($harness:expr) => {{
        let config = common::test_config();
        let limits = common::test_limits();
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(attendance::routes::cors(&config))
                .app_data($harness.service.clone())
                .configure(|cfg| attendance::routes::configure(cfg, &config, &limits)),
        )
        .await
    }};
}
