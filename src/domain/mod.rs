pub mod clock;
pub mod emp_id;
pub mod lifecycle;
pub mod service;

pub use clock::{Clock, SystemClock};
pub use emp_id::EmpId;
pub use service::{AttendanceService, PunchInOutcome, PunchOutOutcome};
