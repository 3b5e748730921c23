use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Directory projection of an employee. The stored credential is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "emp_id": "ATS0123",
        "name": "Employee One",
        "email": "employee1@company.com",
        "role": "Developer",
        "shift_timing": "10:00 AM - 7:00 PM"
    })
)]
pub struct Employee {
    #[schema(example = "ATS0123")]
    pub emp_id: String,

    #[schema(example = "Employee One")]
    pub name: String,

    #[schema(example = "employee1@company.com")]
    pub email: String,

    #[schema(example = "Developer", nullable = true)]
    pub role: Option<String>,

    #[schema(example = "10:00 AM - 7:00 PM", nullable = true)]
    pub shift_timing: Option<String>,
}

/// Seed row used at startup; `password` is plaintext here and hashed before insert.
pub struct NewEmployee {
    pub emp_id: &'static str,
    pub name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub role: &'static str,
    pub shift_timing: &'static str,
}

pub const SEED_EMPLOYEES: &[NewEmployee] = &[
    NewEmployee {
        emp_id: "ATS0123",
        name: "Employee One",
        email: "employee1@company.com",
        password: "password123",
        role: "Developer",
        shift_timing: "10:00 AM - 7:00 PM",
    },
    NewEmployee {
        emp_id: "ATS0456",
        name: "Employee Two",
        email: "employee2@company.com",
        password: "password456",
        role: "Designer",
        shift_timing: "10:00 AM - 7:00 PM",
    },
];
