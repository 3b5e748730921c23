use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::{Executor, MySqlPool};
use sqlx::mysql::MySqlPoolOptions;
use tracing::{error, info, warn};

use crate::auth::password::hash_password;
use crate::config::Config;
use crate::model::employee::SEED_EMPLOYEES;

const DROP_TABLES: &[&str] = &[
    "DROP TABLE IF EXISTS assets",
    "DROP TABLE IF EXISTS attendance",
    "DROP TABLE IF EXISTS employees",
];

// `open_emp_id` equals `emp_id` only while the punch is open, so the unique
// key allows at most one open punch per employee.
const CREATE_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        emp_id VARCHAR(7) PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(100) NOT NULL UNIQUE,
        password VARCHAR(255) NULL,
        role VARCHAR(50) NULL,
        shift_timing VARCHAR(50) NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        emp_id VARCHAR(7) NOT NULL,
        punch_in DATETIME NOT NULL,
        punch_out DATETIME NULL,
        status VARCHAR(20) NOT NULL DEFAULT 'in-progress',
        hr_approval VARCHAR(20) NOT NULL DEFAULT 'pending',
        open_emp_id VARCHAR(7) GENERATED ALWAYS AS (IF(punch_out IS NULL, emp_id, NULL)) STORED,
        UNIQUE KEY uq_attendance_open_punch (open_emp_id),
        KEY idx_attendance_emp_punch_in (emp_id, punch_in),
        KEY idx_attendance_punch_in (punch_in)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS assets (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        emp_id VARCHAR(7) NOT NULL,
        asset_type VARCHAR(50) NOT NULL,
        request_date DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        status VARCHAR(20) NOT NULL DEFAULT 'pending',
        KEY idx_assets_emp (emp_id, request_date)
    )
    "#,
];

/// Connects with a fixed delay between attempts. Exhausting the attempts is fatal.
pub async fn init_db(config: &Config) -> Result<MySqlPool> {
    let attempts = config.db_connect_retries.max(1);
    let delay = Duration::from_secs(config.db_connect_retry_delay_secs);

    let mut attempt = 1;
    loop {
        match MySqlPoolOptions::new()
            .max_connections(config.db_max_connections.max(1))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => {
                info!(attempt, "Database connection successful");
                return Ok(pool);
            }
            Err(e) if attempt < attempts => {
                warn!(error = %e, attempt, attempts, "Database connection failed, retrying");
                actix_web::rt::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                error!(error = %e, attempt, "Database connection failed, giving up");
                return Err(e).context("failed to connect to database");
            }
        }
    }
}

/// Creates the tables, dropping them first when `reset` is set. DDL goes
/// through the text protocol.
pub async fn prepare_schema(pool: &MySqlPool, reset: bool) -> Result<()> {
    if reset {
        warn!("Resetting schema: all attendance, employee and asset data is discarded");
        for statement in DROP_TABLES {
            pool.execute(*statement)
                .await
                .with_context(|| format!("schema reset failed: {statement}"))?;
        }
    }

    for statement in CREATE_TABLES {
        pool.execute(*statement)
            .await
            .context("failed to create tables")?;
    }

    info!("Database initialized successfully");
    Ok(())
}

pub async fn seed_employees(pool: &MySqlPool) -> Result<()> {
    for employee in SEED_EMPLOYEES {
        let hashed = hash_password(employee.password)
            .map_err(|e| anyhow::anyhow!("failed to hash seed password: {e}"))?;

        sqlx::query(
            r#"
            INSERT IGNORE INTO employees (emp_id, name, email, password, role, shift_timing)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(employee.emp_id)
        .bind(employee.name)
        .bind(employee.email)
        .bind(hashed)
        .bind(employee.role)
        .bind(employee.shift_timing)
        .execute(pool)
        .await
        .with_context(|| format!("failed to seed employee {}", employee.emp_id))?;
    }

    info!(count = SEED_EMPLOYEES.len(), "Seed employees ready");
    Ok(())
}
