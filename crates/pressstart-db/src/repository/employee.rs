//! # Employee Repository
//!
//! Store staff: hiring, updates, search and back-office login.

use pressstart_core::search::entities::EMPLOYEES;
use pressstart_core::{Employee, NewEmployee, SearchCriteria};
use sqlx::PgPool;
use tracing::{debug, info};

use super::{fetch_all, fetch_by_id, fetch_search, validated, write_failed};
use crate::credentials::{hash_password, verify_password};
use crate::error::{DbError, DbResult};

/// Repository for employees.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: PgPool) -> Self {
        EmployeeRepository { pool }
    }

    /// Searches employees by `id`, `email`, `firstName`, `lastName` and
    /// `jobTitle`. Text keys match case-insensitive prefixes.
    pub async fn search(&self, criteria: &SearchCriteria) -> DbResult<Vec<Employee>> {
        fetch_search(&self.pool, &EMPLOYEES, criteria).await
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Employee>> {
        fetch_by_id(&self.pool, &EMPLOYEES, id).await
    }

    pub async fn all(&self) -> DbResult<Vec<Employee>> {
        fetch_all(&self.pool, &EMPLOYEES).await
    }

    /// Hires an employee, hashing the initial password.
    pub async fn create(&self, employee: &NewEmployee) -> DbResult<Employee> {
        validated("employee", employee)?;
        let password_hash = hash_password(&employee.password)?;

        let created = sqlx::query_as::<_, Employee>(&format!(
            r#"
            INSERT INTO tbl_employees (
                employee_password_hash, employee_first_name, employee_last_name,
                employee_job_title, employee_phone, employee_email, employee_address,
                employee_postal_code, employee_availability, employee_wage_cents,
                employee_manager
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            EMPLOYEES.columns
        ))
        .bind(&password_hash)
        .bind(&employee.employee_first_name)
        .bind(&employee.employee_last_name)
        .bind(&employee.employee_job_title)
        .bind(&employee.employee_phone)
        .bind(&employee.employee_email)
        .bind(&employee.employee_address)
        .bind(employee.employee_postal_code.as_deref().map(str::to_ascii_uppercase))
        .bind(&employee.employee_availability)
        .bind(employee.employee_wage_cents)
        .bind(employee.employee_manager)
        .fetch_one(&self.pool)
        .await
        .map_err(write_failed("employee", "insert"))?;

        info!(id = created.employee_id, manager = created.employee_manager, "Employee hired");
        Ok(created)
    }

    /// Updates an employee record. The password hash is left untouched.
    pub async fn update(&self, employee: &Employee) -> DbResult<Employee> {
        validated("employee", employee)?;
        debug!(id = employee.employee_id, "Updating employee");

        let updated = sqlx::query_as::<_, Employee>(&format!(
            r#"
            UPDATE tbl_employees SET
                employee_first_name = $1,
                employee_last_name = $2,
                employee_job_title = $3,
                employee_phone = $4,
                employee_email = $5,
                employee_address = $6,
                employee_postal_code = $7,
                employee_availability = $8,
                employee_wage_cents = $9,
                employee_manager = $10
            WHERE employee_id = $11
            RETURNING {}
            "#,
            EMPLOYEES.columns
        ))
        .bind(&employee.employee_first_name)
        .bind(&employee.employee_last_name)
        .bind(&employee.employee_job_title)
        .bind(&employee.employee_phone)
        .bind(&employee.employee_email)
        .bind(&employee.employee_address)
        .bind(employee.employee_postal_code.as_deref().map(str::to_ascii_uppercase))
        .bind(&employee.employee_availability)
        .bind(employee.employee_wage_cents)
        .bind(employee.employee_manager)
        .bind(employee.employee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_failed("employee", "update"))?;

        updated.ok_or_else(|| DbError::not_found("Employee", employee.employee_id))
    }

    /// Checks a back-office login; `Ok(None)` on unknown email or wrong password.
    pub async fn authenticate(&self, email: &str, password: &str) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {} FROM tbl_employees WHERE lower(employee_email) = lower($1)",
            EMPLOYEES.columns
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        let verified = employee.filter(|e| verify_password(password, &e.employee_password_hash));
        debug!(success = verified.is_some(), "Employee login attempt");

        Ok(verified)
    }
}
