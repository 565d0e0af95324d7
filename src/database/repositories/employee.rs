use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{Employee, EmployeeInput, EmployeeWithDetails},
    utils::sql,
};

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: EmployeeInput) -> Result<Employee> {
        let employee = sqlx::query_as::<_, Employee>(&sql(r#"
            INSERT INTO
                employees (user_id, department_id, position, salary, date_of_joining)
            VALUES
                (?, ?, ?, ?, ?)
            RETURNING
                id, user_id, department_id, position, salary, date_of_joining,
                created_at, updated_at
        "#))
        .bind(input.user_id)
        .bind(input.department_id)
        .bind(input.position)
        .bind(input.salary)
        .bind(input.date_of_joining)
        .fetch_one(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT
                id, user_id, department_id, position, salary, date_of_joining,
                created_at, updated_at
            FROM
                employees
            WHERE
                id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Employee record backing the authenticated user, if any.
    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT
                id, user_id, department_id, position, salary, date_of_joining,
                created_at, updated_at
            FROM
                employees
            WHERE
                user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn user_has_employee(&self, user_id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM employees WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    pub async fn get_all_with_details(
        &self,
        department_id: Option<Uuid>,
    ) -> Result<Vec<EmployeeWithDetails>> {
        let employees = sqlx::query_as::<_, EmployeeWithDetails>(
            r#"
            SELECT
                e.id,
                e.user_id,
                u.name,
                u.email,
                e.department_id,
                d.name AS department_name,
                e.position,
                e.salary,
                e.date_of_joining,
                e.created_at
            FROM
                employees e
                JOIN users u ON u.id = e.user_id
                LEFT JOIN departments d ON d.id = e.department_id
            WHERE
                ($1::uuid IS NULL OR e.department_id = $1)
            ORDER BY
                u.name
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    pub async fn find_with_details(&self, id: Uuid) -> Result<Option<EmployeeWithDetails>> {
        let employee = sqlx::query_as::<_, EmployeeWithDetails>(
            r#"
            SELECT
                e.id,
                e.user_id,
                u.name,
                u.email,
                e.department_id,
                d.name AS department_name,
                e.position,
                e.salary,
                e.date_of_joining,
                e.created_at
            FROM
                employees e
                JOIN users u ON u.id = e.user_id
                LEFT JOIN departments d ON d.id = e.department_id
            WHERE
                e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Plain employee rows matching the optional filters, for bulk payroll
    /// generation.
    pub async fn get_all(
        &self,
        department_id: Option<Uuid>,
        employee_id: Option<Uuid>,
    ) -> Result<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT
                id, user_id, department_id, position, salary, date_of_joining,
                created_at, updated_at
            FROM
                employees
            WHERE
                ($1::uuid IS NULL OR department_id = $1)
                AND ($2::uuid IS NULL OR id = $2)
            ORDER BY
                date_of_joining
            "#,
        )
        .bind(department_id)
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Join date is intentionally not updatable.
    pub async fn update(
        &self,
        id: Uuid,
        department_id: Option<Uuid>,
        position: &str,
        salary: f64,
    ) -> Result<Employee> {
        let employee = sqlx::query_as::<_, Employee>(&sql(r#"
            UPDATE
                employees
            SET
                department_id = ?,
                position = ?,
                salary = ?,
                updated_at = NOW()
            WHERE
                id = ?
            RETURNING
                id, user_id, department_id, position, salary, date_of_joining,
                created_at, updated_at
        "#))
        .bind(department_id)
        .bind(position)
        .bind(salary)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// True when payroll, leave or attendance rows still reference the
    /// employee; those block deletion.
    pub async fn has_dependent_records(&self, id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT
                EXISTS (SELECT 1 FROM attendance WHERE employee_id = $1)
                OR EXISTS (SELECT 1 FROM leaves WHERE employee_id = $1)
                OR EXISTS (SELECT 1 FROM payrolls WHERE employee_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
