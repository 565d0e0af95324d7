use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{
        DepartmentPayrollTotal, Payroll, PayrollStats, PayrollStatsQuery, PayrollStatus,
    },
    utils::sql,
};

const PAYROLL_COLUMNS: &str = r#"
    id, employee_id, month, year, base_salary, allowances, deductions, tax,
    net_salary, status, created_at, updated_at
"#;

#[derive(Clone)]
pub struct PayrollRepository {
    pool: PgPool,
}

impl PayrollRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        employee_id: Uuid,
        month: i32,
        year: i32,
        base_salary: f64,
        allowances: f64,
        deductions: f64,
        tax: f64,
        net_salary: f64,
    ) -> Result<Payroll> {
        let payroll = sqlx::query_as::<_, Payroll>(&sql(&format!(
            r#"
            INSERT INTO
                payrolls (
                    employee_id, month, year, base_salary, allowances,
                    deductions, tax, net_salary, status
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                {PAYROLL_COLUMNS}
            "#
        )))
        .bind(employee_id)
        .bind(month)
        .bind(year)
        .bind(base_salary)
        .bind(allowances)
        .bind(deductions)
        .bind(tax)
        .bind(net_salary)
        .bind(PayrollStatus::Draft)
        .fetch_one(&self.pool)
        .await?;

        Ok(payroll)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Payroll>> {
        let payroll = sqlx::query_as::<_, Payroll>(&format!(
            "SELECT {PAYROLL_COLUMNS} FROM payrolls WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payroll)
    }

    /// One payroll record per employee per period.
    pub async fn exists_for_period(
        &self,
        employee_id: Uuid,
        month: i32,
        year: i32,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM payrolls WHERE employee_id = $1 AND month = $2 AND year = $3)",
        )
        .bind(employee_id)
        .bind(month)
        .bind(year)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Get payroll records with optional filtering
    pub async fn get_records(
        &self,
        employee_id: Option<Uuid>,
        month: Option<i32>,
        year: Option<i32>,
        status: Option<PayrollStatus>,
    ) -> Result<Vec<Payroll>> {
        let mut query = format!("SELECT {PAYROLL_COLUMNS} FROM payrolls");

        let mut conditions = vec![];
        let mut param_index = 0;

        if employee_id.is_some() {
            param_index += 1;
            conditions.push(format!("employee_id = ${}", param_index));
        }
        if month.is_some() {
            param_index += 1;
            conditions.push(format!("month = ${}", param_index));
        }
        if year.is_some() {
            param_index += 1;
            conditions.push(format!("year = ${}", param_index));
        }
        if status.is_some() {
            param_index += 1;
            conditions.push(format!("status = ${}", param_index));
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY year DESC, month DESC, created_at DESC");

        let mut prepared = sqlx::query_as::<_, Payroll>(&query);
        if let Some(eid) = employee_id {
            prepared = prepared.bind(eid);
        }
        if let Some(m) = month {
            prepared = prepared.bind(m);
        }
        if let Some(y) = year {
            prepared = prepared.bind(y);
        }
        if let Some(s) = status {
            prepared = prepared.bind(s);
        }

        let payrolls = prepared.fetch_all(&self.pool).await?;

        Ok(payrolls)
    }

    /// Overwrite the monetary fields; callers pass the merged values.
    pub async fn update_amounts(
        &self,
        id: Uuid,
        base_salary: f64,
        allowances: f64,
        deductions: f64,
        tax: f64,
        net_salary: f64,
    ) -> Result<Payroll> {
        let payroll = sqlx::query_as::<_, Payroll>(&sql(&format!(
            r#"
            UPDATE
                payrolls
            SET
                base_salary = ?,
                allowances = ?,
                deductions = ?,
                tax = ?,
                net_salary = ?,
                updated_at = NOW()
            WHERE
                id = ?
            RETURNING
                {PAYROLL_COLUMNS}
            "#
        )))
        .bind(base_salary)
        .bind(allowances)
        .bind(deductions)
        .bind(tax)
        .bind(net_salary)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(payroll)
    }

    pub async fn update_status(&self, id: Uuid, status: PayrollStatus) -> Result<Payroll> {
        let payroll = sqlx::query_as::<_, Payroll>(&sql(&format!(
            r#"
            UPDATE
                payrolls
            SET
                status = ?,
                updated_at = NOW()
            WHERE
                id = ?
            RETURNING
                {PAYROLL_COLUMNS}
            "#
        )))
        .bind(status)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(payroll)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM payrolls WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn statistics(&self, query: &PayrollStatsQuery) -> Result<PayrollStats> {
        let row: (i64, i64, i64, i64, f64, f64, f64, f64, f64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'draft'),
                COUNT(*) FILTER (WHERE status = 'processed'),
                COUNT(*) FILTER (WHERE status = 'paid'),
                COALESCE(SUM(base_salary), 0),
                COALESCE(SUM(allowances), 0),
                COALESCE(SUM(deductions), 0),
                COALESCE(SUM(tax), 0),
                COALESCE(SUM(net_salary), 0)
            FROM
                payrolls
            WHERE
                ($1::int IS NULL OR month = $1)
                AND ($2::int IS NULL OR year = $2)
            "#,
        )
        .bind(query.month)
        .bind(query.year)
        .fetch_one(&self.pool)
        .await?;

        let by_department = sqlx::query_as::<_, DepartmentPayrollTotal>(
            r#"
            SELECT
                d.id AS department_id,
                d.name AS department_name,
                COUNT(p.id) AS records,
                COALESCE(SUM(p.net_salary), 0) AS total_net_salary
            FROM
                payrolls p
                JOIN employees e ON e.id = p.employee_id
                JOIN departments d ON d.id = e.department_id
            WHERE
                ($1::int IS NULL OR p.month = $1)
                AND ($2::int IS NULL OR p.year = $2)
            GROUP BY
                d.id, d.name
            ORDER BY
                d.name
            "#,
        )
        .bind(query.month)
        .bind(query.year)
        .fetch_all(&self.pool)
        .await?;

        Ok(PayrollStats {
            total_records: row.0,
            draft: row.1,
            processed: row.2,
            paid: row.3,
            total_base_salary: row.4,
            total_allowances: row.5,
            total_deductions: row.6,
            total_tax: row.7,
            total_net_salary: row.8,
            by_department,
        })
    }
}
