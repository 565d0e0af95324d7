use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{
        DepartmentCount, Leave, LeaveStats, LeaveStatus, LeaveType, StatsQuery, TypeCount,
    },
    utils::sql,
};
use crate::services::attendance_rules::leave_day_clock_in;
use crate::services::workdays::{business_days, count_business_days};

const LEAVE_COLUMNS: &str = r#"
    id, employee_id, leave_type, start_date, end_date, reason, status,
    comments, created_at, updated_at
"#;

#[derive(Clone)]
pub struct LeaveRepository {
    pool: PgPool,
}

impl LeaveRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new leave request; every request starts out pending.
    pub async fn create(
        &self,
        employee_id: Uuid,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: &str,
    ) -> Result<Leave> {
        let leave = sqlx::query_as::<_, Leave>(&sql(&format!(
            r#"
            INSERT INTO
                leaves (employee_id, leave_type, start_date, end_date, reason, status)
            VALUES
                (?, ?, ?, ?, ?, ?)
            RETURNING
                {LEAVE_COLUMNS}
            "#
        )))
        .bind(employee_id)
        .bind(leave_type)
        .bind(start_date)
        .bind(end_date)
        .bind(reason)
        .bind(LeaveStatus::Pending)
        .fetch_one(&self.pool)
        .await?;

        Ok(leave)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Leave>> {
        let leave = sqlx::query_as::<_, Leave>(&format!(
            "SELECT {LEAVE_COLUMNS} FROM leaves WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(leave)
    }

    /// Get leave requests with optional filtering
    pub async fn get_requests(
        &self,
        employee_id: Option<Uuid>,
        status: Option<LeaveStatus>,
        leave_type: Option<LeaveType>,
    ) -> Result<Vec<Leave>> {
        let mut query = format!("SELECT {LEAVE_COLUMNS} FROM leaves");

        let mut conditions = vec![];
        let mut param_index = 0;

        if employee_id.is_some() {
            param_index += 1;
            conditions.push(format!("employee_id = ${}", param_index));
        }
        if status.is_some() {
            param_index += 1;
            conditions.push(format!("status = ${}", param_index));
        }
        if leave_type.is_some() {
            param_index += 1;
            conditions.push(format!("leave_type = ${}", param_index));
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY created_at DESC");

        let mut prepared = sqlx::query_as::<_, Leave>(&query);
        if let Some(eid) = employee_id {
            prepared = prepared.bind(eid);
        }
        if let Some(s) = status {
            prepared = prepared.bind(s);
        }
        if let Some(t) = leave_type {
            prepared = prepared.bind(t);
        }

        let leaves = prepared.fetch_all(&self.pool).await?;

        Ok(leaves)
    }

    /// True when a pending or approved request for the employee overlaps
    /// `[start_date, end_date]`; `exclude_id` skips the request being
    /// edited.
    pub async fn has_overlapping(
        &self,
        employee_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        exclude_id: Option<Uuid>,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM leaves
                WHERE
                    employee_id = $1
                    AND status IN ('pending', 'approved')
                    AND start_date <= $2
                    AND end_date >= $3
                    AND ($4::uuid IS NULL OR id <> $4)
            )
            "#,
        )
        .bind(employee_id)
        .bind(end_date)
        .bind(start_date)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Replace the editable fields of a pending request; callers pass the
    /// merged values.
    pub async fn update(
        &self,
        id: Uuid,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: &str,
    ) -> Result<Leave> {
        let leave = sqlx::query_as::<_, Leave>(&sql(&format!(
            r#"
            UPDATE
                leaves
            SET
                leave_type = ?,
                start_date = ?,
                end_date = ?,
                reason = ?,
                updated_at = NOW()
            WHERE
                id = ?
            RETURNING
                {LEAVE_COLUMNS}
            "#
        )))
        .bind(leave_type)
        .bind(start_date)
        .bind(end_date)
        .bind(reason)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(leave)
    }

    /// Reject a pending request. Rejection has no attendance side effect.
    pub async fn reject(&self, id: Uuid, comments: Option<String>) -> Result<Leave> {
        let leave = sqlx::query_as::<_, Leave>(&sql(&format!(
            r#"
            UPDATE
                leaves
            SET
                status = ?,
                comments = ?,
                updated_at = NOW()
            WHERE
                id = ?
            RETURNING
                {LEAVE_COLUMNS}
            "#
        )))
        .bind(LeaveStatus::Rejected)
        .bind(comments)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(leave)
    }

    /// Approve a pending request and sync the attendance ledger in the same
    /// transaction: one upsert per weekday in the range. A new row is
    /// pinned to the company start hour with status `leave`; an existing
    /// row only has its status overwritten, clock times untouched. Any
    /// failure rolls back the status change as well.
    pub async fn approve_with_attendance_sync(
        &self,
        leave: &Leave,
        comments: Option<String>,
    ) -> Result<Leave> {
        let mut tx = self.pool.begin().await?;

        let approved = sqlx::query_as::<_, Leave>(&sql(&format!(
            r#"
            UPDATE
                leaves
            SET
                status = ?,
                comments = ?,
                updated_at = NOW()
            WHERE
                id = ?
            RETURNING
                {LEAVE_COLUMNS}
            "#
        )))
        .bind(LeaveStatus::Approved)
        .bind(comments)
        .bind(leave.id)
        .fetch_one(&mut *tx)
        .await?;

        for day in business_days(leave.start_date, leave.end_date) {
            sqlx::query(&sql(r#"
                INSERT INTO
                    attendance (employee_id, date, clock_in, status)
                VALUES
                    (?, ?, ?, 'leave')
                ON CONFLICT (employee_id, date) DO UPDATE
                SET
                    status = 'leave',
                    updated_at = NOW()
            "#))
            .bind(leave.employee_id)
            .bind(day)
            .bind(leave_day_clock_in(day))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(approved)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM leaves WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Approved requests fully contained in the given year, for balance
    /// calculation.
    pub async fn get_approved_in_year(&self, employee_id: Uuid, year: i32) -> Result<Vec<Leave>> {
        let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| anyhow::anyhow!("Invalid year: {year}"))?;
        let dec_last = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| anyhow::anyhow!("Invalid year: {year}"))?;

        let leaves = sqlx::query_as::<_, Leave>(&format!(
            r#"
            SELECT
                {LEAVE_COLUMNS}
            FROM
                leaves
            WHERE
                employee_id = $1
                AND status = 'approved'
                AND start_date >= $2
                AND end_date <= $3
            "#
        ))
        .bind(employee_id)
        .bind(jan_first)
        .bind(dec_last)
        .fetch_all(&self.pool)
        .await?;

        Ok(leaves)
    }

    pub async fn statistics(&self, query: &StatsQuery) -> Result<LeaveStats> {
        let (total, pending, approved, rejected): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE l.status = 'pending'),
                COUNT(*) FILTER (WHERE l.status = 'approved'),
                COUNT(*) FILTER (WHERE l.status = 'rejected')
            FROM
                leaves l
                JOIN employees e ON e.id = l.employee_id
            WHERE
                ($1::date IS NULL OR l.end_date >= $1)
                AND ($2::date IS NULL OR l.start_date <= $2)
                AND ($3::uuid IS NULL OR e.department_id = $3)
            "#,
        )
        .bind(query.start_date)
        .bind(query.end_date)
        .bind(query.department_id)
        .fetch_one(&self.pool)
        .await?;

        let by_type = sqlx::query_as::<_, TypeCount>(
            r#"
            SELECT
                l.leave_type AS name,
                COUNT(*) AS total
            FROM
                leaves l
                JOIN employees e ON e.id = l.employee_id
            WHERE
                ($1::date IS NULL OR l.end_date >= $1)
                AND ($2::date IS NULL OR l.start_date <= $2)
                AND ($3::uuid IS NULL OR e.department_id = $3)
            GROUP BY
                l.leave_type
            ORDER BY
                l.leave_type
            "#,
        )
        .bind(query.start_date)
        .bind(query.end_date)
        .bind(query.department_id)
        .fetch_all(&self.pool)
        .await?;

        let by_department = sqlx::query_as::<_, DepartmentCount>(
            r#"
            SELECT
                d.id AS department_id,
                d.name AS department_name,
                COUNT(l.id) AS total
            FROM
                leaves l
                JOIN employees e ON e.id = l.employee_id
                JOIN departments d ON d.id = e.department_id
            WHERE
                ($1::date IS NULL OR l.end_date >= $1)
                AND ($2::date IS NULL OR l.start_date <= $2)
                AND ($3::uuid IS NULL OR d.id = $3)
            GROUP BY
                d.id, d.name
            ORDER BY
                d.name
            "#,
        )
        .bind(query.start_date)
        .bind(query.end_date)
        .bind(query.department_id)
        .fetch_all(&self.pool)
        .await?;

        // Weekday-only day total across the matching approved requests;
        // counted in Rust since the weekend rule lives there.
        let approved_rows = sqlx::query_as::<_, Leave>(
            r#"
            SELECT
                l.id, l.employee_id, l.leave_type, l.start_date, l.end_date,
                l.reason, l.status, l.comments, l.created_at, l.updated_at
            FROM
                leaves l
                JOIN employees e ON e.id = l.employee_id
            WHERE
                l.status = 'approved'
                AND ($1::date IS NULL OR l.end_date >= $1)
                AND ($2::date IS NULL OR l.start_date <= $2)
                AND ($3::uuid IS NULL OR e.department_id = $3)
            "#,
        )
        .bind(query.start_date)
        .bind(query.end_date)
        .bind(query.department_id)
        .fetch_all(&self.pool)
        .await?;

        let total_leave_days = approved_rows
            .iter()
            .map(|l| count_business_days(l.start_date, l.end_date) as i64)
            .sum();

        Ok(LeaveStats {
            total_requests: total,
            pending,
            approved,
            rejected,
            total_leave_days,
            by_type,
            by_department,
        })
    }
}
