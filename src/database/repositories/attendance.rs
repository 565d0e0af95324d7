use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{
        Attendance, AttendanceInput, AttendanceStats, AttendanceStatus, DepartmentCount,
        StatsQuery,
    },
    utils::sql,
};

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: AttendanceInput) -> Result<Attendance> {
        let record = sqlx::query_as::<_, Attendance>(&sql(r#"
            INSERT INTO
                attendance (employee_id, date, clock_in, clock_out, status, notes)
            VALUES
                (?, ?, ?, ?, ?, ?)
            RETURNING
                id, employee_id, date, clock_in, clock_out, status, notes,
                created_at, updated_at
        "#))
        .bind(input.employee_id)
        .bind(input.date)
        .bind(input.clock_in)
        .bind(input.clock_out)
        .bind(input.status)
        .bind(input.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Attendance>> {
        let record = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT
                id, employee_id, date, clock_in, clock_out, status, notes,
                created_at, updated_at
            FROM
                attendance
            WHERE
                id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// The at-most-one record for an employee on a calendar day.
    pub async fn find_by_employee_and_date(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Attendance>> {
        let record = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT
                id, employee_id, date, clock_in, clock_out, status, notes,
                created_at, updated_at
            FROM
                attendance
            WHERE
                employee_id = $1
                AND date = $2
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Get attendance records with optional filtering
    pub async fn get_records(
        &self,
        employee_id: Option<Uuid>,
        status: Option<AttendanceStatus>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Attendance>> {
        let mut query = r#"
            SELECT
                id, employee_id, date, clock_in, clock_out, status, notes,
                created_at, updated_at
            FROM
                attendance
            "#
        .to_string();

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
        if start_date.is_some() {
            param_index += 1;
            conditions.push(format!("date >= ${}", param_index));
        }
        if end_date.is_some() {
            param_index += 1;
            conditions.push(format!("date <= ${}", param_index));
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY date DESC, created_at DESC");

        let mut prepared = sqlx::query_as::<_, Attendance>(&query);
        if let Some(eid) = employee_id {
            prepared = prepared.bind(eid);
        }
        if let Some(s) = status {
            prepared = prepared.bind(s);
        }
        if let Some(sd) = start_date {
            prepared = prepared.bind(sd);
        }
        if let Some(ed) = end_date {
            prepared = prepared.bind(ed);
        }

        let records = prepared.fetch_all(&self.pool).await?;

        Ok(records)
    }

    /// Overwrite mutable fields; callers pass the merged values.
    pub async fn update(
        &self,
        id: Uuid,
        clock_in: chrono::NaiveDateTime,
        clock_out: Option<chrono::NaiveDateTime>,
        status: AttendanceStatus,
        notes: Option<String>,
    ) -> Result<Attendance> {
        let record = sqlx::query_as::<_, Attendance>(&sql(r#"
            UPDATE
                attendance
            SET
                clock_in = ?,
                clock_out = ?,
                status = ?,
                notes = ?,
                updated_at = NOW()
            WHERE
                id = ?
            RETURNING
                id, employee_id, date, clock_in, clock_out, status, notes,
                created_at, updated_at
        "#))
        .bind(clock_in)
        .bind(clock_out)
        .bind(status)
        .bind(notes)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn set_clock_out(
        &self,
        id: Uuid,
        clock_out: chrono::NaiveDateTime,
        notes: Option<String>,
    ) -> Result<Attendance> {
        let record = sqlx::query_as::<_, Attendance>(&sql(r#"
            UPDATE
                attendance
            SET
                clock_out = ?,
                notes = COALESCE(?, notes),
                updated_at = NOW()
            WHERE
                id = ?
            RETURNING
                id, employee_id, date, clock_in, clock_out, status, notes,
                created_at, updated_at
        "#))
        .bind(clock_out)
        .bind(notes)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM attendance WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Absent-day count for an employee over an inclusive date range, used
    /// by payroll generation.
    pub async fn count_absent_days(
        &self,
        employee_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT
                COUNT(*)
            FROM
                attendance
            WHERE
                employee_id = $1
                AND date BETWEEN $2 AND $3
                AND status = 'absent'
            "#,
        )
        .bind(employee_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn statistics(&self, query: &StatsQuery) -> Result<AttendanceStats> {
        let (total, present, absent, late, on_leave): (i64, i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE a.status = 'present'),
                    COUNT(*) FILTER (WHERE a.status = 'absent'),
                    COUNT(*) FILTER (WHERE a.status = 'late'),
                    COUNT(*) FILTER (WHERE a.status = 'leave')
                FROM
                    attendance a
                    JOIN employees e ON e.id = a.employee_id
                WHERE
                    ($1::date IS NULL OR a.date >= $1)
                    AND ($2::date IS NULL OR a.date <= $2)
                    AND ($3::uuid IS NULL OR e.department_id = $3)
                "#,
            )
            .bind(query.start_date)
            .bind(query.end_date)
            .bind(query.department_id)
            .fetch_one(&self.pool)
            .await?;

        let by_department = sqlx::query_as::<_, DepartmentCount>(
            r#"
            SELECT
                d.id AS department_id,
                d.name AS department_name,
                COUNT(a.id) AS total
            FROM
                attendance a
                JOIN employees e ON e.id = a.employee_id
                JOIN departments d ON d.id = e.department_id
            WHERE
                ($1::date IS NULL OR a.date >= $1)
                AND ($2::date IS NULL OR a.date <= $2)
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

        let rate = |part: i64| {
            if total > 0 {
                (part as f64 / total as f64) * 100.0
            } else {
                0.0
            }
        };

        Ok(AttendanceStats {
            total_records: total,
            present,
            absent,
            late,
            on_leave,
            present_rate: rate(present),
            late_rate: rate(late),
            by_department,
        })
    }
}
