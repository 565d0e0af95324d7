use anyhow::Result;
use chrono::{Local, NaiveDate};
use sqlx::PgPool;

use crate::database::models::DashboardStats;

#[derive(Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn dashboard(&self) -> Result<DashboardStats> {
        self.dashboard_for_day(Local::now().date_naive()).await
    }

    pub async fn dashboard_for_day(&self, today: NaiveDate) -> Result<DashboardStats> {
        let total_employees: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;

        let total_departments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM departments")
            .fetch_one(&self.pool)
            .await?;

        let pending_leave_requests: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM leaves WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await?;

        let present_today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance WHERE date = $1 AND status IN ('present', 'late')",
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        let on_leave_today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance WHERE date = $1 AND status = 'leave'",
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats {
            total_employees,
            total_departments,
            pending_leave_requests,
            present_today,
            on_leave_today,
        })
    }
}
