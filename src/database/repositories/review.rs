use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{DepartmentCount, PerformanceReview, ReviewStats},
    utils::sql,
};

#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        employee_id: Uuid,
        reviewer_id: Uuid,
        review_date: NaiveDate,
        rating: i32,
        comments: &str,
    ) -> Result<PerformanceReview> {
        let review = sqlx::query_as::<_, PerformanceReview>(&sql(r#"
            INSERT INTO
                performance_reviews (employee_id, reviewer_id, review_date, rating, comments)
            VALUES
                (?, ?, ?, ?, ?)
            RETURNING
                id, employee_id, reviewer_id, review_date, rating, comments,
                created_at, updated_at
        "#))
        .bind(employee_id)
        .bind(reviewer_id)
        .bind(review_date)
        .bind(rating)
        .bind(comments)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PerformanceReview>> {
        let review = sqlx::query_as::<_, PerformanceReview>(
            r#"
            SELECT
                id, employee_id, reviewer_id, review_date, rating, comments,
                created_at, updated_at
            FROM
                performance_reviews
            WHERE
                id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    pub async fn get_all(&self, employee_id: Option<Uuid>) -> Result<Vec<PerformanceReview>> {
        let reviews = sqlx::query_as::<_, PerformanceReview>(
            r#"
            SELECT
                id, employee_id, reviewer_id, review_date, rating, comments,
                created_at, updated_at
            FROM
                performance_reviews
            WHERE
                ($1::uuid IS NULL OR employee_id = $1)
            ORDER BY
                review_date DESC
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    pub async fn update(
        &self,
        id: Uuid,
        review_date: NaiveDate,
        rating: i32,
        comments: &str,
    ) -> Result<PerformanceReview> {
        let review = sqlx::query_as::<_, PerformanceReview>(&sql(r#"
            UPDATE
                performance_reviews
            SET
                review_date = ?,
                rating = ?,
                comments = ?,
                updated_at = NOW()
            WHERE
                id = ?
            RETURNING
                id, employee_id, reviewer_id, review_date, rating, comments,
                created_at, updated_at
        "#))
        .bind(review_date)
        .bind(rating)
        .bind(comments)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM performance_reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn statistics(&self) -> Result<ReviewStats> {
        let (total, average_rating): (i64, f64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(AVG(rating), 0)::DOUBLE PRECISION FROM performance_reviews",
        )
        .fetch_one(&self.pool)
        .await?;

        let by_department = sqlx::query_as::<_, DepartmentCount>(
            r#"
            SELECT
                d.id AS department_id,
                d.name AS department_name,
                COUNT(r.id) AS total
            FROM
                performance_reviews r
                JOIN employees e ON e.id = r.employee_id
                JOIN departments d ON d.id = e.department_id
            GROUP BY
                d.id, d.name
            ORDER BY
                d.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(ReviewStats {
            total_reviews: total,
            average_rating,
            by_department,
        })
    }
}
