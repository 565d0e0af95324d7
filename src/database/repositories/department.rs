use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{models::Department, utils::sql};

#[derive(Clone)]
pub struct DepartmentRepository {
    pool: PgPool,
}

impl DepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str, description: Option<&str>) -> Result<Department> {
        let department = sqlx::query_as::<_, Department>(&sql(r#"
            INSERT INTO
                departments (name, description)
            VALUES
                (?, ?)
            RETURNING
                id, name, description, created_at, updated_at
        "#))
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(department)
    }

    pub async fn get_all(&self) -> Result<Vec<Department>> {
        let departments = sqlx::query_as::<_, Department>(
            r#"
            SELECT
                id, name, description, created_at, updated_at
            FROM
                departments
            ORDER BY
                name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(departments)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Department>> {
        let department = sqlx::query_as::<_, Department>(
            r#"
            SELECT
                id, name, description, created_at, updated_at
            FROM
                departments
            WHERE
                id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(department)
    }

    pub async fn name_exists(&self, name: &str, exclude_id: Option<Uuid>) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM departments WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Department> {
        let department = sqlx::query_as::<_, Department>(&sql(r#"
            UPDATE
                departments
            SET
                name = ?,
                description = ?,
                updated_at = NOW()
            WHERE
                id = ?
            RETURNING
                id, name, description, created_at, updated_at
        "#))
        .bind(name)
        .bind(description)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(department)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn employee_count(&self, id: Uuid) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE department_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
