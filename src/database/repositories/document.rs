use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{Document, DocumentContent, DocumentStats, DocumentType, TypeCount},
    utils::sql,
};

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        employee_id: Uuid,
        title: &str,
        doc_type: DocumentType,
        file_name: &str,
        content: &[u8],
        uploaded_by: Uuid,
    ) -> Result<Document> {
        let document = sqlx::query_as::<_, Document>(&sql(r#"
            INSERT INTO
                documents (employee_id, title, doc_type, file_name, content, uploaded_by)
            VALUES
                (?, ?, ?, ?, ?, ?)
            RETURNING
                id, employee_id, title, doc_type, file_name, uploaded_by, created_at
        "#))
        .bind(employee_id)
        .bind(title)
        .bind(doc_type)
        .bind(file_name)
        .bind(content)
        .bind(uploaded_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(document)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT
                id, employee_id, title, doc_type, file_name, uploaded_by, created_at
            FROM
                documents
            WHERE
                id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }

    pub async fn get_all(&self, employee_id: Option<Uuid>) -> Result<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            r#"
            SELECT
                id, employee_id, title, doc_type, file_name, uploaded_by, created_at
            FROM
                documents
            WHERE
                ($1::uuid IS NULL OR employee_id = $1)
            ORDER BY
                created_at DESC
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    pub async fn get_content(&self, id: Uuid) -> Result<Option<DocumentContent>> {
        let content = sqlx::query_as::<_, DocumentContent>(
            "SELECT file_name, content FROM documents WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(content)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn statistics(&self) -> Result<DocumentStats> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(&self.pool)
            .await?;

        let by_type = sqlx::query_as::<_, TypeCount>(
            r#"
            SELECT
                doc_type AS name,
                COUNT(*) AS total
            FROM
                documents
            GROUP BY
                doc_type
            ORDER BY
                doc_type
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(DocumentStats {
            total_documents: total,
            by_type,
        })
    }
}
