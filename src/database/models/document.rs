use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

/// Document metadata only; the stored bytes travel through
/// [`DocumentContent`] on download.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub title: String,
    pub doc_type: DocumentType,
    pub file_name: String,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DocumentContent {
    pub file_name: String,
    pub content: Vec<u8>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "snake_case")]
    pub enum DocumentType {
        Contract => "contract",
        IdProof => "id_proof",
        Certificate => "certificate",
        Resume => "resume",
        Other => "other",
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUploadInput {
    pub employee_id: Uuid,
    pub title: String,
    pub doc_type: DocumentType,
    pub file_name: String,
    /// Base64-encoded file bytes.
    pub data: String,
}
