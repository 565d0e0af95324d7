use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub user_id: Uuid,
    pub department_id: Option<Uuid>,
    pub position: String,
    pub salary: f64,
    pub date_of_joining: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Employee row joined with its user and department for list/detail views.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeWithDetails {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub department_id: Option<Uuid>,
    pub department_name: Option<String>,
    pub position: String,
    pub salary: f64,
    pub date_of_joining: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub user_id: Uuid,
    pub department_id: Option<Uuid>,
    pub position: String,
    pub salary: f64,
    pub date_of_joining: NaiveDate,
}

/// Join date is immutable once the employee record exists, so it is absent here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdateInput {
    pub department_id: Option<Uuid>,
    pub position: Option<String>,
    pub salary: Option<f64>,
}
