use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-department record count used by several rollups.
#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentCount {
    pub department_id: Uuid,
    pub department_name: String,
    pub total: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    pub name: String,
    pub total: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub total_records: i64,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub on_leave: i64,
    /// Percentage of records with status `present`; 0 when there are none.
    pub present_rate: f64,
    pub late_rate: f64,
    pub by_department: Vec<DepartmentCount>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveStats {
    pub total_requests: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    /// Weekday-only day count across the matching approved requests.
    pub total_leave_days: i64,
    pub by_type: Vec<TypeCount>,
    pub by_department: Vec<DepartmentCount>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentPayrollTotal {
    pub department_id: Uuid,
    pub department_name: String,
    pub records: i64,
    pub total_net_salary: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollStats {
    pub total_records: i64,
    pub draft: i64,
    pub processed: i64,
    pub paid: i64,
    pub total_base_salary: f64,
    pub total_allowances: f64,
    pub total_deductions: f64,
    pub total_tax: f64,
    pub total_net_salary: f64,
    pub by_department: Vec<DepartmentPayrollTotal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub total_documents: i64,
    pub by_type: Vec<TypeCount>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_reviews: i64,
    pub average_rating: f64,
    pub by_department: Vec<DepartmentCount>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_employees: i64,
    pub total_departments: i64,
    pub pending_leave_requests: i64,
    pub present_today: i64,
    pub on_leave_today: i64,
}

/// Shared statistics window: optional inclusive date range plus department.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub department_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollStatsQuery {
    pub month: Option<i32>,
    pub year: Option<i32>,
}
