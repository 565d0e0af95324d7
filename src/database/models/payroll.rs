use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payroll {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub base_salary: f64,
    pub allowances: f64,
    pub deductions: f64,
    pub tax: f64,
    pub net_salary: f64,
    pub status: PayrollStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "snake_case")]
    pub enum PayrollStatus {
        Draft => "draft",
        Processed => "processed",
        Paid => "paid",
    }
}

impl PayrollStatus {
    /// Lifecycle position; the status may never move to a lower rank.
    pub fn rank(&self) -> u8 {
        match self {
            PayrollStatus::Draft => 0,
            PayrollStatus::Processed => 1,
            PayrollStatus::Paid => 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollInput {
    pub employee_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub base_salary: f64,
    pub allowances: Option<f64>,
    pub deductions: Option<f64>,
    pub tax: Option<f64>,
    pub net_salary: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollUpdateInput {
    pub base_salary: Option<f64>,
    pub allowances: Option<f64>,
    pub deductions: Option<f64>,
    pub tax: Option<f64>,
    pub net_salary: Option<f64>,
}

impl PayrollUpdateInput {
    /// True when a monetary component other than the net changes.
    pub fn changes_components(&self) -> bool {
        self.base_salary.is_some()
            || self.allowances.is_some()
            || self.deductions.is_some()
            || self.tax.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollStatusInput {
    pub status: PayrollStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePayrollsInput {
    pub month: i32,
    pub year: i32,
    pub department_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rank_orders_the_lifecycle() {
        assert!(PayrollStatus::Draft.rank() < PayrollStatus::Processed.rank());
        assert!(PayrollStatus::Processed.rank() < PayrollStatus::Paid.rank());
    }

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!("processed".parse::<PayrollStatus>().unwrap(), PayrollStatus::Processed);
        assert_eq!(PayrollStatus::Paid.to_string(), "paid");
    }
}
