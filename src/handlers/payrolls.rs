use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{
    Employee, GeneratePayrollsInput, Payroll, PayrollInput, PayrollStatsQuery, PayrollStatus,
    PayrollStatusInput, PayrollUpdateInput,
};
use crate::database::repositories::{AttendanceRepository, EmployeeRepository, PayrollRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;
use crate::services::payroll_rules::{compute_monthly_pay, net_salary};
use crate::services::workdays::month_bounds;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollListQuery {
    pub employee_id: Option<Uuid>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub status: Option<PayrollStatus>,
}

pub async fn create_record(
    _claims: Claims,
    repo: web::Data<PayrollRepository>,
    employees: web::Data<EmployeeRepository>,
    input: web::Json<PayrollInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();

    validate_period(input.month, input.year)?;

    employees
        .find_by_id(input.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", input.employee_id)))?;

    if repo
        .exists_for_period(input.employee_id, input.month, input.year)
        .await?
    {
        return Err(AppError::Conflict(format!(
            "Payroll for employee {} in {}/{} already exists",
            input.employee_id, input.month, input.year
        )));
    }

    let allowances = input.allowances.unwrap_or(0.0);
    let deductions = input.deductions.unwrap_or(0.0);
    let tax = input.tax.unwrap_or(0.0);
    let net = input
        .net_salary
        .unwrap_or_else(|| net_salary(input.base_salary, allowances, deductions, tax));

    let payroll = repo
        .create(
            input.employee_id,
            input.month,
            input.year,
            input.base_salary,
            allowances,
            deductions,
            tax,
            net,
        )
        .await?;

    Ok(ApiResponse::created(payroll))
}

pub async fn get_records(
    _claims: Claims,
    repo: web::Data<PayrollRepository>,
    query: web::Query<PayrollListQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();

    let payrolls = repo
        .get_records(query.employee_id, query.month, query.year, query.status)
        .await?;

    Ok(ApiResponse::ok(payrolls))
}

/// Payslips of the calling user's employee, newest first.
pub async fn get_my_records(
    claims: Claims,
    repo: web::Data<PayrollRepository>,
    employees: web::Data<EmployeeRepository>,
) -> Result<HttpResponse, AppError> {
    let employee = employees
        .find_by_user_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("No employee record for this user".to_string()))?;

    let payrolls = repo
        .get_records(Some(employee.id), None, None, None)
        .await?;

    Ok(ApiResponse::ok(payrolls))
}

pub async fn get_record(
    _claims: Claims,
    repo: web::Data<PayrollRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let payroll = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payroll {} not found", id)))?;

    Ok(ApiResponse::ok(payroll))
}

/// Patch the monetary fields of a non-paid record. When a component changes
/// without an explicit net, the net is recomputed from the merged values.
pub async fn update_record(
    _claims: Claims,
    repo: web::Data<PayrollRepository>,
    path: web::Path<Uuid>,
    input: web::Json<PayrollUpdateInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let patch = input.into_inner();

    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payroll {} not found", id)))?;

    if existing.status == PayrollStatus::Paid {
        return Err(AppError::invalid_input("Paid payroll records are immutable"));
    }

    let base_salary = patch.base_salary.unwrap_or(existing.base_salary);
    let allowances = patch.allowances.unwrap_or(existing.allowances);
    let deductions = patch.deductions.unwrap_or(existing.deductions);
    let tax = patch.tax.unwrap_or(existing.tax);

    let net = match patch.net_salary {
        Some(net) => net,
        None if patch.changes_components() => {
            net_salary(base_salary, allowances, deductions, tax)
        }
        None => existing.net_salary,
    };

    let payroll = repo
        .update_amounts(id, base_salary, allowances, deductions, tax, net)
        .await?;

    Ok(ApiResponse::ok(payroll))
}

/// Move a record forward through draft -> processed -> paid. Going backwards
/// is rejected; paid -> paid is an idempotent no-op.
pub async fn update_status(
    _claims: Claims,
    repo: web::Data<PayrollRepository>,
    path: web::Path<Uuid>,
    input: web::Json<PayrollStatusInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let next = input.into_inner().status;

    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payroll {} not found", id)))?;

    if next.rank() < existing.status.rank() {
        return Err(AppError::invalid_input(format!(
            "Cannot move payroll status from {} back to {}",
            existing.status, next
        )));
    }

    if next == existing.status {
        return Ok(ApiResponse::ok(existing));
    }

    let payroll = repo.update_status(id, next).await?;

    Ok(ApiResponse::ok(payroll))
}

pub async fn delete_record(
    _claims: Claims,
    repo: web::Data<PayrollRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payroll {} not found", id)))?;

    if existing.status != PayrollStatus::Draft {
        return Err(AppError::invalid_input(
            "Only draft payroll records can be deleted",
        ));
    }

    repo.delete(id).await?;

    Ok(ApiResponse::message("Payroll deleted"))
}

/// Draft one record per matching employee, skipping employees that already
/// have one for the period or were not yet employed. Each record commits on
/// its own; a later failure keeps the earlier records.
pub async fn generate(
    _claims: Claims,
    repo: web::Data<PayrollRepository>,
    employees: web::Data<EmployeeRepository>,
    attendance: web::Data<AttendanceRepository>,
    input: web::Json<GeneratePayrollsInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();

    validate_period(input.month, input.year)?;

    let candidates = employees
        .get_all(input.department_id, input.employee_id)
        .await?;

    if candidates.is_empty() {
        return Err(AppError::NotFound(
            "No employees match the given filters".to_string(),
        ));
    }

    let month = input.month as u32;
    let (first_day, last_day) = month_bounds(input.year, month)
        .ok_or_else(|| AppError::invalid_input("Invalid month/year"))?;

    let mut created: Vec<Payroll> = Vec::new();

    // One employee failing must not sink the batch; skip and keep going.
    for employee in candidates {
        match generate_for_employee(&repo, &attendance, &employee, &input, first_day, last_day, month)
            .await
        {
            Ok(Some(payroll)) => created.push(payroll),
            Ok(None) => continue,
            Err(err) => {
                log::warn!(
                    "Skipping payroll generation for employee {}: {}",
                    employee.id,
                    err
                );
                continue;
            }
        }
    }

    Ok(ApiResponse::created(created))
}

async fn generate_for_employee(
    repo: &PayrollRepository,
    attendance: &AttendanceRepository,
    employee: &Employee,
    input: &GeneratePayrollsInput,
    first_day: chrono::NaiveDate,
    last_day: chrono::NaiveDate,
    month: u32,
) -> anyhow::Result<Option<Payroll>> {
    if repo
        .exists_for_period(employee.id, input.month, input.year)
        .await?
    {
        return Ok(None);
    }

    let absent_days = attendance
        .count_absent_days(employee.id, first_day, last_day)
        .await?;

    let breakdown = match compute_monthly_pay(
        employee.salary,
        employee.date_of_joining,
        input.year,
        month,
        absent_days as u32,
    ) {
        Some(breakdown) => breakdown,
        None => return Ok(None),
    };

    let payroll = repo
        .create(
            employee.id,
            input.month,
            input.year,
            breakdown.base_salary,
            breakdown.allowances,
            breakdown.deductions,
            breakdown.tax,
            breakdown.net_salary,
        )
        .await?;

    Ok(Some(payroll))
}

pub async fn statistics(
    _claims: Claims,
    repo: web::Data<PayrollRepository>,
    query: web::Query<PayrollStatsQuery>,
) -> Result<HttpResponse, AppError> {
    let stats = repo.statistics(&query).await?;

    Ok(ApiResponse::ok(stats))
}

fn validate_period(month: i32, year: i32) -> Result<(), AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::invalid_input("Month must be between 1 and 12"));
    }
    if !(1970..=9999).contains(&year) {
        return Err(AppError::invalid_input("Year is out of range"));
    }
    Ok(())
}
