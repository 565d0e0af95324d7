use actix_web::{web, HttpResponse};
use chrono::Datelike;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{
    LeaveBalance, LeaveInput, LeaveStatus, LeaveStatusInput, LeaveType, LeaveUpdateInput,
    StatsQuery, UserRole,
};
use crate::database::repositories::{EmployeeRepository, LeaveRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;
use crate::services::leave_policy::{
    compute_balance, ensure_deletable, ensure_editable, ensure_undecided,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveListQuery {
    pub employee_id: Option<Uuid>,
    pub status: Option<LeaveStatus>,
    pub leave_type: Option<LeaveType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceQuery {
    pub year: Option<i32>,
}

pub async fn create_request(
    claims: Claims,
    repo: web::Data<LeaveRepository>,
    employees: web::Data<EmployeeRepository>,
    input: web::Json<LeaveInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();

    // Managers may file for anyone; everyone else files for themselves.
    let employee_id = if claims.is_people_manager() {
        match input.employee_id {
            Some(id) => id,
            None => own_employee_id(&employees, &claims).await?,
        }
    } else {
        own_employee_id(&employees, &claims).await?
    };

    employees
        .find_by_id(employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

    validate_range(input.start_date, input.end_date)?;

    if repo
        .has_overlapping(employee_id, input.start_date, input.end_date, None)
        .await?
    {
        return Err(AppError::Conflict(
            "An overlapping leave request already exists".to_string(),
        ));
    }

    let leave = repo
        .create(
            employee_id,
            input.leave_type,
            input.start_date,
            input.end_date,
            &input.reason,
        )
        .await?;

    Ok(ApiResponse::created(leave))
}

pub async fn get_requests(
    claims: Claims,
    repo: web::Data<LeaveRepository>,
    employees: web::Data<EmployeeRepository>,
    query: web::Query<LeaveListQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();

    let employee_id = if claims.is_people_manager() || claims.role == UserRole::Cfo {
        query.employee_id
    } else {
        Some(own_employee_id(&employees, &claims).await?)
    };

    let leaves = repo
        .get_requests(employee_id, query.status, query.leave_type)
        .await?;

    Ok(ApiResponse::ok(leaves))
}

pub async fn get_request(
    claims: Claims,
    repo: web::Data<LeaveRepository>,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let leave = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Leave request {} not found", id)))?;

    if !claims.is_people_manager() && claims.role != UserRole::Cfo {
        let own = own_employee_id(&employees, &claims).await?;
        if leave.employee_id != own {
            return Err(AppError::Forbidden(
                "You can only view your own leave requests".to_string(),
            ));
        }
    }

    Ok(ApiResponse::ok(leave))
}

/// Edit a request while it is still pending; dates are re-validated against
/// the overlap rule with the request itself excluded.
pub async fn update_request(
    claims: Claims,
    repo: web::Data<LeaveRepository>,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
    input: web::Json<LeaveUpdateInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let patch = input.into_inner();

    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Leave request {} not found", id)))?;

    if !claims.is_people_manager() {
        let own = own_employee_id(&employees, &claims).await?;
        if existing.employee_id != own {
            return Err(AppError::Forbidden(
                "You can only edit your own leave requests".to_string(),
            ));
        }
    }

    ensure_editable(existing.status)?;

    let leave_type = patch.leave_type.unwrap_or(existing.leave_type);
    let start_date = patch.start_date.unwrap_or(existing.start_date);
    let end_date = patch.end_date.unwrap_or(existing.end_date);
    let reason = patch.reason.unwrap_or(existing.reason);

    validate_range(start_date, end_date)?;

    if repo
        .has_overlapping(existing.employee_id, start_date, end_date, Some(id))
        .await?
    {
        return Err(AppError::Conflict(
            "An overlapping leave request already exists".to_string(),
        ));
    }

    let leave = repo
        .update(id, leave_type, start_date, end_date, &reason)
        .await?;

    Ok(ApiResponse::ok(leave))
}

/// Approve or reject a pending request. Approval writes the attendance
/// ledger in the same transaction; setting a request back to pending is not
/// allowed.
pub async fn update_status(
    _claims: Claims,
    repo: web::Data<LeaveRepository>,
    path: web::Path<Uuid>,
    input: web::Json<LeaveStatusInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = input.into_inner();

    let leave = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Leave request {} not found", id)))?;

    ensure_undecided(leave.status)?;

    let leave = match input.status {
        LeaveStatus::Approved => repo.approve_with_attendance_sync(&leave, input.comments).await?,
        LeaveStatus::Rejected => repo.reject(id, input.comments).await?,
        LeaveStatus::Pending => {
            return Err(AppError::invalid_input(
                "Status must be 'approved' or 'rejected'",
            ))
        }
    };

    Ok(ApiResponse::ok(leave))
}

pub async fn delete_request(
    claims: Claims,
    repo: web::Data<LeaveRepository>,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let leave = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Leave request {} not found", id)))?;

    if !claims.is_people_manager() {
        let own = own_employee_id(&employees, &claims).await?;
        if leave.employee_id != own {
            return Err(AppError::Forbidden(
                "You can only delete your own leave requests".to_string(),
            ));
        }
    }

    ensure_deletable(leave.status)?;

    repo.delete(id).await?;

    Ok(ApiResponse::message("Leave request deleted"))
}

pub async fn get_balance(
    claims: Claims,
    repo: web::Data<LeaveRepository>,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
    query: web::Query<BalanceQuery>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();

    employees
        .find_by_id(employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

    if !claims.is_people_manager() && claims.role != UserRole::Cfo {
        let own = own_employee_id(&employees, &claims).await?;
        if employee_id != own {
            return Err(AppError::Forbidden(
                "You can only view your own leave balance".to_string(),
            ));
        }
    }

    let year = query
        .year
        .unwrap_or_else(|| chrono::Local::now().date_naive().year());

    let approved = repo.get_approved_in_year(employee_id, year).await?;

    Ok(ApiResponse::ok(LeaveBalance {
        employee_id,
        year,
        balances: compute_balance(&approved),
    }))
}

pub async fn statistics(
    _claims: Claims,
    repo: web::Data<LeaveRepository>,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse, AppError> {
    let stats = repo.statistics(&query).await?;

    Ok(ApiResponse::ok(stats))
}

fn validate_range(
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
) -> Result<(), AppError> {
    if end_date < start_date {
        return Err(AppError::invalid_input("End date must not precede start date"));
    }
    Ok(())
}

async fn own_employee_id(
    employees: &web::Data<EmployeeRepository>,
    claims: &Claims,
) -> Result<Uuid, AppError> {
    let employee = employees
        .find_by_user_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("No employee record for this user".to_string()))?;

    Ok(employee.id)
}
