use actix_web::{web, HttpResponse};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{
    AttendanceInput, AttendanceStatus, AttendanceUpdateInput, ClockInput, StatsQuery, UserRole,
};
use crate::database::repositories::{AttendanceRepository, EmployeeRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::attendance_rules::status_for_clock_in;
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceListQuery {
    pub employee_id: Option<Uuid>,
    pub status: Option<AttendanceStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Manual record entry, for corrections and backfills.
pub async fn create_record(
    _claims: Claims,
    repo: web::Data<AttendanceRepository>,
    employees: web::Data<EmployeeRepository>,
    input: web::Json<AttendanceInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();

    employees
        .find_by_id(input.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", input.employee_id)))?;

    if let Some(clock_out) = input.clock_out {
        if clock_out <= input.clock_in {
            return Err(AppError::invalid_input("Clock-out must be after clock-in"));
        }
    }

    if repo
        .find_by_employee_and_date(input.employee_id, input.date)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Attendance for employee {} on {} already exists",
            input.employee_id, input.date
        )));
    }

    let record = repo.create(input).await?;

    Ok(ApiResponse::created(record))
}

/// Clock an employee in for today. The target employee comes from the body
/// for managers; everyone else clocks in their own record.
pub async fn clock_in(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
    employees: web::Data<EmployeeRepository>,
    input: Option<web::Json<ClockInput>>,
) -> Result<HttpResponse, AppError> {
    let input = input.map(web::Json::into_inner).unwrap_or_default();

    let employee_id = resolve_employee(&claims, &employees, input.employee_id).await?;

    employees
        .find_by_id(employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

    let now = Local::now().naive_local();
    let today = now.date();

    if repo
        .find_by_employee_and_date(employee_id, today)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Already clocked in today".to_string(),
        ));
    }

    let record = repo
        .create(AttendanceInput {
            employee_id,
            date: today,
            clock_in: now,
            clock_out: None,
            status: status_for_clock_in(now.time()),
            notes: input.notes,
        })
        .await?;

    Ok(ApiResponse::created(record))
}

/// Close today's open record for the employee in the path.
pub async fn clock_out(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
    input: Option<web::Json<ClockInput>>,
) -> Result<HttpResponse, AppError> {
    let input = input.map(web::Json::into_inner).unwrap_or_default();
    let employee_id = resolve_employee(&claims, &employees, Some(path.into_inner())).await?;

    let now = Local::now().naive_local();

    let record = repo
        .find_by_employee_and_date(employee_id, now.date())
        .await?
        .ok_or_else(|| AppError::NotFound("No clock-in record for today".to_string()))?;

    if record.clock_out.is_some() {
        return Err(AppError::Conflict("Already clocked out today".to_string()));
    }

    if now <= record.clock_in {
        return Err(AppError::invalid_input("Clock-out must be after clock-in"));
    }

    let record = repo.set_clock_out(record.id, now, input.notes).await?;

    Ok(ApiResponse::ok(record))
}

pub async fn get_records(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
    employees: web::Data<EmployeeRepository>,
    query: web::Query<AttendanceListQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();

    // Plain employees are pinned to their own records regardless of filter.
    let employee_id = if claims.is_people_manager() || claims.role == UserRole::Cfo {
        query.employee_id
    } else {
        let own = employees
            .find_by_user_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::NotFound("No employee record for this user".to_string()))?;
        Some(own.id)
    };

    let records = repo
        .get_records(employee_id, query.status, query.start_date, query.end_date)
        .await?;

    Ok(ApiResponse::ok(records))
}

pub async fn get_record(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let record = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Attendance record {} not found", id)))?;

    if !claims.is_people_manager() && claims.role != UserRole::Cfo {
        let own = employees
            .find_by_user_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::NotFound("No employee record for this user".to_string()))?;
        if record.employee_id != own.id {
            return Err(AppError::Forbidden(
                "You can only view your own attendance".to_string(),
            ));
        }
    }

    Ok(ApiResponse::ok(record))
}

pub async fn update_record(
    _claims: Claims,
    repo: web::Data<AttendanceRepository>,
    path: web::Path<Uuid>,
    input: web::Json<AttendanceUpdateInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let patch = input.into_inner();

    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Attendance record {} not found", id)))?;

    let clock_in = patch.clock_in.unwrap_or(existing.clock_in);
    let clock_out = patch.clock_out.or(existing.clock_out);
    let status = patch.status.unwrap_or(existing.status);
    let notes = patch.notes.or(existing.notes);

    if let Some(out) = clock_out {
        if out <= clock_in {
            return Err(AppError::invalid_input("Clock-out must be after clock-in"));
        }
    }

    let record = repo.update(id, clock_in, clock_out, status, notes).await?;

    Ok(ApiResponse::ok(record))
}

pub async fn delete_record(
    _claims: Claims,
    repo: web::Data<AttendanceRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Attendance record {} not found", id)))?;

    repo.delete(id).await?;

    Ok(ApiResponse::message("Attendance record deleted"))
}

pub async fn statistics(
    _claims: Claims,
    repo: web::Data<AttendanceRepository>,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse, AppError> {
    let stats = repo.statistics(&query).await?;

    Ok(ApiResponse::ok(stats))
}

/// Target employee for a clock action: managers act on anyone, other
/// callers only on the employee row backing their own user.
async fn resolve_employee(
    claims: &Claims,
    employees: &web::Data<EmployeeRepository>,
    requested: Option<Uuid>,
) -> Result<Uuid, AppError> {
    if claims.is_people_manager() {
        if let Some(id) = requested {
            return Ok(id);
        }
    }

    let own = employees
        .find_by_user_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("No employee record for this user".to_string()))?;

    match requested {
        Some(id) if id != own.id => Err(AppError::Forbidden(
            "You can only clock your own attendance".to_string(),
        )),
        _ => Ok(own.id),
    }
}
