use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{EmployeeInput, EmployeeUpdateInput, UserRole};
use crate::database::repositories::{DepartmentRepository, EmployeeRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListQuery {
    pub department_id: Option<Uuid>,
}

pub async fn create_employee(
    _claims: Claims,
    state: web::Data<AppState>,
    repo: web::Data<EmployeeRepository>,
    departments: web::Data<DepartmentRepository>,
    input: web::Json<EmployeeInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();

    if input.salary <= 0.0 {
        return Err(AppError::invalid_input("Salary must be positive"));
    }

    state
        .auth_service
        .get_user(input.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", input.user_id)))?;

    if repo.user_has_employee(input.user_id).await? {
        return Err(AppError::Conflict(format!(
            "User {} already has an employee record",
            input.user_id
        )));
    }

    if let Some(department_id) = input.department_id {
        departments
            .find_by_id(department_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Department {} not found", department_id))
            })?;
    }

    let employee = repo.create(input).await?;

    Ok(ApiResponse::created(employee))
}

pub async fn get_employees(
    claims: Claims,
    repo: web::Data<EmployeeRepository>,
    query: web::Query<EmployeeListQuery>,
) -> Result<HttpResponse, AppError> {
    // Non-managers only see their own record.
    if !claims.is_people_manager() && claims.role != UserRole::Cfo {
        let own = repo.find_by_user_id(claims.sub).await?;
        let details = match own {
            Some(employee) => repo.find_with_details(employee.id).await?,
            None => None,
        };
        return Ok(ApiResponse::ok(details.into_iter().collect::<Vec<_>>()));
    }

    let employees = repo.get_all_with_details(query.department_id).await?;

    Ok(ApiResponse::ok(employees))
}

pub async fn get_employee(
    claims: Claims,
    repo: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let employee = repo
        .find_with_details(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", id)))?;

    if !claims.is_people_manager() && claims.role != UserRole::Cfo && employee.user_id != claims.sub
    {
        return Err(AppError::Forbidden(
            "You can only view your own employee record".to_string(),
        ));
    }

    Ok(ApiResponse::ok(employee))
}

pub async fn update_employee(
    _claims: Claims,
    repo: web::Data<EmployeeRepository>,
    departments: web::Data<DepartmentRepository>,
    path: web::Path<Uuid>,
    input: web::Json<EmployeeUpdateInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let patch = input.into_inner();

    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", id)))?;

    let department_id = patch.department_id.or(existing.department_id);
    let position = patch.position.unwrap_or(existing.position);
    let salary = patch.salary.unwrap_or(existing.salary);

    if salary <= 0.0 {
        return Err(AppError::invalid_input("Salary must be positive"));
    }

    if let Some(department_id) = department_id {
        departments
            .find_by_id(department_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Department {} not found", department_id))
            })?;
    }

    let employee = repo.update(id, department_id, &position, salary).await?;

    Ok(ApiResponse::ok(employee))
}

pub async fn delete_employee(
    _claims: Claims,
    repo: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", id)))?;

    if repo.has_dependent_records(id).await? {
        return Err(AppError::Conflict(
            "Employee has attendance, leave or payroll records and cannot be deleted".to_string(),
        ));
    }

    repo.delete(id).await?;

    Ok(ApiResponse::message("Employee deleted"))
}
