use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::database::models::{DepartmentInput, DepartmentUpdateInput};
use crate::database::repositories::DepartmentRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

pub async fn create_department(
    _claims: Claims,
    repo: web::Data<DepartmentRepository>,
    input: web::Json<DepartmentInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();

    if repo.name_exists(&input.name, None).await? {
        return Err(AppError::Conflict(format!(
            "Department '{}' already exists",
            input.name
        )));
    }

    let department = repo.create(&input.name, input.description.as_deref()).await?;

    Ok(ApiResponse::created(department))
}

pub async fn get_departments(
    _claims: Claims,
    repo: web::Data<DepartmentRepository>,
) -> Result<HttpResponse, AppError> {
    let departments = repo.get_all().await?;

    Ok(ApiResponse::ok(departments))
}

pub async fn get_department(
    _claims: Claims,
    repo: web::Data<DepartmentRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let department = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Department {} not found", id)))?;

    Ok(ApiResponse::ok(department))
}

pub async fn update_department(
    _claims: Claims,
    repo: web::Data<DepartmentRepository>,
    path: web::Path<Uuid>,
    input: web::Json<DepartmentUpdateInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let patch = input.into_inner();

    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Department {} not found", id)))?;

    let name = patch.name.unwrap_or(existing.name);
    let description = patch.description.or(existing.description);

    if repo.name_exists(&name, Some(id)).await? {
        return Err(AppError::Conflict(format!(
            "Department '{}' already exists",
            name
        )));
    }

    let department = repo.update(id, &name, description.as_deref()).await?;

    Ok(ApiResponse::ok(department))
}

pub async fn delete_department(
    _claims: Claims,
    repo: web::Data<DepartmentRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Department {} not found", id)))?;

    let assigned = repo.employee_count(id).await?;
    if assigned > 0 {
        return Err(AppError::Conflict(format!(
            "Department still has {} assigned employees",
            assigned
        )));
    }

    repo.delete(id).await?;

    Ok(ApiResponse::message("Department deleted"))
}
