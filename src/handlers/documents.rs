use actix_web::{http::header, web, HttpResponse};
use base64::{engine::general_purpose, Engine};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{DocumentUploadInput, UserRole};
use crate::database::repositories::{DocumentRepository, EmployeeRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListQuery {
    pub employee_id: Option<Uuid>,
}

pub async fn upload(
    claims: Claims,
    repo: web::Data<DocumentRepository>,
    employees: web::Data<EmployeeRepository>,
    input: web::Json<DocumentUploadInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();

    employees
        .find_by_id(input.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", input.employee_id)))?;

    let content = general_purpose::STANDARD
        .decode(&input.data)
        .map_err(|_| AppError::invalid_input("Document data is not valid base64"))?;

    if content.is_empty() {
        return Err(AppError::invalid_input("Document data is empty"));
    }

    let document = repo
        .create(
            input.employee_id,
            &input.title,
            input.doc_type,
            &input.file_name,
            &content,
            claims.sub,
        )
        .await?;

    Ok(ApiResponse::created(document))
}

pub async fn get_documents(
    claims: Claims,
    repo: web::Data<DocumentRepository>,
    employees: web::Data<EmployeeRepository>,
    query: web::Query<DocumentListQuery>,
) -> Result<HttpResponse, AppError> {
    let employee_id = if claims.is_people_manager() {
        query.employee_id
    } else {
        let own = employees
            .find_by_user_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::NotFound("No employee record for this user".to_string()))?;
        Some(own.id)
    };

    let documents = repo.get_all(employee_id).await?;

    Ok(ApiResponse::ok(documents))
}

/// Metadata only; the content itself comes from the download endpoint.
pub async fn get_document(
    claims: Claims,
    repo: web::Data<DocumentRepository>,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let document = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))?;

    if !claims.is_people_manager() && claims.role != UserRole::Cfo {
        let own = employees
            .find_by_user_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::NotFound("No employee record for this user".to_string()))?;
        if document.employee_id != own.id {
            return Err(AppError::Forbidden(
                "You can only view your own documents".to_string(),
            ));
        }
    }

    Ok(ApiResponse::ok(document))
}

pub async fn download(
    claims: Claims,
    repo: web::Data<DocumentRepository>,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let document = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))?;

    if !claims.is_people_manager() && claims.role != UserRole::Cfo {
        let own = employees
            .find_by_user_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::NotFound("No employee record for this user".to_string()))?;
        if document.employee_id != own.id {
            return Err(AppError::Forbidden(
                "You can only download your own documents".to_string(),
            ));
        }
    }

    let content = repo
        .get_content(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))?;

    Ok(HttpResponse::Ok()
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", content.file_name),
        ))
        .content_type("application/octet-stream")
        .body(content.content))
}

pub async fn delete_document(
    _claims: Claims,
    repo: web::Data<DocumentRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))?;

    repo.delete(id).await?;

    Ok(ApiResponse::message("Document deleted"))
}

pub async fn statistics(
    _claims: Claims,
    repo: web::Data<DocumentRepository>,
) -> Result<HttpResponse, AppError> {
    let stats = repo.statistics().await?;

    Ok(ApiResponse::ok(stats))
}
