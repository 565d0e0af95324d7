use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{ReviewInput, ReviewUpdateInput, UserRole};
use crate::database::repositories::{EmployeeRepository, ReviewRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListQuery {
    pub employee_id: Option<Uuid>,
}

pub async fn create_review(
    claims: Claims,
    repo: web::Data<ReviewRepository>,
    employees: web::Data<EmployeeRepository>,
    input: web::Json<ReviewInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();

    validate_rating(input.rating)?;

    employees
        .find_by_id(input.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", input.employee_id)))?;

    let review = repo
        .create(
            input.employee_id,
            claims.sub,
            input.review_date,
            input.rating,
            &input.comments,
        )
        .await?;

    Ok(ApiResponse::created(review))
}

pub async fn get_reviews(
    claims: Claims,
    repo: web::Data<ReviewRepository>,
    employees: web::Data<EmployeeRepository>,
    query: web::Query<ReviewListQuery>,
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

    let reviews = repo.get_all(employee_id).await?;

    Ok(ApiResponse::ok(reviews))
}

pub async fn get_review(
    claims: Claims,
    repo: web::Data<ReviewRepository>,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let review = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Review {} not found", id)))?;

    if !claims.is_people_manager() && claims.role != UserRole::Cfo {
        let own = employees
            .find_by_user_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::NotFound("No employee record for this user".to_string()))?;
        if review.employee_id != own.id {
            return Err(AppError::Forbidden(
                "You can only view your own reviews".to_string(),
            ));
        }
    }

    Ok(ApiResponse::ok(review))
}

pub async fn update_review(
    _claims: Claims,
    repo: web::Data<ReviewRepository>,
    path: web::Path<Uuid>,
    input: web::Json<ReviewUpdateInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let patch = input.into_inner();

    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Review {} not found", id)))?;

    let review_date = patch.review_date.unwrap_or(existing.review_date);
    let rating = patch.rating.unwrap_or(existing.rating);
    let comments = patch.comments.unwrap_or(existing.comments);

    validate_rating(rating)?;

    let review = repo.update(id, review_date, rating, &comments).await?;

    Ok(ApiResponse::ok(review))
}

pub async fn delete_review(
    _claims: Claims,
    repo: web::Data<ReviewRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Review {} not found", id)))?;

    repo.delete(id).await?;

    Ok(ApiResponse::message("Review deleted"))
}

pub async fn statistics(
    _claims: Claims,
    repo: web::Data<ReviewRepository>,
) -> Result<HttpResponse, AppError> {
    let stats = repo.statistics().await?;

    Ok(ApiResponse::ok(stats))
}

fn validate_rating(rating: i32) -> Result<(), AppError> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::invalid_input("Rating must be between 1 and 5"));
    }
    Ok(())
}
