use actix_web::{web, HttpResponse};

use crate::database::models::{CreateUserInput, LoginInput, UserResponse};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;
use crate::AppState;

pub async fn register(
    state: web::Data<AppState>,
    input: web::Json<CreateUserInput>,
) -> Result<HttpResponse, AppError> {
    let request = input.into_inner();

    if request.password.len() < 8 {
        return Err(AppError::InvalidInput(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let response = state
        .auth_service
        .register(request)
        .await
        .map_err(|e| AppError::Conflict(e.to_string()))?;

    Ok(ApiResponse::created(response))
}

pub async fn login(
    state: web::Data<AppState>,
    input: web::Json<LoginInput>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .auth_service
        .login(input.into_inner())
        .await
        .map_err(|_| AppError::Unauthorized)?;

    Ok(ApiResponse::ok(response))
}

pub async fn me(
    claims: Claims,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = state
        .auth_service
        .get_user(claims.user_id())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::ok(UserResponse::from(user)))
}
