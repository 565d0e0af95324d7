use actix_web::{web, HttpResponse};

use crate::database::repositories::StatsRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

pub async fn dashboard(
    _claims: Claims,
    repo: web::Data<StatsRepository>,
) -> Result<HttpResponse, AppError> {
    let stats = repo.dashboard().await?;

    Ok(ApiResponse::ok(stats))
}
