use actix_web::{http::StatusCode, test, web, App, ResponseError};

use ems_be::database::models::UserRole;
use ems_be::routes;

mod common;

// The permission guard rejects before any handler or repository is touched,
// so these tests exercise the full route table without a database. Guard
// rejections surface as service-level errors in the test harness; the
// status comes off the error's response in that case.
macro_rules! gate_status {
    ($app:expr, $req:expr) => {
        match test::try_call_service(&$app, $req).await {
            Ok(res) => res.status(),
            Err(err) => err.as_response_error().status_code(),
        }
    };
}

#[actix_rt::test]
async fn missing_token_is_unauthorized() {
    let config = common::test_config();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/departments").to_request();

    assert_eq!(gate_status!(app, req), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn garbage_token_is_unauthorized() {
    let config = common::test_config();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/leaves")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();

    assert_eq!(gate_status!(app, req), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn employee_cannot_write_departments() {
    let config = common::test_config();
    let token = common::mint_token(&config, UserRole::Employee);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/departments")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(serde_json::json!({ "name": "Engineering" }))
        .to_request();

    assert_eq!(gate_status!(app, req), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn employee_cannot_list_payrolls() {
    let config = common::test_config();
    let token = common::mint_token(&config, UserRole::Employee);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/payrolls")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();

    assert_eq!(gate_status!(app, req), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn employee_cannot_decide_leave_requests() {
    let config = common::test_config();
    let token = common::mint_token(&config, UserRole::Employee);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::patch()
        .uri("/api/v1/leaves/5f64a3c2-1111-2222-3333-444455556666/status")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(serde_json::json!({ "status": "approved" }))
        .to_request();

    assert_eq!(gate_status!(app, req), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn cfo_is_not_hr() {
    let config = common::test_config();
    let token = common::mint_token(&config, UserRole::Cfo);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/employees")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(serde_json::json!({}))
        .to_request();

    assert_eq!(gate_status!(app, req), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn employee_cannot_read_the_dashboard() {
    let config = common::test_config();
    let token = common::mint_token(&config, UserRole::Employee);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/stats/dashboard")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();

    assert_eq!(gate_status!(app, req), StatusCode::FORBIDDEN);
}
