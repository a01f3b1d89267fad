use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use digitalsky_core::AppError;
use digitalsky_core::Principal;
use digitalsky_core::testutil::{MockApplicationService, admin, applicant};
use digitalsky_server::auth::{JwtConfig, issue_token};

use crate::integration::common::{BASE, bearer, body_json, setup_test_app};

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app(MockApplicationService::empty());

    let response = app
        .router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "ok");
}

#[tokio::test]
async fn health_reports_store_failure_as_503() {
    let app = setup_test_app(MockApplicationService::with_error(AppError::DatabaseError(
        "connection refused".into(),
    )));

    let response = app
        .router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["status"], "unhealthy");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = setup_test_app(MockApplicationService::empty());

    let response = app
        .router
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["paths"]["/api/applicationForm/importDroneApplication/getAll"].is_object());
}

#[tokio::test]
async fn missing_token_returns_401() {
    let app = setup_test_app(MockApplicationService::empty());

    let response = app
        .router
        .clone()
        .oneshot(
            Request::get(format!("{BASE}/list"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "unauthorized");
    assert!(app.service.recorded_calls().is_empty());
}

#[tokio::test]
async fn non_bearer_scheme_returns_401() {
    let app = setup_test_app(MockApplicationService::empty());

    let response = app
        .router
        .oneshot(
            Request::get(format!("{BASE}/list"))
                .header("authorization", "Basic YXNoYTpzZWNyZXQ=")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_other_secret_returns_401() {
    let app = setup_test_app(MockApplicationService::empty());
    let foreign = JwtConfig::new("some-other-secret", 15).unwrap();
    let token = issue_token(&applicant(7), &foreign).unwrap();

    let response = app
        .router
        .oneshot(
            Request::get(format!("{BASE}/list"))
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_all_requires_admin() {
    let app = setup_test_app(MockApplicationService::empty());

    let response = app
        .router
        .clone()
        .oneshot(
            Request::get(format!("{BASE}/getAll"))
                .header("authorization", bearer(&applicant(7)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.service.recorded_calls().is_empty());

    let response = app
        .router
        .oneshot(
            Request::get(format!("{BASE}/getAll"))
                .header("authorization", bearer(&admin(1)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.service.recorded_calls(), vec![("list_all", None)]);
}

#[tokio::test]
async fn admin_role_is_case_insensitive() {
    let app = setup_test_app(MockApplicationService::empty());
    let principal = Principal::new(2, "ops", vec!["admin".to_string()]);

    let response = app
        .router
        .oneshot(
            Request::get(format!("{BASE}/getAll"))
                .header("authorization", bearer(&principal))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
