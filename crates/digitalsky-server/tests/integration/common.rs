use std::sync::Arc;

use axum::Router;
use axum::response::Response;
use http_body_util::BodyExt;

use digitalsky_core::Principal;
use digitalsky_core::testutil::MockApplicationService;
use digitalsky_server::auth::{JwtConfig, issue_token};
use digitalsky_server::routes;
use digitalsky_server::state::AppState;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
pub const BASE: &str = "/api/applicationForm/importDroneApplication";
pub const BOUNDARY: &str = "digitalsky-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub service: MockApplicationService,
}

/// Router backed by `service`, with the default field validator.
pub fn setup_test_app(service: MockApplicationService) -> TestApp {
    let state = Arc::new(AppState::new(Arc::new(service.clone()), jwt_config()));
    TestApp {
        router: routes::router(state),
        service,
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig::new(TEST_SECRET, 15).unwrap()
}

/// `Authorization` header value for `principal`.
pub fn bearer(principal: &Principal) -> String {
    format!("Bearer {}", issue_token(principal, &jwt_config()).unwrap())
}

/// Encode a multipart body with an optional form field and optional document.
pub fn multipart_body(form: Option<&str>, document: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(form) = form {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"droneAcquisitionForm\"\r\n\r\n{form}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = document {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"securityClearanceDoc\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
