use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use digitalsky_core::error::AppError;
use digitalsky_core::models::{ApproveRequest, ImportDroneApplication, UploadedFile};
use digitalsky_core::storage::base_file_name;
use digitalsky_core::validation::validate_approve_request;

use crate::auth::{AuthUser, RequireAdmin};
use crate::dto::{ApplicationBody, ApproveRequestBody, ErrorResponse, HealthResponse};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

pub const BASE_PATH: &str = "/api/applicationForm/importDroneApplication";

/// Multipart field carrying the application JSON.
pub const FORM_FIELD: &str = "droneAcquisitionForm";
/// Multipart field carrying the optional document.
pub const DOCUMENT_FIELD: &str = "securityClearanceDoc";

/// Build the full router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    let applications = Router::new()
        .route("/", post(create_application))
        .route("/list", get(list_mine))
        .route("/getAll", get(list_all))
        .route("/approve/{id}", patch(approve_application))
        .route("/{id}", patch(update_application).get(get_application))
        .route("/{id}/document/{document_name}", get(get_document));

    let public = Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public.nest(BASE_PATH, applications).with_state(state)
}

// ---------------------------------------------------------------------------
// Applications
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/applicationForm/importDroneApplication",
    request_body = ApplicationBody,
    responses(
        (status = 201, description = "Application created", body = ApplicationBody),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Any failure", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn create_application(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    body: Result<Json<ImportDroneApplication>, JsonRejection>,
) -> Response {
    let result = match body {
        Ok(Json(application)) => state.service.create(&principal, application).await,
        Err(rejection) => Err(AppError::MalformedPayload(rejection.body_text())),
    };

    // Every failure on create is reported as a server error.
    match result {
        Ok(created) => (StatusCode::CREATED, Json(ApplicationBody(created))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, applicant_id = principal.id, "Create failed");
            let body = ErrorResponse {
                error: "internal_error".to_string(),
                message: e.to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

#[utoipa::path(
    patch,
    path = "/api/applicationForm/importDroneApplication/{id}",
    params(("id" = String, Path, description = "Application ID")),
    request_body(content = crate::dto::UpdateApplicationForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Application updated", body = ApplicationBody),
        (status = 400, description = "Submitted application failed validation", body = ErrorResponse),
        (status = 401, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 422, description = "Not editable or malformed form", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn update_application(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApplicationBody>, ApiError> {
    let mut multipart = multipart.map_err(|e| AppError::IoError(e.body_text()))?;
    let (form, document) = read_update_form(&mut multipart).await?;

    let raw = form.ok_or_else(|| {
        AppError::MalformedPayload(format!("Missing multipart field '{FORM_FIELD}'"))
    })?;
    let application: ImportDroneApplication = serde_json::from_str(&raw)
        .map_err(|e| AppError::MalformedPayload(format!("Invalid {FORM_FIELD}: {e}")))?;

    // Drafts may be incomplete.
    if application.submitted {
        state.validator.validate(&application)?;
    }

    let updated = state
        .service
        .update(&principal, &id, application, document)
        .await?;

    Ok(Json(ApplicationBody(updated)))
}

/// Pull the form JSON and the optional document out of the multipart body.
/// Unknown fields are skipped; an empty file part counts as no document.
/// Client paths are reduced to their last segment.
async fn read_update_form(
    multipart: &mut Multipart,
) -> Result<(Option<String>, Option<UploadedFile>), AppError> {
    let mut form = None;
    let mut document = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::IoError(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FORM_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::IoError(e.body_text()))?;
                form = Some(text);
            }
            Some(DOCUMENT_FIELD) => {
                let file_name = field
                    .file_name()
                    .map(|raw| base_file_name(raw).to_string());
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::IoError(e.body_text()))?;

                document = file_name
                    .filter(|n| !n.is_empty() && !bytes.is_empty())
                    .map(|file_name| UploadedFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
            }
            _ => {}
        }
    }

    Ok((form, document))
}

#[utoipa::path(
    patch,
    path = "/api/applicationForm/importDroneApplication/approve/{id}",
    params(("id" = String, Path, description = "Application ID")),
    request_body = ApproveRequestBody,
    responses(
        (status = 200, description = "Decision recorded", body = ApplicationBody),
        (status = 400, description = "Invalid decision", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 422, description = "Unreadable body", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn approve_application(
    State(state): State<Arc<AppState>>,
    RequireAdmin(principal): RequireAdmin,
    Path(id): Path<String>,
    body: Result<Json<ApproveRequestBody>, JsonRejection>,
) -> Result<Json<ApplicationBody>, ApiError> {
    let Json(body) = body.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    let mut request = ApproveRequest::from(body);

    match request.application_form_id.as_deref() {
        None => request.application_form_id = Some(id),
        Some(body_id) if body_id != id => {
            return Err(AppError::ValidationError(format!(
                "applicationFormId '{body_id}' does not match path id '{id}'"
            ))
            .into());
        }
        Some(_) => {}
    }
    validate_approve_request(&request)?;

    let updated = state.service.approve(&principal, request).await?;
    Ok(Json(ApplicationBody(updated)))
}

#[utoipa::path(
    get,
    path = "/api/applicationForm/importDroneApplication/list",
    responses(
        (status = 200, description = "Applications owned by the caller", body = [ApplicationBody]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn list_mine(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
) -> Result<Json<Vec<ApplicationBody>>, ApiError> {
    let applications = state.service.list_mine(&principal).await?;
    tracing::debug!(applicant_id = principal.id, count = applications.len(), "Listed own applications");
    Ok(Json(applications.into_iter().map(ApplicationBody).collect()))
}

#[utoipa::path(
    get,
    path = "/api/applicationForm/importDroneApplication/getAll",
    responses(
        (status = 200, description = "Every non-draft application", body = [ApplicationBody]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn list_all(
    State(state): State<Arc<AppState>>,
    RequireAdmin(principal): RequireAdmin,
) -> Result<Json<Vec<ApplicationBody>>, ApiError> {
    let applications = state.service.list_all(&principal).await?;
    let visible: Vec<ApplicationBody> = applications
        .into_iter()
        .filter(|a| !a.is_draft())
        .map(ApplicationBody)
        .collect();
    Ok(Json(visible))
}

#[utoipa::path(
    get,
    path = "/api/applicationForm/importDroneApplication/{id}",
    params(("id" = String, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application", body = ApplicationBody),
        (status = 401, description = "Neither owner nor admin", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn get_application(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApplicationBody>, ApiError> {
    let application = state.service.get(&principal, &id).await?;
    Ok(Json(ApplicationBody(application)))
}

#[utoipa::path(
    get,
    path = "/api/applicationForm/importDroneApplication/{id}/document/{document_name}",
    params(
        ("id" = String, Path, description = "Application ID"),
        ("document_name" = String, Path, description = "Stored document name"),
    ),
    responses(
        (status = 200, description = "Document bytes, sent as an attachment"),
        (status = 401, description = "Neither owner nor admin", body = ErrorResponse),
        (status = 404, description = "Application or document not found", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path((id, document_name)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let file = state
        .service
        .get_file(&principal, &id, &document_name)
        .await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        file.file_name.replace('"', "")
    );

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    ))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let db_status = match state.service.health_check().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            "error"
        }
    };

    let status = if db_status == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if db_status == "ok" {
            "healthy"
        } else {
            "unhealthy"
        },
        database: db_status,
    };

    (status, Json(response))
}
