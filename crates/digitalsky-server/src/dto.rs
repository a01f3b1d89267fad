use serde::{Deserialize, Serialize};

use digitalsky_core::models::{ApplicationStatus, ApproveRequest, ImportDroneApplication};

// ---------------------------------------------------------------------------
// Applications
// ---------------------------------------------------------------------------

/// An import application as exchanged over the API (camelCase JSON).
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct ApplicationBody(pub ImportDroneApplication);

impl From<ImportDroneApplication> for ApplicationBody {
    fn from(application: ImportDroneApplication) -> Self {
        Self(application)
    }
}

/// Multipart form accepted by the update endpoint.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationForm {
    /// Optional security clearance document.
    #[schema(value_type = Option<String>, format = Binary)]
    pub security_clearance_doc: Option<Vec<u8>>,
    /// The application serialized as a JSON string.
    pub drone_acquisition_form: String,
}

/// An administrator's decision.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequestBody {
    /// Defaults to the id in the path.
    pub application_form_id: Option<String>,
    /// `APPROVED` or `REJECTED`.
    #[schema(value_type = String, example = "APPROVED")]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub approver_comments: String,
}

impl From<ApproveRequestBody> for ApproveRequest {
    fn from(body: ApproveRequestBody) -> Self {
        Self {
            application_form_id: body.application_form_id,
            status: body.status,
            approver_comments: body.approver_comments,
        }
    }
}

// ---------------------------------------------------------------------------
// Health & Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
