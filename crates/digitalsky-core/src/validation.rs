use validator::{Validate, ValidationErrors};

use crate::error::AppError;
use crate::models::{ApplicationStatus, ApproveRequest, ImportDroneApplication};

/// Checks an application's fields before it is accepted as a submission.
pub trait ApplicationValidator: Send + Sync {
    fn validate(&self, application: &ImportDroneApplication) -> Result<(), AppError>;
}

/// Validator driven by the `validator` derive rules on the domain types.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldValidator;

impl ApplicationValidator for FieldValidator {
    fn validate(&self, application: &ImportDroneApplication) -> Result<(), AppError> {
        Validate::validate(application).map_err(into_app_error)
    }
}

/// Validate an approval body: comments present and a final decision.
pub fn validate_approve_request(request: &ApproveRequest) -> Result<(), AppError> {
    request.validate().map_err(into_app_error)?;
    if request.approver_comments.trim().is_empty() {
        return Err(AppError::ValidationError(
            "invalid fields: approver_comments".into(),
        ));
    }
    if !request.status.is_decision() {
        return Err(AppError::ValidationError(format!(
            "status must be {} or {}, got {}",
            ApplicationStatus::Approved,
            ApplicationStatus::Rejected,
            request.status
        )));
    }
    Ok(())
}

/// Flatten validator output into one message listing the failing fields, sorted.
fn into_app_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .collect();
    fields.sort();
    AppError::ValidationError(format!("invalid fields: {}", fields.join(", ")))
}
