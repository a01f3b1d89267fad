use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    ApplicationStatus, ApproveRequest, FileResource, ImportDroneApplication, UploadedFile,
};
use crate::principal::Principal;
use crate::traits::{ApplicationService, ApplicationStore, DocumentStore};

/// Default [`ApplicationService`]: ownership checks, status transitions,
/// and document handling on top of an application store and a document store.
///
/// Generic over its persistence so tests can run against in-memory mocks.
pub struct ImportDroneApplicationService<S, D>
where
    S: ApplicationStore,
    D: DocumentStore,
{
    store: S,
    documents: D,
}

impl<S, D> ImportDroneApplicationService<S, D>
where
    S: ApplicationStore,
    D: DocumentStore,
{
    pub fn new(store: S, documents: D) -> Self {
        Self { store, documents }
    }

    async fn find_existing(&self, id: &str) -> Result<ImportDroneApplication, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ApplicationNotFound(id.to_string()))
    }
}

#[async_trait]
impl<S, D> ApplicationService for ImportDroneApplicationService<S, D>
where
    S: ApplicationStore + 'static,
    D: DocumentStore + 'static,
{
    async fn create(
        &self,
        principal: &Principal,
        mut application: ImportDroneApplication,
    ) -> Result<ImportDroneApplication, AppError> {
        let now = Utc::now();

        // New applications always start as drafts; submission goes through
        // update so that it is validated.
        application.id = Some(Uuid::new_v4().to_string());
        application.applicant_id = Some(principal.id);
        application.status = Some(ApplicationStatus::Draft);
        application.submitted = false;
        application.created_date = Some(now);
        application.last_modified_date = Some(now);
        application.submitted_date = None;
        application.security_clearance_doc_name = None;
        application.approver = None;
        application.approver_id = None;
        application.approver_comments = None;
        application.approved_date = None;

        let created = self.store.insert(&application).await?;
        tracing::info!(
            id = created.id.as_deref().unwrap_or_default(),
            applicant_id = principal.id,
            "Import application created"
        );
        Ok(created)
    }

    async fn update(
        &self,
        principal: &Principal,
        id: &str,
        application: ImportDroneApplication,
        document: Option<UploadedFile>,
    ) -> Result<ImportDroneApplication, AppError> {
        let mut existing = self.find_existing(id).await?;

        if existing.applicant_id != Some(principal.id) {
            tracing::warn!(%id, user_id = principal.id, "Update attempted by non-owner");
            return Err(AppError::Unauthorized(format!(
                "application {id} belongs to another applicant"
            )));
        }
        if !existing.can_be_modified() {
            return Err(AppError::NotEditable(id.to_string()));
        }

        // Name of a newly written document that the old record does not
        // reference; removed again if the record update fails.
        let mut written = None;
        if let Some(file) = document {
            let stored = self.documents.store(id, &file).await?;
            tracing::info!(
                %id,
                file_name = %stored.file_name,
                size = stored.size,
                checksum = stored.checksum.get(..8).unwrap_or(stored.checksum.as_str()),
                "Security clearance document stored"
            );
            let previous = existing.security_clearance_doc_name.as_deref();
            if previous != Some(stored.file_name.as_str()) {
                written = Some(stored.file_name.clone());
            }
            existing.security_clearance_doc_name = Some(stored.file_name);
        }

        let submitting = application.submitted;
        existing.merge_editable_fields(application);

        let now = Utc::now();
        existing.last_modified_date = Some(now);
        if submitting {
            existing.status = Some(ApplicationStatus::Submitted);
            existing.submitted_date = Some(now);
        }

        let updated = match self.store.update(&existing).await {
            Ok(updated) => updated,
            Err(e) => {
                if let Some(file_name) = written {
                    if let Err(cleanup) = self.documents.remove(id, &file_name).await {
                        tracing::warn!(
                            %id,
                            %file_name,
                            error = %cleanup,
                            "Failed to remove orphaned document"
                        );
                    }
                }
                return Err(e);
            }
        };
        tracing::info!(%id, submitted = submitting, "Import application updated");
        Ok(updated)
    }

    async fn approve(
        &self,
        principal: &Principal,
        request: ApproveRequest,
    ) -> Result<ImportDroneApplication, AppError> {
        let id = request.application_form_id.clone().ok_or_else(|| {
            AppError::ValidationError("applicationFormId is required".to_string())
        })?;

        if !principal.is_admin() {
            return Err(AppError::Unauthorized(
                "only administrators can approve applications".to_string(),
            ));
        }
        if !request.status.is_decision() {
            return Err(AppError::ValidationError(format!(
                "{} is not an approval decision",
                request.status
            )));
        }

        let mut existing = self.find_existing(&id).await?;
        if existing.status != Some(ApplicationStatus::Submitted) {
            return Err(AppError::ValidationError(format!(
                "application {id} is not in {} status",
                ApplicationStatus::Submitted
            )));
        }

        let now = Utc::now();
        existing.status = Some(request.status);
        existing.approver = Some(principal.username.clone());
        existing.approver_id = Some(principal.id);
        existing.approver_comments = Some(request.approver_comments);
        existing.approved_date = Some(now);
        existing.last_modified_date = Some(now);

        let updated = self.store.update(&existing).await?;
        tracing::info!(%id, decision = %request.status, approver = %principal.username, "Import application decided");
        Ok(updated)
    }

    async fn list_mine(
        &self,
        principal: &Principal,
    ) -> Result<Vec<ImportDroneApplication>, AppError> {
        self.store.find_by_applicant(principal.id).await
    }

    async fn list_all(
        &self,
        _principal: &Principal,
    ) -> Result<Vec<ImportDroneApplication>, AppError> {
        self.store.find_all().await
    }

    async fn get(
        &self,
        principal: &Principal,
        id: &str,
    ) -> Result<ImportDroneApplication, AppError> {
        let application = self.find_existing(id).await?;
        if !principal.can_read(application.applicant_id) {
            return Err(AppError::Unauthorized(format!(
                "application {id} belongs to another applicant"
            )));
        }
        Ok(application)
    }

    async fn get_file(
        &self,
        principal: &Principal,
        id: &str,
        document_name: &str,
    ) -> Result<FileResource, AppError> {
        let application = self.find_existing(id).await?;
        if !principal.can_read(application.applicant_id) {
            return Err(AppError::Unauthorized(format!(
                "application {id} belongs to another applicant"
            )));
        }
        tracing::debug!(%id, %document_name, "Loading application document");
        self.documents.load(id, document_name).await
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.store.health_check().await
    }
}
