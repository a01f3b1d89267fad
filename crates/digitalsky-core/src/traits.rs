use std::future::Future;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{
    ApproveRequest, FileResource, ImportDroneApplication, StoredDocument, UploadedFile,
};
use crate::principal::Principal;

/// Persists and retrieves import applications.
pub trait ApplicationStore: Send + Sync + Clone {
    /// Insert a new application. The id must already be assigned.
    fn insert(
        &self,
        application: &ImportDroneApplication,
    ) -> impl Future<Output = Result<ImportDroneApplication, AppError>> + Send;

    /// Replace an existing application.
    fn update(
        &self,
        application: &ImportDroneApplication,
    ) -> impl Future<Output = Result<ImportDroneApplication, AppError>> + Send;

    fn find_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<ImportDroneApplication>, AppError>> + Send;

    fn find_by_applicant(
        &self,
        applicant_id: i64,
    ) -> impl Future<Output = Result<Vec<ImportDroneApplication>, AppError>> + Send;

    fn find_all(&self) -> impl Future<Output = Result<Vec<ImportDroneApplication>, AppError>> + Send;

    fn health_check(&self) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Stores documents attached to applications.
pub trait DocumentStore: Send + Sync + Clone {
    fn store(
        &self,
        application_id: &str,
        file: &UploadedFile,
    ) -> impl Future<Output = Result<StoredDocument, AppError>> + Send;

    fn load(
        &self,
        application_id: &str,
        file_name: &str,
    ) -> impl Future<Output = Result<FileResource, AppError>> + Send;

    /// Delete a stored document. Removing a missing document is not an error.
    fn remove(
        &self,
        application_id: &str,
        file_name: &str,
    ) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Business operations behind the import application endpoints.
///
/// Object safe so the HTTP layer can hold any implementation behind an `Arc`.
#[async_trait]
pub trait ApplicationService: Send + Sync {
    async fn create(
        &self,
        principal: &Principal,
        application: ImportDroneApplication,
    ) -> Result<ImportDroneApplication, AppError>;

    async fn update(
        &self,
        principal: &Principal,
        id: &str,
        application: ImportDroneApplication,
        document: Option<UploadedFile>,
    ) -> Result<ImportDroneApplication, AppError>;

    async fn approve(
        &self,
        principal: &Principal,
        request: ApproveRequest,
    ) -> Result<ImportDroneApplication, AppError>;

    /// Applications owned by the caller.
    async fn list_mine(&self, principal: &Principal)
    -> Result<Vec<ImportDroneApplication>, AppError>;

    /// Every application, regardless of owner or status.
    async fn list_all(&self, principal: &Principal)
    -> Result<Vec<ImportDroneApplication>, AppError>;

    async fn get(&self, principal: &Principal, id: &str)
    -> Result<ImportDroneApplication, AppError>;

    async fn get_file(
        &self,
        principal: &Principal,
        id: &str,
        document_name: &str,
    ) -> Result<FileResource, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}
