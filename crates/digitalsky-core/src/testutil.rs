//! Test utilities: mock implementations of the core traits and fixtures.
//!
//! Handwritten mocks for dependency injection in unit and router tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{
    ApplicationStatus, ApproveRequest, FileResource, ImportDroneApplication, StoredDocument,
    UploadedFile, compute_hash,
};
use crate::principal::{Principal, ROLE_ADMIN};
use crate::storage::content_type_for;
use crate::traits::{ApplicationService, ApplicationStore, DocumentStore};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A regular applicant with the given id.
pub fn applicant(id: i64) -> Principal {
    Principal::new(id, format!("applicant-{id}"), vec!["USER".to_string()])
}

/// An administrator with the given id.
pub fn admin(id: i64) -> Principal {
    Principal::new(id, format!("admin-{id}"), vec![ROLE_ADMIN.to_string()])
}

/// An application that passes every field validation rule.
pub fn complete_application() -> ImportDroneApplication {
    ImportDroneApplication {
        applicant_name: Some("Asha Rao".to_string()),
        applicant_email: Some("asha@example.com".to_string()),
        applicant_phone: Some("+919876543210".to_string()),
        applicant_nationality: Some("IN".to_string()),
        applicant_address: Some("12 MG Road, Bengaluru".to_string()),
        manufacturer: Some("SkyWorks".to_string()),
        manufacturer_nationality: Some("JP".to_string()),
        model_name: Some("SW-4 Surveyor".to_string()),
        serial_number: Some("SW4-000123".to_string()),
        year_of_manufacture: Some(2024),
        wing_type: Some("ROTARY".to_string()),
        max_take_off_weight: Some(6.5),
        purpose_of_operation: Some("Agricultural survey".to_string()),
        has_gnss: Some(true),
        has_flight_controller: Some(true),
        seller_name: Some("SkyWorks Export".to_string()),
        port_of_embarkation: Some("Osaka".to_string()),
        port_of_disembarkation: Some("Chennai".to_string()),
        quantity: Some(1),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// MockApplicationStore
// ---------------------------------------------------------------------------

/// In-memory application store preserving insertion order.
#[derive(Clone)]
pub struct MockApplicationStore {
    applications: Arc<Mutex<Vec<ImportDroneApplication>>>,
    error: Arc<Mutex<Option<AppError>>>,
    update_error: Arc<Mutex<Option<AppError>>>,
}

impl MockApplicationStore {
    pub fn empty() -> Self {
        Self::with_applications(Vec::new())
    }

    pub fn with_applications(applications: Vec<ImportDroneApplication>) -> Self {
        Self {
            applications: Arc::new(Mutex::new(applications)),
            error: Arc::new(Mutex::new(None)),
            update_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Store whose next operation fails with `error`.
    pub fn with_error(error: AppError) -> Self {
        Self {
            applications: Arc::new(Mutex::new(Vec::new())),
            error: Arc::new(Mutex::new(Some(error))),
            update_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Make the next `update` fail with `error`; reads are unaffected.
    pub fn fail_next_update(&self, error: AppError) {
        *self.update_error.lock().unwrap() = Some(error);
    }

    /// Snapshot of every stored application.
    pub fn all(&self) -> Vec<ImportDroneApplication> {
        self.applications.lock().unwrap().clone()
    }

    fn take_error(&self) -> Result<(), AppError> {
        match self.error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl ApplicationStore for MockApplicationStore {
    async fn insert(
        &self,
        application: &ImportDroneApplication,
    ) -> Result<ImportDroneApplication, AppError> {
        self.take_error()?;
        self.applications.lock().unwrap().push(application.clone());
        Ok(application.clone())
    }

    async fn update(
        &self,
        application: &ImportDroneApplication,
    ) -> Result<ImportDroneApplication, AppError> {
        self.take_error()?;
        if let Some(e) = self.update_error.lock().unwrap().take() {
            return Err(e);
        }
        let mut applications = self.applications.lock().unwrap();
        let slot = applications
            .iter_mut()
            .find(|a| a.id == application.id)
            .ok_or_else(|| {
                AppError::ApplicationNotFound(application.id.clone().unwrap_or_default())
            })?;
        *slot = application.clone();
        Ok(application.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ImportDroneApplication>, AppError> {
        self.take_error()?;
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id.as_deref() == Some(id))
            .cloned())
    }

    async fn find_by_applicant(
        &self,
        applicant_id: i64,
    ) -> Result<Vec<ImportDroneApplication>, AppError> {
        self.take_error()?;
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.applicant_id == Some(applicant_id))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<ImportDroneApplication>, AppError> {
        self.take_error()?;
        Ok(self.all())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.take_error()
    }
}

// ---------------------------------------------------------------------------
// MockDocumentStore
// ---------------------------------------------------------------------------

/// In-memory document store keyed by (application id, file name).
#[derive(Clone)]
pub struct MockDocumentStore {
    files: Arc<Mutex<HashMap<(String, String), Vec<u8>>>>,
    store_error: Arc<Mutex<Option<AppError>>>,
}

impl MockDocumentStore {
    pub fn empty() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            store_error: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_store_error(error: AppError) -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            store_error: Arc::new(Mutex::new(Some(error))),
        }
    }

    /// Seed a document directly.
    pub fn put(&self, application_id: &str, file_name: &str, bytes: &[u8]) {
        self.files.lock().unwrap().insert(
            (application_id.to_string(), file_name.to_string()),
            bytes.to_vec(),
        );
    }

    /// Names of the documents stored for an application, sorted.
    pub fn stored_names(&self, application_id: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|(id, _)| id == application_id)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }
}

impl DocumentStore for MockDocumentStore {
    async fn store(
        &self,
        application_id: &str,
        file: &UploadedFile,
    ) -> Result<StoredDocument, AppError> {
        if let Some(e) = self.store_error.lock().unwrap().take() {
            return Err(e);
        }
        self.put(application_id, &file.file_name, &file.bytes);
        Ok(StoredDocument {
            file_name: file.file_name.clone(),
            size: file.bytes.len() as u64,
            checksum: compute_hash(&file.bytes),
        })
    }

    async fn load(&self, application_id: &str, file_name: &str) -> Result<FileResource, AppError> {
        let files = self.files.lock().unwrap();
        let bytes = files
            .get(&(application_id.to_string(), file_name.to_string()))
            .ok_or_else(|| AppError::StorageFileNotFound(file_name.to_string()))?;
        Ok(FileResource {
            file_name: file_name.to_string(),
            content_type: content_type_for(file_name).to_string(),
            bytes: bytes.clone(),
        })
    }

    async fn remove(&self, application_id: &str, file_name: &str) -> Result<(), AppError> {
        self.files
            .lock()
            .unwrap()
            .remove(&(application_id.to_string(), file_name.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockApplicationService
// ---------------------------------------------------------------------------

/// Recorded service call: (operation, application id if any).
pub type ServiceCall = (&'static str, Option<String>);

/// Scriptable [`ApplicationService`] for exercising the HTTP layer.
///
/// Returns the seeded applications and files, or the queued error once.
#[derive(Clone)]
pub struct MockApplicationService {
    applications: Arc<Mutex<Vec<ImportDroneApplication>>>,
    files: Arc<Mutex<HashMap<(String, String), FileResource>>>,
    error: Arc<Mutex<Option<AppError>>>,
    pub calls: Arc<Mutex<Vec<ServiceCall>>>,
}

impl MockApplicationService {
    pub fn empty() -> Self {
        Self::with_applications(Vec::new())
    }

    pub fn with_applications(applications: Vec<ImportDroneApplication>) -> Self {
        Self {
            applications: Arc::new(Mutex::new(applications)),
            files: Arc::new(Mutex::new(HashMap::new())),
            error: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Service whose next call fails with `error`.
    pub fn with_error(error: AppError) -> Self {
        let service = Self::empty();
        *service.error.lock().unwrap() = Some(error);
        service
    }

    pub fn with_file(self, application_id: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.files.lock().unwrap().insert(
            (application_id.to_string(), file_name.to_string()),
            FileResource {
                file_name: file_name.to_string(),
                content_type: content_type_for(file_name).to_string(),
                bytes: bytes.to_vec(),
            },
        );
        self
    }

    pub fn recorded_calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, id: Option<&str>) -> Result<(), AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((operation, id.map(str::to_string)));
        match self.error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ApplicationService for MockApplicationService {
    async fn create(
        &self,
        principal: &Principal,
        mut application: ImportDroneApplication,
    ) -> Result<ImportDroneApplication, AppError> {
        self.record("create", None)?;
        application.id = Some("app-1".to_string());
        application.applicant_id = Some(principal.id);
        application.status = Some(ApplicationStatus::Draft);
        Ok(application)
    }

    async fn update(
        &self,
        principal: &Principal,
        id: &str,
        mut application: ImportDroneApplication,
        document: Option<UploadedFile>,
    ) -> Result<ImportDroneApplication, AppError> {
        self.record("update", Some(id))?;
        application.id = Some(id.to_string());
        application.applicant_id = Some(principal.id);
        application.status = Some(if application.submitted {
            ApplicationStatus::Submitted
        } else {
            ApplicationStatus::Draft
        });
        application.security_clearance_doc_name = document.map(|d| d.file_name);
        Ok(application)
    }

    async fn approve(
        &self,
        principal: &Principal,
        request: ApproveRequest,
    ) -> Result<ImportDroneApplication, AppError> {
        self.record("approve", request.application_form_id.as_deref())?;
        Ok(ImportDroneApplication {
            id: request.application_form_id,
            status: Some(request.status),
            approver: Some(principal.username.clone()),
            approver_id: Some(principal.id),
            approver_comments: Some(request.approver_comments),
            ..Default::default()
        })
    }

    async fn list_mine(
        &self,
        principal: &Principal,
    ) -> Result<Vec<ImportDroneApplication>, AppError> {
        self.record("list_mine", None)?;
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.applicant_id == Some(principal.id))
            .cloned()
            .collect())
    }

    async fn list_all(
        &self,
        _principal: &Principal,
    ) -> Result<Vec<ImportDroneApplication>, AppError> {
        self.record("list_all", None)?;
        Ok(self.applications.lock().unwrap().clone())
    }

    async fn get(
        &self,
        _principal: &Principal,
        id: &str,
    ) -> Result<ImportDroneApplication, AppError> {
        self.record("get", Some(id))?;
        self.applications
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| AppError::ApplicationNotFound(id.to_string()))
    }

    async fn get_file(
        &self,
        _principal: &Principal,
        id: &str,
        document_name: &str,
    ) -> Result<FileResource, AppError> {
        self.record("get_file", Some(id))?;
        self.files
            .lock()
            .unwrap()
            .get(&(id.to_string(), document_name.to_string()))
            .cloned()
            .ok_or_else(|| AppError::StorageFileNotFound(document_name.to_string()))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        match self.error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
