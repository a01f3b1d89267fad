pub mod error;
pub mod models;
pub mod principal;
pub mod service;
pub mod storage;
#[cfg(any(test, feature = "testutil"))]
pub mod testutil;
pub mod traits;
pub mod validation;

pub use error::AppError;
pub use models::{
    ApplicationStatus, ApproveRequest, FileResource, ImportDroneApplication, UploadedFile,
    compute_hash,
};
pub use principal::{Principal, ROLE_ADMIN};
pub use service::ImportDroneApplicationService;
pub use storage::FsDocumentStore;
pub use traits::{ApplicationService, ApplicationStore, DocumentStore};
pub use validation::{ApplicationValidator, FieldValidator};
