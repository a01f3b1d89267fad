use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::models::{FileResource, StoredDocument, UploadedFile, compute_hash};
use crate::traits::DocumentStore;

/// Document store that keeps files under `{root}/{application_id}/{file_name}`.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, application_id: &str, file_name: &str) -> Option<PathBuf> {
        if !is_safe_component(application_id) || !is_safe_component(file_name) {
            return None;
        }
        Some(self.root.join(application_id).join(file_name))
    }
}

impl DocumentStore for FsDocumentStore {
    async fn store(
        &self,
        application_id: &str,
        file: &UploadedFile,
    ) -> Result<StoredDocument, AppError> {
        let path = self
            .document_path(application_id, &file.file_name)
            .ok_or_else(|| {
                AppError::StorageError(format!("Invalid document name: {}", file.file_name))
            })?;
        if file.bytes.is_empty() {
            return Err(AppError::StorageError(format!(
                "Refusing to store empty file {}",
                file.file_name
            )));
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::StorageError(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        tokio::fs::write(&path, &file.bytes).await.map_err(|e| {
            AppError::StorageError(format!("Failed to write {}: {e}", path.display()))
        })?;

        Ok(StoredDocument {
            file_name: file.file_name.clone(),
            size: file.bytes.len() as u64,
            checksum: compute_hash(&file.bytes),
        })
    }

    async fn load(&self, application_id: &str, file_name: &str) -> Result<FileResource, AppError> {
        let path = self
            .document_path(application_id, file_name)
            .ok_or_else(|| AppError::StorageFileNotFound(file_name.to_string()))?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::StorageFileNotFound(file_name.to_string()));
            }
            Err(e) => {
                return Err(AppError::StorageError(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        Ok(FileResource {
            file_name: file_name.to_string(),
            content_type: content_type_for(file_name).to_string(),
            bytes,
        })
    }

    async fn remove(&self, application_id: &str, file_name: &str) -> Result<(), AppError> {
        let Some(path) = self.document_path(application_id, file_name) else {
            return Ok(());
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::StorageError(format!(
                "Failed to remove {}: {e}",
                path.display()
            ))),
        }
    }
}

/// Last path segment of a client-supplied file name. Browsers on Windows may
/// send the full local path with either separator.
pub fn base_file_name(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim()
}

/// A single, non-empty path component: no separators, no `.` or `..`.
fn is_safe_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Guess a MIME type from the file extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}
