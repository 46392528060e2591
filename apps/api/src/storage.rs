//! Resume Storage Adapter — writes uploaded bytes to the local upload
//! directory and returns the resulting path as an opaque locator.
//!
//! Collision policy: every stored file gets a UUID prefix, so two uploads
//! with the same original filename always land in distinct files and
//! nothing is ever overwritten.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct ResumeStorage {
    root: PathBuf,
}

impl ResumeStorage {
    /// Opens the adapter, creating the upload directory if needed.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| AppError::Storage(format!("cannot create {}: {e}", root.display())))?;
        Ok(ResumeStorage { root })
    }

    /// Writes the full payload and returns the locator. Fails before the
    /// caller ever touches the database, so no Lead row exists without a
    /// stored file behind its locator.
    pub async fn store(&self, filename: &str, bytes: &Bytes) -> Result<String, AppError> {
        let name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(filename));
        let path = self.root.join(&name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Storage(format!("cannot write {}: {e}", path.display())))?;

        debug!("Stored resume ({} bytes) at {}", bytes.len(), path.display());
        Ok(path.to_string_lossy().into_owned())
    }
}

/// Keeps only the final path component of the client-supplied filename and
/// restricts it to a conservative character set.
fn sanitize_filename(filename: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "resume".to_string()
    } else {
        cleaned
    }
}
