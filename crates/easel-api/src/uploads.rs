//! Transient upload storage.
//!
//! Uploaded artwork lives on disk only for the duration of one request. Each
//! file is written atomically under a UUIDv7 name and removed before the
//! response leaves the handler, on success and on failure alike.

use std::path::PathBuf;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use easel_core::config::IntakeConfig;
use easel_core::{extension_for, validate_upload, Result};

/// Store for transient artwork uploads.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn from_config(config: &IntakeConfig) -> Self {
        Self::new(config.upload_dir.clone(), config.max_upload_bytes)
    }

    /// Validate the upload directory is usable with a write/read/delete
    /// round-trip. Call during startup.
    pub async fn validate(&self) -> std::result::Result<(), String> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| format!("create_dir_all({:?}): {}", self.dir, e))?;

        let probe = self.dir.join(format!(".validate-{}", Uuid::now_v7()));
        let data = b"easel upload store validation";

        fs::write(&probe, data)
            .await
            .map_err(|e| format!("write({:?}): {}", probe, e))?;
        let read_back = fs::read(&probe)
            .await
            .map_err(|e| format!("read({:?}): {}", probe, e))?;
        if read_back != data {
            return Err("read-back mismatch".to_string());
        }
        fs::remove_file(&probe)
            .await
            .map_err(|e| format!("remove_file({:?}): {}", probe, e))?;

        Ok(())
    }

    /// Validate and persist one upload, returning a handle to the stored
    /// file.
    pub async fn store(&self, data: &[u8]) -> Result<TransientUpload> {
        let mime_type = validate_upload(data, self.max_bytes)?;

        fs::create_dir_all(&self.dir).await.map_err(|e| {
            warn!(dir = %self.dir.display(), error = %e, "uploads: create_dir_all failed");
            e
        })?;

        let id = Uuid::now_v7();
        let full_path = self
            .dir
            .join(format!("{}.{}", id, extension_for(mime_type)));

        // Atomic write: temp file + rename
        let temp_path = full_path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            warn!(temp_path = %temp_path.display(), error = %e, "uploads: File::create failed");
            e
        })?;
        file.write_all(data).await.map_err(|e| {
            warn!(error = %e, "uploads: write_all failed");
            e
        })?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &full_path).await.map_err(|e| {
            warn!(from = %temp_path.display(), to = %full_path.display(), error = %e, "uploads: rename failed");
            e
        })?;

        // Set permissions to 0644 (rw-r--r--, no execute)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&full_path, std::fs::Permissions::from_mode(0o644)).await?;
        }

        debug!(upload_id = %id, path = %full_path.display(), size = data.len(), mime_type, "uploads: stored");

        Ok(TransientUpload {
            id,
            path: full_path,
            mime_type,
            size: data.len(),
            removed: false,
        })
    }
}

/// Handle to one stored upload.
///
/// Handlers remove it explicitly with [`TransientUpload::remove`]; `Drop` is
/// a best-effort backstop for paths that return early.
#[derive(Debug)]
pub struct TransientUpload {
    pub id: Uuid,
    pub path: PathBuf,
    pub mime_type: &'static str,
    pub size: usize,
    removed: bool,
}

impl TransientUpload {
    /// Read the stored bytes back from disk.
    pub async fn read(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path).await?)
    }

    /// Remove the stored file.
    pub async fn remove(mut self) -> Result<()> {
        self.removed = true;
        if fs::try_exists(&self.path).await? {
            fs::remove_file(&self.path).await?;
        }
        Ok(())
    }
}

impl Drop for TransientUpload {
    fn drop(&mut self) {
        if !self.removed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
