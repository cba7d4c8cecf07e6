use crate::services::error::StagingError;
use crate::services::manifest::{PendingManifest, StagedUpload};
use crate::utils::validation::{sanitize_filename, validate_extension};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWriteExt};
use uuid::Uuid;

/// Writes incoming uploads to the uploads directory and records them in the
/// pending manifest.
pub struct UploadStager {
    upload_dir: PathBuf,
    allowed_extensions: Vec<String>,
    manifest: Arc<PendingManifest>,
}

impl UploadStager {
    pub fn new(
        upload_dir: impl Into<PathBuf>,
        allowed_extensions: Vec<String>,
        manifest: Arc<PendingManifest>,
    ) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            allowed_extensions,
            manifest,
        }
    }

    /// Takes back uploads a request did not complete. Uploads already swapped
    /// out by a dispatch are left to it.
    pub async fn discard(&self, uploads: &[StagedUpload]) {
        for upload in self.manifest.withdraw(uploads) {
            tracing::info!("Discarding upload of {}", upload.filename);
            if let Err(e) = tokio::fs::remove_file(&upload.path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to remove {}: {}", upload.path.display(), e);
                }
            }
        }
    }

    /// Creates the uploads directory if it is missing.
    pub async fn ensure_upload_dir(&self) -> Result<(), StagingError> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|source| StagingError::Io {
                path: self.upload_dir.clone(),
                source,
            })
    }

    /// Streams one upload to disk. The manifest only sees the upload once the
    /// file is completely written; on failure the partial file is removed.
    pub async fn stage<R>(&self, filename: &str, mut reader: R) -> Result<StagedUpload, StagingError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let safe_name = sanitize_filename(filename)?;
        validate_extension(&safe_name, &self.allowed_extensions)?;

        // uuid prefix: two uploads named alike must not overwrite each other
        let path = self
            .upload_dir
            .join(format!("{}_{}", Uuid::new_v4(), safe_name));

        tracing::info!("Uploading: {} -> {}", filename, path.display());

        if let Err(source) = write_stream(&path, &mut reader).await {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to remove partial upload {}: {}", path.display(), e);
                }
            }
            return Err(StagingError::Io { path, source });
        }

        let staged = StagedUpload {
            path,
            filename: filename.to_string(),
        };
        self.manifest.append(staged.clone());
        tracing::info!("Upload finished of {}", filename);

        Ok(staged)
    }
}

async fn write_stream<R>(path: &Path, reader: &mut R) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin + Send,
{
    let mut file = tokio::fs::File::create(path).await?;
    let written = tokio::io::copy(reader, &mut file).await?;
    file.flush().await?;
    file.sync_all().await?;
    Ok(written)
}
