use crate::services::encoder::{self, EncodedFile};
use crate::services::error::DispatchError;
use crate::services::manifest::{PendingManifest, StagedUpload};
use crate::services::stats_client::{BatchRequest, StatsService};
use bytes::Bytes;
use std::sync::Arc;

/// Outcome of one dispatch cycle.
#[derive(Debug)]
pub enum BatchResult {
    /// Generated spreadsheet bytes
    Sheet(Bytes),
    Failed(DispatchError),
}

impl BatchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchResult::Sheet(_))
    }
}

/// Per-dispatch flags forwarded to the statistics service
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchOptions {
    pub color_sheet: bool,
}

/// Sends everything staged since the previous dispatch to the statistics
/// service in a single call.
pub struct BatchDispatcher {
    manifest: Arc<PendingManifest>,
    stats: Arc<dyn StatsService>,
}

impl BatchDispatcher {
    pub fn new(manifest: Arc<PendingManifest>, stats: Arc<dyn StatsService>) -> Self {
        Self { manifest, stats }
    }

    /// Staged files are deleted before the remote call is made, whatever its
    /// outcome: a failed dispatch has to be re-uploaded.
    pub async fn dispatch_batch(&self, options: DispatchOptions) -> BatchResult {
        let batch = self.manifest.take();
        tracing::info!("Processing: {} files", batch.len());

        let encoded = encode_batch(&batch).await;
        remove_staged(&batch).await;

        let boxscores = match encoded {
            Ok(boxscores) => boxscores,
            Err(e) => {
                tracing::error!("Dispatch aborted before remote call: {}", e);
                return BatchResult::Failed(e);
            }
        };

        let request = BatchRequest {
            boxscores,
            color_sheet: options.color_sheet,
        };

        let reply = match self.stats.get_stats(request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("Dispatch failed: {}", e);
                return BatchResult::Failed(e);
            }
        };

        match reply.sheet {
            Some(sheet) if !sheet.is_empty() => {
                tracing::info!("Dispatch produced a {} byte sheet", sheet.len());
                BatchResult::Sheet(sheet)
            }
            // proto3 sends an empty sheet exactly like a missing one; no valid
            // workbook is zero bytes long
            Some(_) => BatchResult::Failed(DispatchError::MalformedResponse(
                "sheet is empty".to_string(),
            )),
            None => {
                tracing::error!("Undefined response: reply carries no sheet");
                BatchResult::Failed(DispatchError::MalformedResponse(
                    "sheet is missing".to_string(),
                ))
            }
        }
    }
}

/// Encodes in arrival order. Every file is attempted; the first failure wins.
async fn encode_batch(batch: &[StagedUpload]) -> Result<Vec<EncodedFile>, DispatchError> {
    let mut encoded = Vec::with_capacity(batch.len());
    let mut first_error = None;

    for upload in batch {
        match encoder::encode(&upload.path).await {
            Ok(file) => encoded.push(file),
            Err(e) => {
                tracing::error!("Failed to encode {}: {}", upload.filename, e);
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(encoded),
    }
}

async fn remove_staged(batch: &[StagedUpload]) {
    for upload in batch {
        if let Err(e) = tokio::fs::remove_file(&upload.path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::error!("Failed to remove {}: {}", upload.path.display(), e);
            }
        }
    }
}
