use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// A file written to the uploads directory and waiting for the next dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedUpload {
    pub path: PathBuf,
    pub filename: String,
}

/// Uploads staged since the previous dispatch, in arrival order.
///
/// Shared between the stager (append) and the dispatcher (take). Both go
/// through the same mutex and the lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct PendingManifest {
    uploads: Mutex<Vec<StagedUpload>>,
}

impl PendingManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, upload: StagedUpload) {
        self.lock().push(upload);
    }

    /// Swaps the current batch for an empty one and returns it.
    pub fn take(&self) -> Vec<StagedUpload> {
        std::mem::take(&mut *self.lock())
    }

    /// Removes the given uploads if no dispatch has taken them yet and
    /// returns the ones actually removed.
    pub fn withdraw(&self, uploads: &[StagedUpload]) -> Vec<StagedUpload> {
        let mut pending = self.lock();
        let mut withdrawn = Vec::new();
        pending.retain(|upload| {
            if uploads.contains(upload) {
                withdrawn.push(upload.clone());
                false
            } else {
                true
            }
        });
        withdrawn
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the Vec half-written
    fn lock(&self) -> MutexGuard<'_, Vec<StagedUpload>> {
        self.uploads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
