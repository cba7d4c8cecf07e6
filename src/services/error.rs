use std::path::PathBuf;
use thiserror::Error;

/// Failure while receiving and staging a single upload.
///
/// Always scoped to one file: a staging error never reaches the manifest.
#[derive(Error, Debug)]
pub enum StagingError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("File extension not allowed: {0}")]
    ExtensionNotAllowed(String),
}

impl StagingError {
    /// True when the file itself was refused and nothing was written
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            StagingError::InvalidFilename(_) | StagingError::ExtensionNotAllowed(_)
        )
    }
}

/// Failure of one dispatch cycle.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Failed to read staged file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Statistics service call failed: {0}")]
    RemoteCall(String),

    #[error("Malformed response from statistics service: {0}")]
    MalformedResponse(String),
}

impl DispatchError {
    /// True for failures on the remote side of the call
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            DispatchError::RemoteCall(_) | DispatchError::MalformedResponse(_)
        )
    }
}
