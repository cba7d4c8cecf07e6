use crate::services::error::StagingError;
use std::path::Path;

/// Reduces a client-supplied filename to a safe single path component.
pub fn sanitize_filename(filename: &str) -> Result<String, StagingError> {
    // Clients on Windows send backslash-separated paths
    let last = filename.rsplit(['/', '\\']).next().unwrap_or("");
    let name = Path::new(last)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        tracing::warn!("Path components stripped from upload filename: {}", filename);
    }

    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_control()
                || matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|' | ';')
            {
                '_'
            } else {
                c
            }
        })
        .collect();

    let sanitized = sanitized.trim().trim_start_matches('.').to_string();
    if sanitized.is_empty() {
        return Err(StagingError::InvalidFilename(filename.to_string()));
    }

    Ok(sanitized)
}

/// Checks the extension of `filename` against an allow-list of lowercase
/// extensions. An empty list accepts every file.
pub fn validate_extension(filename: &str, allowed: &[String]) -> Result<(), StagingError> {
    if allowed.is_empty() {
        return Ok(());
    }

    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if allowed.iter().any(|a| *a == extension) {
        Ok(())
    } else {
        Err(StagingError::ExtensionNotAllowed(filename.to_string()))
    }
}
