use crate::api::error::AppError;
use crate::services::error::StagingError;
use crate::services::manifest::StagedUpload;
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
};
use futures::TryStreamExt;
use serde::Serialize;
use tokio_util::io::StreamReader;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    /// Original names of the files queued for the next analysis
    pub staged: Vec<String>,
    pub rejected: Vec<RejectedUpload>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RejectedUpload {
    pub filename: String,
    pub error: String,
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = Multipart, description = "One or more boxscore files, any field name"),
    responses(
        (status = 200, description = "At least one file was staged; refused files are listed", body = UploadResponse),
        (status = 400, description = "No file part, or every file was refused"),
        (status = 413, description = "Request body too large; nothing from the request is kept")
    ),
    tag = "boxscores"
)]
pub async fn upload_boxscores(
    State(state): State<crate::AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut staged: Vec<StagedUpload> = Vec::new();
    let mut rejected = Vec::new();
    let mut first_rejection = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                state.stager.discard(&staged).await;
                return Err(AppError::from_multipart(&e));
            }
        };

        // Plain form fields carry no filename
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let reader = StreamReader::new(field.map_err(std::io::Error::other));
        match state.stager.stage(&filename, reader).await {
            Ok(upload) => staged.push(upload),
            Err(e) if e.is_rejection() => {
                tracing::warn!("Rejected upload {}: {}", filename, e);
                rejected.push(RejectedUpload {
                    filename,
                    error: e.to_string(),
                });
                first_rejection.get_or_insert(e);
            }
            Err(e) => {
                // A broken body or disk failure ends the request: nothing from it is kept
                state.stager.discard(&staged).await;
                return Err(staging_error(e));
            }
        }
    }

    if staged.is_empty() {
        return Err(match first_rejection {
            Some(e) => AppError::Staging(e),
            None => AppError::BadRequest("No file provided".to_string()),
        });
    }

    Ok(Json(UploadResponse {
        message: format!("{} file(s) have been uploaded", staged.len()),
        staged: staged.into_iter().map(|upload| upload.filename).collect(),
        rejected,
    }))
}

/// A body-limit or framing error surfaces inside the write as an I/O error;
/// report it as the client error it is.
fn staging_error(e: StagingError) -> AppError {
    if let StagingError::Io { source, .. } = &e {
        if let Some(multipart) = source
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<MultipartError>())
        {
            return AppError::from_multipart(multipart);
        }
    }
    AppError::Staging(e)
}
