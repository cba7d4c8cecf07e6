use crate::services::dispatcher::BatchResult;
use crate::services::error::DispatchError;
use axum::{
    Json,
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, TimeZone};
use serde_json::json;

pub const SHEET_CONTENT_TYPE: &str = "application/vnd.ms-excel";

/// `estadisticas_<dd>_<mm>_<yyyy>_<H>:<MM>.xlsx`, hour without padding.
pub fn sheet_filename<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("estadisticas_{}.xlsx", now.format("%d_%m_%Y_%-H:%M"))
}

/// Turns the outcome of a dispatch into the HTTP reply for `/analyze`.
pub fn respond<Tz: TimeZone>(result: BatchResult, now: &DateTime<Tz>) -> Response
where
    Tz::Offset: std::fmt::Display,
{
    match result {
        BatchResult::Sheet(sheet) => {
            let content_disposition = format!("attachment; filename={}", sheet_filename(now));
            let content_length = sheet.len();
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, SHEET_CONTENT_TYPE.to_string()),
                    (header::CONTENT_DISPOSITION, content_disposition),
                    (header::CONTENT_LENGTH, content_length.to_string()),
                ],
                Body::from(sheet),
            )
                .into_response()
        }
        BatchResult::Failed(e) => failure_response(e),
    }
}

fn failure_response(error: DispatchError) -> Response {
    let status = if error.is_upstream() {
        StatusCode::BAD_GATEWAY
    } else {
        tracing::error!("Dispatch failed locally: {:?}", error);
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::{FixedOffset, Utc};
    use http_body_util::BodyExt;
    use serde_json::Value;

    #[test]
    fn test_sheet_filename_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(sheet_filename(&at), "estadisticas_07_03_2024_9:05.xlsx");

        let evening = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2023, 12, 31, 21, 45, 0)
            .unwrap();
        assert_eq!(sheet_filename(&evening), "estadisticas_31_12_2023_21:45.xlsx");
    }

    #[tokio::test]
    async fn test_success_response_headers() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
        let payload = Bytes::from_static(&[0xAB; 17]);

        let response = respond(BatchResult::Sheet(payload.clone()), &at);

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], SHEET_CONTENT_TYPE);
        assert_eq!(headers[header::CONTENT_LENGTH], "17");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=estadisticas_07_03_2024_9:05.xlsx"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, payload);
    }

    #[tokio::test]
    async fn test_remote_failure_is_bad_gateway_without_sheet_headers() {
        let at = Utc::now();
        let response = respond(
            BatchResult::Failed(DispatchError::RemoteCall("Unavailable: down".to_string())),
            &at,
        );

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("Unavailable"));
    }

    #[tokio::test]
    async fn test_malformed_and_io_failures() {
        let at = Utc::now();
        let malformed = respond(
            BatchResult::Failed(DispatchError::MalformedResponse("sheet is missing".into())),
            &at,
        );
        assert_eq!(malformed.status(), StatusCode::BAD_GATEWAY);

        let io = respond(
            BatchResult::Failed(DispatchError::Io {
                path: "uploads/x.html".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
            &at,
        );
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
