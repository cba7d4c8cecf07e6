use crate::services::dispatcher::DispatchOptions;
use crate::services::responder;
use axum::{
    Form,
    extract::State,
    response::Response,
};
use chrono::Local;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AnalyzeForm {
    /// Any non-empty value asks for a colored sheet
    #[serde(rename = "color-sheet")]
    pub color_sheet: Option<String>,
}

impl AnalyzeForm {
    fn options(&self) -> DispatchOptions {
        DispatchOptions {
            color_sheet: self.color_sheet.as_deref().is_some_and(|v| !v.is_empty()),
        }
    }
}

#[utoipa::path(
    post,
    path = "/analyze",
    request_body(content = AnalyzeForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Spreadsheet attachment (application/vnd.ms-excel)"),
        (status = 500, description = "A staged file could not be read"),
        (status = 502, description = "Statistics service failed or returned no sheet")
    ),
    tag = "boxscores"
)]
pub async fn analyze(
    State(state): State<crate::AppState>,
    form: Option<Form<AnalyzeForm>>,
) -> Response {
    let options = form.map(|Form(f)| f.options()).unwrap_or_default();
    let result = state.dispatcher.dispatch_batch(options).await;
    responder::respond(result, &Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_sheet_flag() {
        let on = AnalyzeForm {
            color_sheet: Some("on".to_string()),
        };
        assert!(on.options().color_sheet);

        let empty = AnalyzeForm {
            color_sheet: Some(String::new()),
        };
        assert!(!empty.options().color_sheet);
        assert!(!AnalyzeForm::default().options().color_sheet);
    }
}
