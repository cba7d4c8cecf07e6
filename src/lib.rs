pub mod api;
pub mod config;
pub mod infrastructure;
pub mod proto;
pub mod services;
pub mod utils;

use crate::config::GatewayConfig;
use crate::services::dispatcher::BatchDispatcher;
use crate::services::manifest::PendingManifest;
use crate::services::stager::UploadStager;
use crate::services::stats_client::StatsService;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::upload::upload_boxscores,
        api::handlers::analyze::analyze,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::upload::UploadResponse,
            api::handlers::upload::RejectedUpload,
            api::handlers::analyze::AnalyzeForm,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "boxscores", description = "Boxscore upload and analysis"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub manifest: Arc<PendingManifest>,
    pub stager: Arc<UploadStager>,
    pub dispatcher: Arc<BatchDispatcher>,
    pub config: GatewayConfig,
}

impl AppState {
    /// Wires stager and dispatcher to one shared manifest.
    pub fn new(config: GatewayConfig, stats: Arc<dyn StatsService>) -> Self {
        let manifest = Arc::new(PendingManifest::new());
        let stager = Arc::new(UploadStager::new(
            config.upload_dir.clone(),
            config.allowed_extensions.clone(),
            manifest.clone(),
        ));
        let dispatcher = Arc::new(BatchDispatcher::new(manifest.clone(), stats));

        Self {
            manifest,
            stager,
            dispatcher,
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route("/upload", post(api::handlers::upload::upload_boxscores))
        .route("/analyze", post(api::handlers::analyze::analyze))
        .layer(axum::extract::DefaultBodyLimit::max(
            state.config.max_content_length,
        ))
        .with_state(state)
}
