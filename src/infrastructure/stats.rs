use crate::config::GatewayConfig;
use crate::services::stats_client::{GrpcStatsService, StatsService};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub fn setup_stats_client(config: &GatewayConfig) -> anyhow::Result<Arc<dyn StatsService>> {
    let endpoint = config.grpc_endpoint();
    let service = GrpcStatsService::connect_lazy(
        &endpoint,
        Duration::from_secs(config.grpc_connect_timeout_secs),
        config.grpc_max_message_size,
    )
    .map_err(|e| anyhow::anyhow!("Invalid statistics service endpoint {}: {}", endpoint, e))?;

    info!(
        "📊 Statistics service: {} (max message {}MB)",
        service.endpoint(),
        config.grpc_max_message_size / 1024 / 1024
    );

    Ok(Arc::new(service))
}
