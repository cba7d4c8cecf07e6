use crate::proto::{FebStatsServiceClient, GetFebStatsRequest};
use crate::services::encoder::EncodedFile;
use crate::services::error::DispatchError;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

/// Everything sent to the statistics service for one dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchRequest {
    pub boxscores: Vec<EncodedFile>,
    pub color_sheet: bool,
}

/// Reply of the statistics service, before it is checked for a payload.
#[derive(Debug, Clone, Default)]
pub struct StatsReply {
    pub sheet: Option<Bytes>,
}

/// Remote statistics computation, one blocking round trip per call.
#[async_trait]
pub trait StatsService: Send + Sync {
    async fn get_stats(&self, request: BatchRequest) -> Result<StatsReply, DispatchError>;
}

/// `StatsService` backed by the `feb_stats.FebStatsService` gRPC API.
pub struct GrpcStatsService {
    client: FebStatsServiceClient,
    endpoint: String,
}

impl GrpcStatsService {
    /// Builds a client whose channel connects on first use, so the gateway
    /// starts even while the statistics service is still down.
    pub fn connect_lazy(
        endpoint: &str,
        connect_timeout: Duration,
        max_message_size: usize,
    ) -> Result<Self, tonic::transport::Error> {
        let channel: Channel = Endpoint::from_shared(endpoint.to_string())?
            .connect_timeout(connect_timeout)
            .connect_lazy();

        let client = FebStatsServiceClient::new(channel)
            .max_decoding_message_size(max_message_size)
            .max_encoding_message_size(max_message_size);

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl StatsService for GrpcStatsService {
    async fn get_stats(&self, request: BatchRequest) -> Result<StatsReply, DispatchError> {
        let message = GetFebStatsRequest {
            boxscores: request
                .boxscores
                .into_iter()
                .map(EncodedFile::into_bytes)
                .collect(),
            color_sheet: request.color_sheet,
        };

        let mut client = self.client.clone();
        let response = client.get_feb_stats(message).await.map_err(|status| {
            tracing::error!(
                "GetFebStats on {} failed: {:?} {}",
                self.endpoint,
                status.code(),
                status.message()
            );
            DispatchError::RemoteCall(format!("{:?}: {}", status.code(), status.message()))
        })?;

        Ok(StatsReply {
            sheet: response.into_inner().sheet.map(Bytes::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_lazy_accepts_valid_endpoint() {
        let service =
            GrpcStatsService::connect_lazy("http://127.0.0.1:50001", Duration::from_secs(1), 1024)
                .unwrap();
        assert_eq!(service.endpoint(), "http://127.0.0.1:50001");
    }

    #[tokio::test]
    async fn test_connect_lazy_rejects_invalid_endpoint() {
        assert!(GrpcStatsService::connect_lazy("not a uri", Duration::from_secs(1), 1024).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_remote_call_error() {
        // Port 9 (discard) on localhost is not a gRPC server
        let service =
            GrpcStatsService::connect_lazy("http://127.0.0.1:9", Duration::from_millis(500), 1024)
                .unwrap();

        let err = service.get_stats(BatchRequest::default()).await.unwrap_err();
        assert!(matches!(err, DispatchError::RemoteCall(_)));
    }
}
