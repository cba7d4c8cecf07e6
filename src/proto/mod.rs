//! Wire types and client for the `feb_stats.FebStatsService` gRPC API.
//!
//! ```proto
//! package feb_stats;
//!
//! service FebStatsService {
//!   rpc GetFebStats(GetFebStatsRequest) returns (GetFebStatsResponse);
//! }
//!
//! message GetFebStatsRequest {
//!   repeated bytes boxscores = 1;
//!   bool color_sheet = 2;
//! }
//!
//! message GetFebStatsResponse {
//!   bytes sheet = 1;
//! }
//! ```

use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetFebStatsRequest {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub boxscores: Vec<Vec<u8>>,
    #[prost(bool, tag = "2")]
    pub color_sheet: bool,
}

/// `sheet` is read with explicit presence so that a reply without a payload
/// can be told apart from one that carries it.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetFebStatsResponse {
    #[prost(bytes = "vec", optional, tag = "1")]
    pub sheet: Option<Vec<u8>>,
}

const GET_FEB_STATS_PATH: &str = "/feb_stats.FebStatsService/GetFebStats";

/// Unary client for `FebStatsService`.
#[derive(Debug, Clone)]
pub struct FebStatsServiceClient {
    inner: tonic::client::Grpc<Channel>,
}

impl FebStatsServiceClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    /// Limits the size of decoded replies.
    #[must_use]
    pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
        self.inner = self.inner.max_decoding_message_size(limit);
        self
    }

    /// Limits the size of encoded requests.
    #[must_use]
    pub fn max_encoding_message_size(mut self, limit: usize) -> Self {
        self.inner = self.inner.max_encoding_message_size(limit);
        self
    }

    pub async fn get_feb_stats(
        &mut self,
        request: impl tonic::IntoRequest<GetFebStatsRequest>,
    ) -> Result<tonic::Response<GetFebStatsResponse>, tonic::Status> {
        self.inner.ready().await.map_err(|e| {
            tonic::Status::unavailable(format!("Service was not ready: {}", e))
        })?;
        let codec = tonic::codec::ProstCodec::default();
        let path = PathAndQuery::from_static(GET_FEB_STATS_PATH);
        self.inner.unary(request.into_request(), path, codec).await
    }
}
