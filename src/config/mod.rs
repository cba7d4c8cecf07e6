use std::env;
use std::path::PathBuf;

/// Runtime configuration for the gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// HTTP listening port (default: 3000)
    pub port: u16,

    /// Host of the statistics service (default: "stats-analyzer")
    pub grpc_address: String,

    /// Port of the statistics service (default: 50001)
    pub grpc_port: u16,

    /// Directory where uploads are staged until the next dispatch (default: "uploads")
    pub upload_dir: PathBuf,

    /// Maximum request body size in bytes (default: 16 MB)
    pub max_content_length: usize,

    /// Maximum gRPC message size in both directions (default: 15 MB)
    pub grpc_max_message_size: usize,

    /// Connect timeout for the gRPC channel in seconds (default: 10)
    pub grpc_connect_timeout_secs: u64,

    /// Lowercase extensions accepted by /upload. Empty accepts everything.
    pub allowed_extensions: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            grpc_address: "stats-analyzer".to_string(),
            grpc_port: 50001,
            upload_dir: PathBuf::from("uploads"),
            max_content_length: 16 * 1024 * 1024, // 16 MB
            grpc_max_message_size: 15 * 1024 * 1024, // 15 MB
            grpc_connect_timeout_secs: 10,
            allowed_extensions: Vec::new(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            port: env::var("WEB_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            grpc_address: env::var("GRPC_ADDRESS").unwrap_or(default.grpc_address),

            grpc_port: env::var("GRPC_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.grpc_port),

            upload_dir: env::var("UPLOAD_FOLDER")
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            max_content_length: env::var("MAX_CONTENT_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_content_length),

            grpc_max_message_size: env::var("GRPC_MAX_MESSAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.grpc_max_message_size),

            grpc_connect_timeout_secs: env::var("GRPC_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.grpc_connect_timeout_secs),

            allowed_extensions: env::var("ALLOWED_EXTENSIONS")
                .map(|v| parse_extensions(&v))
                .unwrap_or(default.allowed_extensions),
        }
    }

    /// Local setup: statistics service on localhost, uploads in a scratch folder
    pub fn development() -> Self {
        Self {
            grpc_address: "localhost".to_string(),
            upload_dir: PathBuf::from("uploads-dev"),
            ..Self::default()
        }
    }

    /// URI of the statistics service as tonic expects it
    pub fn grpc_endpoint(&self) -> String {
        format!("http://{}:{}", self.grpc_address, self.grpc_port)
    }
}

fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}
