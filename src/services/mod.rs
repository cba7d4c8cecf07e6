pub mod dispatcher;
pub mod encoder;
pub mod error;
pub mod manifest;
pub mod responder;
pub mod stager;
pub mod stats_client;
