// s3browse: read-only web browser for s3-style buckets

pub mod browse;
pub mod config;
pub mod server;
pub mod store;
pub mod utils;
