// configuration type definitions

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// command line interface definition
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "s3browse", version = env!("CARGO_PKG_VERSION"))]
#[command(about = "read-only web browser for s3-style buckets")]
pub struct Cli {
    /// bucket to browse
    #[arg(short = 'b', long, env = "AWS_BUCKET")]
    pub bucket: Option<String>,

    /// object store backend
    #[arg(long, value_enum)]
    pub backend: Option<StoreBackend>,

    /// s3 region
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// s3 endpoint url (minio, ceph, ...)
    #[arg(short = 'e', long, env = "AWS_ENDPOINT")]
    pub endpoint: Option<String>,

    /// address buckets as <endpoint>/<bucket> instead of <bucket>.<endpoint>
    #[arg(long, env = "AWS_USE_PATH_STYLE")]
    pub use_path_style: Option<bool>,

    /// s3 access key id
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key_id: Option<String>,

    /// s3 secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_access_key: Option<String>,

    /// directory holding one sub-directory per bucket (filesystem backend)
    #[arg(short = 'r', long)]
    pub root: Option<PathBuf>,

    /// host to listen on
    #[arg(short = 'l', long)]
    pub host: Option<String>,

    /// port to listen on
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// config file to use
    #[arg(short = 'c', long)]
    pub config_file: Option<PathBuf>,

    /// increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, action = clap::ArgAction::Count)]
    pub quiet: u8,
}

/// complete application configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub listing: ListingConfig,
}

/// server configuration section
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// which object store implementation serves the bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// s3 or an s3-compatible service
    #[default]
    S3,
    /// local directory, one sub-directory per bucket
    Filesystem,
}

/// object store configuration, handed to the store factory
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub use_path_style: bool,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub root: PathBuf,
}

/// listing behavior
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListingConfig {
    /// maximum folder freshness lookups in flight per request
    #[serde(default = "default_freshness_concurrency")]
    pub freshness_concurrency: usize,
    /// optional deadline for rendering one page
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            bucket: String::new(),
            region: "us-east-1".to_string(),
            endpoint: None,
            use_path_style: false,
            access_key_id: None,
            secret_access_key: None,
            root: PathBuf::from("."),
        }
    }
}

// secrets stay out of debug logs
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend", &self.backend)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("use_path_style", &self.use_path_style)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("root", &self.root)
            .finish()
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            freshness_concurrency: default_freshness_concurrency(),
            request_timeout_secs: None,
        }
    }
}

// default value functions for serde
fn default_freshness_concurrency() -> usize {
    8
}
