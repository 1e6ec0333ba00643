// configuration loading and merging logic

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

use super::types::{AppConfig, Cli, StoreBackend};

/// environment variable prefix, nested keys use "__" (S3BROWSE_STORE__BUCKET)
pub const ENV_PREFIX: &str = "S3BROWSE_";

/// load and merge configuration from multiple sources
/// precedence: defaults < config file < environment < cli arguments
pub fn load_configuration(cli: &Cli) -> Result<AppConfig> {
    debug!("loading configuration, config file: {:?}", cli.config_file);

    // start with default configuration
    let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

    // merge config file if provided
    if let Some(config_path) = &cli.config_file {
        if config_path.exists() {
            info!("loading config file: {}", config_path.display());
            figment = figment.merge(Toml::file(config_path));
        } else {
            anyhow::bail!("config file not found: {}", config_path.display());
        }
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    // merge cli overrides - highest precedence
    figment = figment.merge(Serialized::defaults(cli_overrides(cli)));

    // extract final configuration
    let config: AppConfig = figment.extract().context("failed to parse configuration")?;

    validate_configuration(&config)?;

    debug!("final configuration: {:?}", config);
    Ok(config)
}

// only flags that were actually given are serialized, so unset flags never
// mask values from the config file or environment
#[derive(Serialize)]
struct CliOverrides {
    server: ServerOverrides,
    store: StoreOverrides,
}

#[derive(Serialize)]
struct ServerOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
}

#[derive(Serialize)]
struct StoreOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    backend: Option<StoreBackend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    use_path_style: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    root: Option<PathBuf>,
}

/// convert cli arguments to configuration overrides
fn cli_overrides(cli: &Cli) -> CliOverrides {
    CliOverrides {
        server: ServerOverrides {
            host: cli.host.clone(),
            port: cli.port,
        },
        store: StoreOverrides {
            backend: cli.backend,
            bucket: cli.bucket.clone(),
            region: cli.region.clone(),
            endpoint: cli.endpoint.clone(),
            use_path_style: cli.use_path_style,
            access_key_id: cli.access_key_id.clone(),
            secret_access_key: cli.secret_access_key.clone(),
            root: cli.root.clone(),
        },
    }
}

/// validate configuration for consistency
pub fn validate_configuration(config: &AppConfig) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("port cannot be 0");
    }

    let store = &config.store;
    if store.bucket.is_empty() {
        anyhow::bail!("no bucket configured (use --bucket, AWS_BUCKET or [store] bucket)");
    }
    if store.bucket.contains('/') || store.bucket == "." || store.bucket == ".." {
        anyhow::bail!("invalid bucket name: {}", store.bucket);
    }

    match store.backend {
        StoreBackend::S3 => {
            if store.region.is_empty() {
                anyhow::bail!("s3 backend needs a region");
            }

            if let Some(endpoint) = &store.endpoint {
                if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                    anyhow::bail!("endpoint must be an http(s) url: {}", endpoint);
                }
            }

            // static credentials come as a pair or not at all
            if let (Some(_), None) | (None, Some(_)) =
                (&store.access_key_id, &store.secret_access_key)
            {
                anyhow::bail!("both access_key_id and secret_access_key must be provided");
            }
        }
        StoreBackend::Filesystem => {
            if !store.root.exists() {
                anyhow::bail!("store root does not exist: {}", store.root.display());
            }
            if !store.root.is_dir() {
                anyhow::bail!("store root is not a directory: {}", store.root.display());
            }
        }
    }

    if config.listing.freshness_concurrency == 0 {
        anyhow::bail!("freshness_concurrency must be at least 1");
    }
    if config.listing.request_timeout_secs == Some(0) {
        anyhow::bail!("request_timeout_secs cannot be 0");
    }

    Ok(())
}
