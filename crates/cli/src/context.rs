//! Turns global flags and the config file into ready-to-use components.

use anyhow::{Context, Result};
use gqlvis_cache::{Cache, FileCache, MemoryCache};
use gqlvis_config::{find_config, load_config, GqlvisConfig};
use gqlvis_introspect::{Endpoint, HttpTransport};
use gqlvis_loader::{Session, TypeLoader};
use std::path::PathBuf;
use std::sync::Arc;

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub no_cache: bool,
}

/// Loads the config named by `--config`, or the nearest one above the
/// working directory. No config file means defaults.
pub fn load(globals: &GlobalArgs) -> Result<GqlvisConfig> {
    let path = match &globals.config {
        Some(path) => Some(path.clone()),
        None => {
            let current_dir = std::env::current_dir()?;
            find_config(&current_dir).context("Failed to search for config")?
        }
    };

    match path {
        Some(path) => load_config(&path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            tracing::debug!("No config file found, using defaults");
            Ok(GqlvisConfig::default())
        }
    }
}

/// The endpoint to introspect: `--endpoint`, then the config file, then the default.
pub fn endpoint(globals: &GlobalArgs, config: &GqlvisConfig) -> Result<Endpoint> {
    let raw = globals.endpoint.as_deref().unwrap_or_else(|| config.endpoint());
    Endpoint::parse(raw).context("Invalid endpoint")
}

/// The type cache: the config's cache file unless `--no-cache` is given,
/// otherwise a store that lives as long as the process.
pub fn cache(globals: &GlobalArgs, config: &GqlvisConfig) -> Arc<dyn Cache> {
    match config.cache.file() {
        Some(path) if !globals.no_cache => {
            tracing::debug!(path = %path.display(), "Using persistent type cache");
            Arc::new(FileCache::new(path))
        }
        _ => {
            let cache: MemoryCache = MemoryCache::new();
            Arc::new(cache)
        }
    }
}

pub fn transport(config: &GqlvisConfig) -> HttpTransport {
    let request = &config.request;
    HttpTransport::new()
        .with_headers(request.headers.clone())
        .with_timeout(request.timeout())
        .with_connect_timeout(request.connect_timeout())
        .with_retries(request.retry())
}

/// A session against the configured endpoint, not yet introspected.
pub fn session(globals: &GlobalArgs) -> Result<Session<HttpTransport>> {
    let config = load(globals)?;
    let endpoint = endpoint(globals, &config)?;
    tracing::info!(%endpoint, "Using endpoint");

    let loader = TypeLoader::new(endpoint, transport(&config), cache(globals, &config))
        .with_ttl(config.cache.ttl());
    Ok(Session::new(loader))
}
