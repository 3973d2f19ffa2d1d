use crate::{ConfigError, GqlvisConfig, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names to search for, in order of preference
const CONFIG_FILES: &[&str] = &[
    ".gqlvisrc.yml",
    ".gqlvisrc.yaml",
    ".gqlvisrc.json",
    ".gqlvisrc",
    "gqlvis.config.yml",
    "gqlvis.config.json",
];

/// Find a gqlvis config file by walking up the directory tree from the given start directory.
/// Returns the path to the config file if found.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current_dir = start_dir.to_path_buf();
    let mut checked_dirs = 0;

    loop {
        tracing::trace!(dir = %current_dir.display(), "Checking directory for config files");
        for file_name in CONFIG_FILES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                tracing::debug!(path = %config_path.display(), checked_dirs, "Found config file");
                return Ok(Some(config_path));
            }
        }

        checked_dirs += 1;
        if !current_dir.pop() {
            tracing::debug!(checked_dirs, "No config file found");
            break;
        }
    }

    Ok(None)
}

/// Load a gqlvis config from the specified path.
/// Relative paths inside the file are resolved against the file's directory.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<GqlvisConfig> {
    tracing::debug!("Reading config file");
    let contents = fs::read_to_string(path)?;
    let mut config = load_config_from_str(&contents, path)?;
    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    tracing::debug!(endpoint = config.endpoint(), "Config loaded");
    Ok(config)
}

/// Load a gqlvis config from a string.
/// The path is used for error messages and format detection.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<GqlvisConfig> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");

    let config = match extension {
        "yml" | "yaml" => parse_yaml(contents, path)?,
        "json" => parse_json(contents, path)?,
        "" if file_name == ".gqlvisrc" => {
            // no extension - try YAML first, then JSON
            parse_yaml(contents, path).or_else(|_| parse_json(contents, path))?
        }
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    validate_config(&config, path)?;
    Ok(config)
}

fn parse_yaml(contents: &str, path: &Path) -> Result<GqlvisConfig> {
    // an empty file is an empty config
    if contents.trim().is_empty() {
        return Ok(GqlvisConfig::default());
    }
    serde_saphyr::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("YAML parse error: {e}"),
    })
}

fn parse_json(contents: &str, path: &Path) -> Result<GqlvisConfig> {
    serde_json::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("JSON parse error: {e}"),
    })
}

fn validate_config(config: &GqlvisConfig, path: &Path) -> Result<()> {
    let invalid = |message: String| ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    };

    if let Some(endpoint) = &config.endpoint {
        check_http_url(endpoint).map_err(|reason| invalid(format!("endpoint: {reason}")))?;
    }
    if let Some(upstream) = &config.proxy.upstream {
        check_http_url(upstream).map_err(|reason| invalid(format!("proxy.upstream: {reason}")))?;
    }

    let positive = [
        ("request.timeout", config.request.timeout),
        ("request.connectTimeout", config.request.connect_timeout),
        ("cache.ttl", config.cache.ttl),
        ("proxy.ttl", config.proxy.ttl),
    ];
    for (key, value) in positive {
        if value == Some(0) {
            return Err(invalid(format!("{key} must be greater than zero")));
        }
    }

    if config.proxy.namespace.as_deref().is_some_and(str::is_empty) {
        return Err(invalid("proxy.namespace must not be empty".to_string()));
    }

    tracing::trace!("Config validation passed");
    Ok(())
}

fn check_http_url(raw: &str) -> std::result::Result<(), String> {
    let url = url::Url::parse(raw).map_err(|e| format!("'{raw}' is not a valid URL ({e})"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{other}', expected http or https")),
    }
}
