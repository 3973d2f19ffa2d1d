use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Endpoint used when neither the config nor the command line names one.
pub const DEFAULT_ENDPOINT: &str = "https://countries.trevorblades.com/";

/// Default lifetime of cached introspection results and proxy responses.
pub const DEFAULT_TTL_SECS: u64 = 24 * 60 * 60;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_PROXY_LISTEN: &str = "127.0.0.1:8787";
pub const DEFAULT_PROXY_UPSTREAM: &str = "https://api.github.com/graphql";
pub const DEFAULT_PROXY_TOKEN_ENV: &str = "GITHUB_TOKEN";
/// Bump to invalidate every cached proxy response.
pub const DEFAULT_PROXY_NAMESPACE: &str = "v1";

/// Top-level gqlvis configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GqlvisConfig {
    /// Endpoint to introspect, credentials may be embedded in the URL.
    pub endpoint: Option<String>,
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
}

impl GqlvisConfig {
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Makes relative paths relative to `base` (the config file's directory).
    pub(crate) fn resolve_paths(&mut self, base: &Path) {
        if let Some(dir) = self.cache.dir.as_mut().filter(|dir| dir.is_relative()) {
            *dir = base.join(&*dir);
        }
    }
}

/// How introspection requests are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RequestConfig {
    /// Seconds.
    pub timeout: Option<u64>,
    /// Seconds.
    pub connect_timeout: Option<u64>,
    pub retry: Option<u32>,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
}

impl RequestConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS))
    }

    #[must_use]
    pub fn retry(&self) -> u32 {
        self.retry.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CacheConfig {
    /// Seconds.
    pub ttl: Option<u64>,
    /// Directory for the persistent cache; in-memory only when unset.
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    /// File name of the persistent cache inside [`Self::dir`].
    pub const FILE_NAME: &'static str = "types.json";

    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl.unwrap_or(DEFAULT_TTL_SECS))
    }

    /// Location of the persistent cache file, when one is configured.
    #[must_use]
    pub fn file(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(Self::FILE_NAME))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProxyConfig {
    pub listen: Option<String>,
    pub upstream: Option<String>,
    /// Environment variable holding the upstream bearer token.
    pub token_env: Option<String>,
    pub namespace: Option<String>,
    /// Seconds.
    pub ttl: Option<u64>,
}

impl ProxyConfig {
    #[must_use]
    pub fn listen(&self) -> &str {
        self.listen.as_deref().unwrap_or(DEFAULT_PROXY_LISTEN)
    }

    #[must_use]
    pub fn upstream(&self) -> &str {
        self.upstream.as_deref().unwrap_or(DEFAULT_PROXY_UPSTREAM)
    }

    #[must_use]
    pub fn token_env(&self) -> &str {
        self.token_env.as_deref().unwrap_or(DEFAULT_PROXY_TOKEN_ENV)
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_PROXY_NAMESPACE)
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl.unwrap_or(DEFAULT_TTL_SECS))
    }
}
