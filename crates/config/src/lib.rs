//! Discovery and parsing of `.gqlvisrc` configuration files.

mod config;
mod error;
mod loader;

pub use config::{
    CacheConfig, GqlvisConfig, ProxyConfig, RequestConfig, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_ENDPOINT, DEFAULT_PROXY_LISTEN, DEFAULT_PROXY_NAMESPACE, DEFAULT_PROXY_TOKEN_ENV,
    DEFAULT_PROXY_UPSTREAM, DEFAULT_TIMEOUT_SECS, DEFAULT_TTL_SECS,
};
pub use error::{ConfigError, Result};
pub use loader::{find_config, load_config, load_config_from_str};
