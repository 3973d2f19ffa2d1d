use std::net::SocketAddr;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProxyError>;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Failed to listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Invalid upstream URL: {0}")]
    InvalidUpstream(String),
}
