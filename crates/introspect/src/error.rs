use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransportError>;

/// Failures reported by the request capability.
///
/// The `Display` output is what users see: a bare `HTTP <status>` for
/// transport-level failures and the joined server messages for GraphQL errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {0}")]
    Http(u16),

    #[error("{0}")]
    GraphQL(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
}
