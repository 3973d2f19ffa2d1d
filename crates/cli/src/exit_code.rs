//! Exit codes for the gqlvis CLI.
//!
//! Scripts can tell a bad invocation apart from a bad config file or an
//! endpoint that could not be introspected.

use gqlvis_config::ConfigError;
use gqlvis_introspect::TransportError;
use gqlvis_loader::LoaderError;
use gqlvis_proxy::ProxyError;

/// Exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - no errors
    Success = 0,
    /// Invalid arguments, unknown fields or paths, or a query that cannot be built
    UsageError = 1,
    /// Configuration error (unreadable or invalid config file)
    ConfigError = 2,
    /// The endpoint could not be reached or its schema could not be read
    SchemaError = 3,
}

impl ExitCode {
    /// Picks the exit code for an error by looking through its cause chain.
    #[must_use]
    pub fn for_error(error: &anyhow::Error) -> Self {
        for cause in error.chain() {
            if cause.is::<ConfigError>() {
                return Self::ConfigError;
            }
            if cause.is::<TransportError>() || cause.is::<ProxyError>() {
                return Self::SchemaError;
            }
            if let Some(loader) = cause.downcast_ref::<LoaderError>() {
                return if loader.is_schema_error() {
                    Self::SchemaError
                } else {
                    Self::UsageError
                };
            }
        }
        Self::UsageError
    }

    /// Get the numeric value of this exit code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code.code())
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::UsageError => write!(f, "usage error"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::SchemaError => write!(f, "schema load error"),
        }
    }
}
