use gqlvis_introspect::TransportError;
use gqlvis_query::QueryError;
use gqlvis_selection::SelectionError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoaderError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("No schema loaded; introspect the endpoint first")]
    NotIntrospected,

    #[error("No root field selected")]
    NoRootField,

    #[error("Type '{0}' is not an object or interface, or does not exist")]
    TypeUnavailable(String),

    #[error("'{field}' is not a selectable root field of {type_name}{}", did_you_mean(.suggestion.as_deref()))]
    UnknownRootField {
        type_name: String,
        field: String,
        suggestion: Option<String>,
    },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("The selection changed while '{0}' was loading")]
    Stale(String),
}

impl LoaderError {
    /// Whether the error came from talking to the server or from the schema it returned.
    #[must_use]
    pub const fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::Schema(_) | Self::Transport(_) | Self::TypeUnavailable(_)
        )
    }
}

fn did_you_mean(suggestion: Option<&str>) -> String {
    suggestion.map_or_else(String::new, |name| format!(" (did you mean '{name}'?)"))
}
