use gqlvis_introspect::TypeKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SelectionError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Field '{field}' not found in {type_name}{}", did_you_mean(.suggestion.as_deref()))]
    UnknownField {
        type_name: String,
        field: String,
        suggestion: Option<String>,
    },

    #[error("Field '{field}' is a scalar and cannot have a sub-selection")]
    ScalarField { field: String },

    #[error("Field '{field}' is already selected")]
    DuplicateChild { field: String },

    #[error("{type_name} is {kind}, so it cannot have inline fragments")]
    NotAbstract { type_name: String, kind: TypeKind },

    #[error("Inline fragment on '{type_name}' is already selected")]
    DuplicateFragment { type_name: String },

    #[error("Child index {index} out of range ({len} children)")]
    ChildIndex { index: usize, len: usize },
}

fn did_you_mean(suggestion: Option<&str>) -> String {
    suggestion.map_or_else(String::new, |name| format!(" (did you mean '{name}'?)"))
}
