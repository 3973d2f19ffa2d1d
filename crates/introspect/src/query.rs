//! Introspection queries issued while building a selection.
//!
//! Rather than fetching the whole schema up front, types are introspected one
//! at a time as the user expands the selection.

use crate::RawType;
use serde::Deserialize;

/// Resolves the name of the schema's query root type.
pub const ROOT_TYPE_QUERY: &str = r"
query {
  __schema { queryType { name } }
}
";

/// Fetches a single named type.
///
/// Type references are requested three `ofType` levels deep, enough for
/// signatures such as `[String!]!`. Deeper wrapper nesting is cut off and
/// later renders as `(unknown)`.
pub const TYPE_QUERY: &str = r"
query ($name: String!) {
  __type(name: $name) {
    kind
    name
    fields(includeDeprecated: false) {
      name
      description
      type { kind name ofType { kind name ofType { kind name ofType { kind name } } } }
      args {
        name
        description
        type { kind name ofType { kind name ofType { kind name ofType { kind name } } } }
      }
    }
    possibleTypes {
      kind
      name
    }
  }
}
";

/// Data returned for [`ROOT_TYPE_QUERY`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RootTypeData {
    #[serde(rename = "__schema")]
    pub schema: Option<SchemaRoots>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaRoots {
    pub query_type: Option<NamedTypeRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamedTypeRef {
    pub name: Option<String>,
}

impl RootTypeData {
    /// The query root type name, if the server reported a non-empty one.
    #[must_use]
    pub fn query_type_name(&self) -> Option<&str> {
        self.schema
            .as_ref()
            .and_then(|schema| schema.query_type.as_ref())
            .and_then(|query_type| query_type.name.as_deref())
            .filter(|name| !name.is_empty())
    }
}

/// Data returned for [`TYPE_QUERY`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TypeData {
    #[serde(rename = "__type")]
    pub type_: Option<RawType>,
}

/// Variables for [`TYPE_QUERY`].
#[must_use]
pub fn type_query_variables(name: &str) -> serde_json::Value {
    serde_json::json!({ "name": name })
}
