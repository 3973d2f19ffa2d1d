//! Type definitions for GraphQL introspection responses.
//!
//! These types mirror the `__type` introspection payload. Every field is
//! optional or defaulted: servers differ slightly in what they return, and a
//! missing piece should degrade the result rather than reject the payload.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder used wherever a named type could not be recovered.
pub const UNKNOWN_TYPE: &str = "(unknown)";

/// `__TypeKind` as reported by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TypeKind {
    /// Whether this kind is a `NON_NULL` or `LIST` wrapper rather than a named type.
    #[must_use]
    pub const fn is_wrapper(self) -> bool {
        matches!(self, Self::List | Self::NonNull)
    }

    /// Whether values of this kind can be refined with inline fragments.
    #[must_use]
    pub const fn is_abstract(self) -> bool {
        matches!(self, Self::Interface | Self::Union)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scalar => "SCALAR",
            Self::Object => "OBJECT",
            Self::Interface => "INTERFACE",
            Self::Union => "UNION",
            Self::Enum => "ENUM",
            Self::InputObject => "INPUT_OBJECT",
            Self::List => "LIST",
            Self::NonNull => "NON_NULL",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// One named type as returned by `__type(name: ...)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawType {
    pub kind: Option<TypeKind>,
    pub name: Option<String>,
    pub fields: Option<Vec<RawField>>,
    pub possible_types: Option<Vec<PossibleType>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawField {
    pub name: String,
    pub description: Option<String>,
    pub args: Option<Vec<RawInputValue>>,
    #[serde(rename = "type")]
    pub type_ref: Option<RawTypeRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawInputValue {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_ref: Option<RawTypeRef>,
}

/// A concrete type an interface or union may resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PossibleType {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
}

/// A possibly wrapped type reference (`ofType` chain).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTypeRef {
    pub kind: Option<TypeKind>,
    pub name: Option<String>,
    pub of_type: Option<Box<RawTypeRef>>,
}

/// A type wrapper layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wrapper {
    NonNull,
    List,
}

/// Result of stripping every wrapper layer from a [`RawTypeRef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnwrappedType {
    /// Kind of the named leaf, `None` when the chain ends before a leaf.
    pub leaf_kind: Option<TypeKind>,
    pub leaf_name: Option<String>,
    /// Wrappers in the order they were encountered, outermost first.
    pub wrappers: Vec<Wrapper>,
}

impl UnwrappedType {
    #[must_use]
    pub fn is_list(&self) -> bool {
        self.wrappers.contains(&Wrapper::List)
    }

    /// Leaf type name, or [`UNKNOWN_TYPE`] when it was not reported.
    #[must_use]
    pub fn leaf_name_or_unknown(&self) -> &str {
        self.leaf_name.as_deref().unwrap_or(UNKNOWN_TYPE)
    }
}

impl RawTypeRef {
    #[must_use]
    pub fn named(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind: Some(kind),
            name: Some(name.into()),
            of_type: None,
        }
    }

    #[must_use]
    pub fn non_null(of_type: Self) -> Self {
        Self {
            kind: Some(TypeKind::NonNull),
            name: None,
            of_type: Some(Box::new(of_type)),
        }
    }

    #[must_use]
    pub fn list(of_type: Self) -> Self {
        Self {
            kind: Some(TypeKind::List),
            name: None,
            of_type: Some(Box::new(of_type)),
        }
    }

    /// Strips `NON_NULL`/`LIST` layers until a named leaf is reached.
    ///
    /// ```
    /// # use gqlvis_introspect::{RawTypeRef, TypeKind, Wrapper};
    /// let type_ref = RawTypeRef::non_null(RawTypeRef::list(RawTypeRef::named(
    ///     TypeKind::Scalar,
    ///     "String",
    /// )));
    /// let unwrapped = type_ref.unwrap_wrappers();
    /// assert_eq!(unwrapped.leaf_kind, Some(TypeKind::Scalar));
    /// assert_eq!(unwrapped.leaf_name.as_deref(), Some("String"));
    /// assert_eq!(unwrapped.wrappers, vec![Wrapper::NonNull, Wrapper::List]);
    /// ```
    #[must_use]
    pub fn unwrap_wrappers(&self) -> UnwrappedType {
        let mut wrappers = Vec::new();
        let mut current = Some(self);

        while let Some(type_ref) = current {
            let Some(kind) = type_ref.kind.filter(|kind| kind.is_wrapper()) else {
                break;
            };
            wrappers.push(if kind == TypeKind::List {
                Wrapper::List
            } else {
                Wrapper::NonNull
            });
            current = type_ref.of_type.as_deref();
        }

        UnwrappedType {
            leaf_kind: current.and_then(|leaf| leaf.kind),
            leaf_name: current.and_then(|leaf| leaf.name.clone()),
            wrappers,
        }
    }

    /// Converts the type reference to GraphQL type syntax.
    ///
    /// Missing links in the chain render as [`UNKNOWN_TYPE`], so a chain
    /// truncated by the introspection query depth still yields a readable
    /// signature.
    ///
    /// ```
    /// # use gqlvis_introspect::{RawTypeRef, TypeKind};
    /// let type_ref = RawTypeRef::non_null(RawTypeRef::list(RawTypeRef::non_null(
    ///     RawTypeRef::named(TypeKind::Scalar, "String"),
    /// )));
    /// assert_eq!(type_ref.to_type_string(), "[String!]!");
    /// ```
    #[must_use]
    pub fn to_type_string(&self) -> String {
        match self.kind {
            Some(TypeKind::NonNull) => format!("{}!", type_string(self.of_type.as_deref())),
            Some(TypeKind::List) => format!("[{}]", type_string(self.of_type.as_deref())),
            _ => self.name.as_deref().unwrap_or(UNKNOWN_TYPE).to_string(),
        }
    }
}

/// [`RawTypeRef::to_type_string`] for an optional reference.
#[must_use]
pub fn type_string(type_ref: Option<&RawTypeRef>) -> String {
    type_ref.map_or_else(|| UNKNOWN_TYPE.to_string(), RawTypeRef::to_type_string)
}

impl fmt::Display for RawTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_type_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string() -> RawTypeRef {
        RawTypeRef::named(TypeKind::Scalar, "String")
    }

    #[test]
    fn test_unwrap_non_null_list() {
        let type_ref = RawTypeRef::non_null(RawTypeRef::list(string()));
        let unwrapped = type_ref.unwrap_wrappers();

        assert_eq!(unwrapped.leaf_kind, Some(TypeKind::Scalar));
        assert_eq!(unwrapped.leaf_name_or_unknown(), "String");
        assert_eq!(unwrapped.wrappers, vec![Wrapper::NonNull, Wrapper::List]);
        assert!(unwrapped.is_list());
        assert_eq!(type_ref.to_type_string(), "[String]!");
    }

    #[test]
    fn test_unwrap_named_type_has_no_wrappers() {
        let unwrapped = string().unwrap_wrappers();
        assert!(unwrapped.wrappers.is_empty());
        assert!(!unwrapped.is_list());
    }

    #[test]
    fn test_truncated_chain_is_unknown() {
        // NON_NULL -> LIST with the inner type cut off by the query depth
        let type_ref = RawTypeRef {
            kind: Some(TypeKind::NonNull),
            name: None,
            of_type: Some(Box::new(RawTypeRef {
                kind: Some(TypeKind::List),
                name: None,
                of_type: None,
            })),
        };

        let unwrapped = type_ref.unwrap_wrappers();
        assert_eq!(unwrapped.leaf_kind, None);
        assert_eq!(unwrapped.leaf_name_or_unknown(), UNKNOWN_TYPE);
        assert_eq!(type_ref.to_type_string(), "[(unknown)]!");
    }

    #[test]
    fn test_type_string_for_missing_ref() {
        assert_eq!(type_string(None), UNKNOWN_TYPE);
    }

    #[test]
    fn test_deserialize_lenient_type() {
        let json = serde_json::json!({
            "kind": "OBJECT",
            "name": "Country",
            "fields": [
                {
                    "name": "code",
                    "description": null,
                    "args": null,
                    "type": { "kind": "NON_NULL", "name": null, "ofType": { "kind": "SCALAR", "name": "ID", "ofType": null } }
                }
            ],
            "possibleTypes": null
        });

        let raw: RawType = serde_json::from_value(json).unwrap();
        assert_eq!(raw.kind, Some(TypeKind::Object));
        let fields = raw.fields.unwrap();
        assert_eq!(fields[0].name, "code");
        assert!(fields[0].args.is_none());
        assert_eq!(fields[0].type_ref.as_ref().unwrap().to_type_string(), "ID!");
    }

    #[test]
    fn test_wrapper_and_abstract_kinds() {
        assert!(TypeKind::List.is_wrapper());
        assert!(TypeKind::NonNull.is_wrapper());
        assert!(!TypeKind::Object.is_wrapper());
        assert!(TypeKind::Interface.is_abstract());
        assert!(TypeKind::Union.is_abstract());
        assert!(!TypeKind::Object.is_abstract());
    }

    #[test]
    fn test_unrecognized_kind_is_unknown() {
        let kind: TypeKind = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(kind, TypeKind::Unknown);
    }
}
