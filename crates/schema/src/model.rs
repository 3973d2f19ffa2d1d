use gqlvis_introspect::{PossibleType, TypeKind, UnwrappedType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How a field's value is shaped, with all nullability discarded.
///
/// Any nesting of `NON_NULL`/`LIST` collapses to "is it a list of the leaf".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldKind {
    Scalar,
    Object,
    Interface,
    ListScalar,
    ListObject,
    ListInterface,
}

impl FieldKind {
    /// Classifies an unwrapped field type.
    ///
    /// Object and interface leaves keep their kind; every other leaf (scalars,
    /// enums, unions, or an unknown leaf) is treated as a scalar. A `LIST`
    /// anywhere in the wrapper chain makes it a list kind.
    #[must_use]
    pub fn classify(unwrapped: &UnwrappedType) -> Self {
        let list = unwrapped.is_list();
        match (unwrapped.leaf_kind, list) {
            (Some(TypeKind::Object), false) => Self::Object,
            (Some(TypeKind::Object), true) => Self::ListObject,
            (Some(TypeKind::Interface), false) => Self::Interface,
            (Some(TypeKind::Interface), true) => Self::ListInterface,
            (_, false) => Self::Scalar,
            (_, true) => Self::ListScalar,
        }
    }

    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(
            self,
            Self::ListScalar | Self::ListObject | Self::ListInterface
        )
    }

    /// Whether the field needs a sub-selection.
    #[must_use]
    pub const fn is_composite(self) -> bool {
        !self.is_scalar()
    }

    #[must_use]
    pub const fn is_scalar(self) -> bool {
        matches!(self, Self::Scalar | Self::ListScalar)
    }

    /// Kind of the leaf type behind this field.
    #[must_use]
    pub const fn leaf_kind(self) -> TypeKind {
        match self {
            Self::Scalar | Self::ListScalar => TypeKind::Scalar,
            Self::Object | Self::ListObject => TypeKind::Object,
            Self::Interface | Self::ListInterface => TypeKind::Interface,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Object => "OBJECT",
            Self::Interface => "INTERFACE",
            Self::ListScalar => "LIST_SCALAR",
            Self::ListObject => "LIST_OBJECT",
            Self::ListInterface => "LIST_INTERFACE",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Definition of one field argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgDef {
    /// GraphQL type syntax, e.g. `[String!]!`.
    pub type_signature: String,
    pub description: Option<String>,
}

impl ArgDef {
    #[must_use]
    pub fn new(type_signature: impl Into<String>) -> Self {
        Self {
            type_signature: type_signature.into(),
            description: None,
        }
    }

    /// An argument is required when its signature is non-null.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.type_signature.ends_with('!')
    }
}

/// Arguments of a field, in server order.
pub type ArgDefs = IndexMap<String, ArgDef>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedField {
    pub kind: FieldKind,
    pub leaf_type_name: String,
    pub description: Option<String>,
    pub args: ArgDefs,
}

impl SimplifiedField {
    /// Names of the arguments that must always be supplied.
    pub fn required_args(&self) -> impl Iterator<Item = &str> {
        self.args
            .iter()
            .filter(|(_, arg)| arg.is_required())
            .map(|(name, _)| name.as_str())
    }
}

/// Compact view of an object or interface type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedType {
    pub name: String,
    pub kind: TypeKind,
    pub fields: IndexMap<String, SimplifiedField>,
    /// Concrete types offered as inline fragments, in server order.
    pub possible_types: Vec<PossibleType>,
}

impl SimplifiedType {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&SimplifiedField> {
        self.fields.get(name)
    }

    /// Fields that are selected by name alone.
    pub fn scalar_fields(&self) -> impl Iterator<Item = (&str, &SimplifiedField)> {
        self.fields
            .iter()
            .filter(|(_, field)| field.kind.is_scalar())
            .map(|(name, field)| (name.as_str(), field))
    }

    /// Fields that need a nested selection.
    pub fn composite_fields(&self) -> impl Iterator<Item = (&str, &SimplifiedField)> {
        self.fields
            .iter()
            .filter(|(_, field)| field.kind.is_composite())
            .map(|(name, field)| (name.as_str(), field))
    }

    /// Whether inline fragments can be offered for values of this type.
    #[must_use]
    pub fn has_possible_types(&self) -> bool {
        !self.possible_types.is_empty()
    }

    #[must_use]
    pub fn possible_type(&self, name: &str) -> Option<&PossibleType> {
        self.possible_types.iter().find(|possible| possible.name == name)
    }
}
