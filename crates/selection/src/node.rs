use crate::{Result, SelectionError};
use gqlvis_introspect::{PossibleType, TypeKind};
use gqlvis_schema::{ArgDefs, FieldKind, SimplifiedField, SimplifiedType};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// What an edge from a node to one of its children selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChildKind {
    /// A nested field of the given kind.
    Field(FieldKind),
    /// `... on <Type>`; the edge's name is the type condition.
    InlineFragment,
}

impl ChildKind {
    #[must_use]
    pub const fn is_inline_fragment(self) -> bool {
        matches!(self, Self::InlineFragment)
    }
}

/// One ordered edge of the selection tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    /// Field name, or the type condition for inline fragments.
    pub field_name: String,
    pub kind: ChildKind,
    pub node: SelectionNode,
}

/// What to select at one position of the query, for a value of `type_name`.
///
/// Nodes are values: every edit returns a new node and leaves the receiver
/// untouched, so a previously held tree never observes later edits.
///
/// Arguments whose signature is non-null are selected when the node is
/// created and can never be removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionNode {
    type_name: String,
    type_kind: TypeKind,
    args_def: ArgDefs,
    selected_arguments: IndexSet<String>,
    selected_scalars: IndexSet<String>,
    children: Vec<Child>,
}

impl SelectionNode {
    /// Creates an empty node with every required argument pre-selected.
    #[must_use]
    pub fn new(type_name: impl Into<String>, type_kind: TypeKind, args_def: ArgDefs) -> Self {
        let selected_arguments = args_def
            .iter()
            .filter(|(_, arg)| arg.is_required())
            .map(|(name, _)| name.clone())
            .collect();

        Self {
            type_name: type_name.into(),
            type_kind,
            args_def,
            selected_arguments,
            selected_scalars: IndexSet::new(),
            children: Vec::new(),
        }
    }

    /// Node for the value of `field`.
    #[must_use]
    pub fn for_field(field: &SimplifiedField) -> Self {
        Self::new(
            field.leaf_type_name.clone(),
            field.kind.leaf_kind(),
            field.args.clone(),
        )
    }

    /// Node for the body of an inline fragment. Fragments take no arguments.
    #[must_use]
    pub fn for_fragment(possible_type: &PossibleType) -> Self {
        Self::new(
            possible_type.name.clone(),
            possible_type.kind,
            ArgDefs::new(),
        )
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub const fn type_kind(&self) -> TypeKind {
        self.type_kind
    }

    /// Argument definitions of the field that produced this node.
    #[must_use]
    pub const fn args_def(&self) -> &ArgDefs {
        &self.args_def
    }

    #[must_use]
    pub const fn selected_arguments(&self) -> &IndexSet<String> {
        &self.selected_arguments
    }

    #[must_use]
    pub const fn selected_scalars(&self) -> &IndexSet<String> {
        &self.selected_scalars
    }

    #[must_use]
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    #[must_use]
    pub fn is_required_argument(&self, name: &str) -> bool {
        self.args_def.get(name).is_some_and(|arg| arg.is_required())
    }

    /// Whether nothing beyond the required arguments has been chosen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected_scalars.is_empty() && self.children.is_empty()
    }

    /// Position of the field child named `field_name`, ignoring fragments.
    #[must_use]
    pub fn field_child_index(&self, field_name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|child| !child.kind.is_inline_fragment() && child.field_name == field_name)
    }

    /// Position of the inline fragment on `type_name`.
    #[must_use]
    pub fn fragment_index(&self, type_name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|child| child.kind.is_inline_fragment() && child.field_name == type_name)
    }

    /// Follows a path of child indices.
    #[must_use]
    pub fn node_at(&self, path: &[usize]) -> Option<&Self> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get(index).map(|child| &child.node))
    }

    #[must_use]
    pub fn add_argument(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.selected_arguments.insert(name.to_string());
        next
    }

    /// Deselects an argument. Required arguments stay selected.
    #[must_use]
    pub fn remove_argument(&self, name: &str) -> Self {
        let mut next = self.clone();
        if !self.is_required_argument(name) {
            next.selected_arguments.shift_remove(name);
        }
        next
    }

    #[must_use]
    pub fn add_scalar(&self, field_name: &str) -> Self {
        let mut next = self.clone();
        next.selected_scalars.insert(field_name.to_string());
        next
    }

    #[must_use]
    pub fn remove_scalar(&self, field_name: &str) -> Self {
        let mut next = self.clone();
        next.selected_scalars.shift_remove(field_name);
        next
    }

    /// Appends a nested selection for `field_name`.
    ///
    /// `resolved` is this node's own type. Fails when the field does not
    /// exist there, is a scalar, or is already selected.
    pub fn add_child(&self, field_name: &str, resolved: &SimplifiedType) -> Result<Self> {
        let field = resolved
            .field(field_name)
            .ok_or_else(|| SelectionError::UnknownField {
                type_name: resolved.name.clone(),
                field: field_name.to_string(),
                suggestion: closest_field(field_name, resolved),
            })?;

        if field.kind.is_scalar() {
            return Err(SelectionError::ScalarField {
                field: field_name.to_string(),
            });
        }

        if self.field_child_index(field_name).is_some() {
            return Err(SelectionError::DuplicateChild {
                field: field_name.to_string(),
            });
        }

        let mut next = self.clone();
        next.children.push(Child {
            field_name: field_name.to_string(),
            kind: ChildKind::Field(field.kind),
            node: Self::for_field(field),
        });
        Ok(next)
    }

    /// Appends `... on <possible_type>`; at most one fragment per type.
    ///
    /// Only interface and union nodes take fragments.
    pub fn add_inline_fragment(&self, possible_type: &PossibleType) -> Result<Self> {
        if !self.type_kind.is_abstract() {
            return Err(SelectionError::NotAbstract {
                type_name: self.type_name.clone(),
                kind: self.type_kind,
            });
        }
        if self.fragment_index(&possible_type.name).is_some() {
            return Err(SelectionError::DuplicateFragment {
                type_name: possible_type.name.clone(),
            });
        }

        let mut next = self.clone();
        next.children.push(Child {
            field_name: possible_type.name.clone(),
            kind: ChildKind::InlineFragment,
            node: Self::for_fragment(possible_type),
        });
        Ok(next)
    }

    /// Replaces the node of the child at `index`.
    pub fn update_child_at(&self, index: usize, node: Self) -> Result<Self> {
        self.check_index(index)?;
        let mut next = self.clone();
        next.children[index].node = node;
        Ok(next)
    }

    /// Removes the child at `index`, keeping the order of the others.
    pub fn remove_child_at(&self, index: usize) -> Result<Self> {
        self.check_index(index)?;
        let mut next = self.clone();
        next.children.remove(index);
        Ok(next)
    }

    /// Applies `edit` to the node at `path` and rebuilds every ancestor.
    pub fn edit_at<F>(&self, path: &[usize], edit: F) -> Result<Self>
    where
        F: FnOnce(&Self) -> Result<Self>,
    {
        match path.split_first() {
            None => edit(self),
            Some((&index, rest)) => {
                self.check_index(index)?;
                let replacement = self.children[index].node.edit_at(rest, edit)?;
                self.update_child_at(index, replacement)
            }
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.children.len() {
            Ok(())
        } else {
            Err(SelectionError::ChildIndex {
                index,
                len: self.children.len(),
            })
        }
    }
}

fn closest_field(name: &str, resolved: &SimplifiedType) -> Option<String> {
    resolved
        .fields
        .keys()
        .map(|candidate| (candidate, strsim::jaro_winkler(name, candidate)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(candidate, _)| candidate.clone())
}
