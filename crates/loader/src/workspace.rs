use crate::{LoaderError, Result, RootType};
use gqlvis_query::{BuiltQuery, QueryBuilder, TypeResolver};
use gqlvis_schema::SimplifiedField;
use gqlvis_selection::SelectionNode;

/// One step of a dotted selection path such as `languages.@Cat.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A nested field, by name.
    Field(String),
    /// An inline fragment, written `@TypeName`.
    Fragment(String),
}

impl Segment {
    /// Splits a dotted path into segments. The empty path is the root.
    pub fn parse_path(path: &str) -> Result<Vec<Self>> {
        let path = path.trim();
        if path.is_empty() {
            return Ok(Vec::new());
        }

        path.split('.')
            .map(|raw| {
                let invalid = |reason: &str| LoaderError::InvalidPath {
                    path: path.to_string(),
                    reason: reason.to_string(),
                };
                match raw.strip_prefix('@') {
                    Some("") => Err(invalid("fragment segment needs a type name")),
                    Some(type_name) => Ok(Self::Fragment(type_name.to_string())),
                    None if raw.is_empty() => Err(invalid("empty segment")),
                    None => Ok(Self::Field(raw.to_string())),
                }
            })
            .collect()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Field(name) | Self::Fragment(name) => name,
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Fragment(name) => write!(f, "@{name}"),
        }
    }
}

/// Identifies a pending type load so its result can be checked for staleness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    path: Vec<usize>,
    type_name: String,
}

impl LoadTicket {
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn path(&self) -> &[usize] {
        &self.path
    }
}

/// The single owner of the in-progress query.
///
/// The tree only changes through the selection operations, applied in the
/// order they are issued. Each introspection starts a new generation; a
/// load begun in an older generation, or for a node whose type has since
/// changed, must be discarded by the caller.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    generation: u64,
    root: Option<RootType>,
    root_field: Option<String>,
    tree: Option<SelectionNode>,
}

impl Workspace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn root_type(&self) -> Option<&RootType> {
        self.root.as_ref()
    }

    #[must_use]
    pub fn root_field(&self) -> Option<&str> {
        self.root_field.as_deref()
    }

    #[must_use]
    pub const fn tree(&self) -> Option<&SelectionNode> {
        self.tree.as_ref()
    }

    /// Clears everything and starts a new generation, which is returned.
    pub fn reset(&mut self) -> u64 {
        self.generation += 1;
        self.root = None;
        self.root_field = None;
        self.tree = None;
        self.generation
    }

    /// Records the root type found by an introspection started in `generation`.
    ///
    /// Returns `false`, leaving the state untouched, when a newer
    /// introspection has started since.
    pub fn set_root(&mut self, generation: u64, root: RootType) -> bool {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "Discarding stale root type"
            );
            return false;
        }
        self.root = Some(root);
        true
    }

    /// Starts a fresh tree for the root field `name`.
    pub fn select_root_field(&mut self, name: &str, field: &SimplifiedField) {
        self.root_field = Some(name.to_string());
        self.tree = Some(SelectionNode::for_field(field));
    }

    /// The node at `path`, given as child indices from the root.
    pub fn node_at(&self, path: &[usize]) -> Result<&SelectionNode> {
        let tree = self.tree.as_ref().ok_or(LoaderError::NoRootField)?;
        tree.node_at(path).ok_or_else(|| LoaderError::InvalidPath {
            path: format!("{path:?}"),
            reason: "no such node".to_string(),
        })
    }

    /// Replaces the tree with the result of `edit` applied at `path`.
    pub fn edit<F>(&mut self, path: &[usize], edit: F) -> Result<()>
    where
        F: FnOnce(&SelectionNode) -> gqlvis_selection::Result<SelectionNode>,
    {
        let tree = self.tree.as_ref().ok_or(LoaderError::NoRootField)?;
        self.tree = Some(tree.edit_at(path, edit)?);
        Ok(())
    }

    /// Captures what a type load for the node at `path` depends on.
    pub fn ticket(&self, path: &[usize]) -> Result<LoadTicket> {
        let node = self.node_at(path)?;
        Ok(LoadTicket {
            generation: self.generation,
            path: path.to_vec(),
            type_name: node.type_name().to_string(),
        })
    }

    /// Whether a load started with `ticket` still applies to the current state.
    #[must_use]
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
            && self
                .node_at(&ticket.path)
                .is_ok_and(|node| node.type_name() == ticket.type_name)
    }

    /// Renders the current query.
    pub fn build(&self, resolver: Option<&dyn TypeResolver>) -> Result<BuiltQuery> {
        let root_field = self.root_field.as_deref().ok_or(LoaderError::NoRootField)?;
        let tree = self.tree.as_ref().ok_or(LoaderError::NoRootField)?;

        let mut builder = QueryBuilder::new();
        if let Some(resolver) = resolver {
            builder = builder.with_resolver(resolver);
        }
        Ok(builder.build(root_field, tree)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlvis_introspect::TypeKind;
    use gqlvis_schema::{ArgDef, ArgDefs, FieldKind, SimplifiedType};
    use indexmap::IndexMap;

    fn field(kind: FieldKind, leaf: &str) -> SimplifiedField {
        SimplifiedField {
            kind,
            leaf_type_name: leaf.to_string(),
            description: None,
            args: ArgDefs::new(),
        }
    }

    fn country_field() -> SimplifiedField {
        let mut args = ArgDefs::new();
        args.insert("code".to_string(), ArgDef::new("ID!"));
        SimplifiedField {
            args,
            ..field(FieldKind::Object, "Country")
        }
    }

    fn country_type() -> SimplifiedType {
        let mut fields = IndexMap::new();
        fields.insert("name".to_string(), field(FieldKind::Scalar, "String"));
        fields.insert("continent".to_string(), field(FieldKind::Object, "Continent"));
        SimplifiedType {
            name: "Country".to_string(),
            kind: TypeKind::Object,
            fields,
            possible_types: vec![],
        }
    }

    fn workspace() -> Workspace {
        let mut workspace = Workspace::new();
        let generation = workspace.reset();
        assert!(workspace.set_root(generation, RootType::new("Query")));
        workspace.select_root_field("country", &country_field());
        workspace
    }

    #[test]
    fn test_parse_path() {
        assert_eq!(Segment::parse_path("").unwrap(), vec![]);
        assert_eq!(
            Segment::parse_path("pets.@Cat.owner").unwrap(),
            vec![
                Segment::Field("pets".to_string()),
                Segment::Fragment("Cat".to_string()),
                Segment::Field("owner".to_string()),
            ]
        );
        assert!(matches!(
            Segment::parse_path("pets..name"),
            Err(LoaderError::InvalidPath { .. })
        ));
        assert!(Segment::parse_path("pets.@").is_err());
    }

    #[test]
    fn test_segment_display() {
        let rendered: Vec<String> = Segment::parse_path("a.@B")
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered.join("."), "a.@B");
    }

    #[test]
    fn test_edits_replace_the_tree() {
        let mut workspace = workspace();
        let before = workspace.tree().unwrap().clone();

        workspace.edit(&[], |node| Ok(node.add_scalar("name"))).unwrap();
        workspace
            .edit(&[], |node| node.add_child("continent", &country_type()))
            .unwrap();

        let after = workspace.tree().unwrap();
        assert!(before.selected_scalars().is_empty());
        assert!(after.selected_scalars().contains("name"));
        assert_eq!(after.children().len(), 1);
        assert!(after.selected_arguments().contains("code"));
    }

    #[test]
    fn test_edit_errors_leave_state_untouched() {
        let mut workspace = workspace();
        let result = workspace.edit(&[], |node| node.add_child("nope", &country_type()));
        assert!(matches!(result, Err(LoaderError::Selection(_))));
        assert!(workspace.tree().unwrap().children().is_empty());
    }

    #[test]
    fn test_ticket_goes_stale_when_node_type_changes() {
        let mut workspace = workspace();
        workspace
            .edit(&[], |node| node.add_child("continent", &country_type()))
            .unwrap();

        let ticket = workspace.ticket(&[0]).unwrap();
        assert_eq!(ticket.type_name(), "Continent");
        assert!(workspace.is_current(&ticket));

        // the child is removed while its type is loading
        workspace.edit(&[], |node| node.remove_child_at(0)).unwrap();
        assert!(!workspace.is_current(&ticket));
    }

    #[test]
    fn test_ticket_goes_stale_on_new_generation() {
        let mut workspace = workspace();
        let ticket = workspace.ticket(&[]).unwrap();
        let stale_generation = workspace.generation();

        let generation = workspace.reset();
        assert!(!workspace.is_current(&ticket));
        assert!(!workspace.set_root(stale_generation, RootType::new("Old")));
        assert!(workspace.root_type().is_none());
        assert!(workspace.set_root(generation, RootType::new("Query")));
    }

    #[test]
    fn test_build_requires_root_field() {
        assert_eq!(Workspace::new().build(None), Err(LoaderError::NoRootField));

        let mut workspace = workspace();
        workspace.edit(&[], |node| Ok(node.add_scalar("name"))).unwrap();
        let built = workspace.build(None).unwrap();
        assert_eq!(
            built.compact,
            "query($code: ID!){country(code: $code){name}}"
        );
    }
}
