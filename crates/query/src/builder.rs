use crate::{format_document, QueryError, Result};
use gqlvis_schema::SimplifiedType;
use gqlvis_selection::{ChildKind, SelectionNode};
use serde::Serialize;
use std::collections::HashMap;

/// Type used for a variable whose argument has no known definition.
pub const DEFAULT_VARIABLE_TYPE: &str = "String";

/// Emitted for a node that selects nothing, so the document stays valid.
const TYPENAME: &str = "__typename";

/// Looks up the simplified form of a type by name.
///
/// Supplying a resolver lets the builder drop children whose field no
/// longer exists on their parent's type.
pub trait TypeResolver {
    fn resolve(&self, type_name: &str) -> Option<SimplifiedType>;
}

impl<F> TypeResolver for F
where
    F: Fn(&str) -> Option<SimplifiedType>,
{
    fn resolve(&self, type_name: &str) -> Option<SimplifiedType> {
        self(type_name)
    }
}

impl<S: std::hash::BuildHasher> TypeResolver for HashMap<String, SimplifiedType, S> {
    fn resolve(&self, type_name: &str) -> Option<SimplifiedType> {
        self.get(type_name).cloned()
    }
}

/// One `$name: Type` entry of the operation's variable list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDecl {
    pub name: String,
    pub type_signature: String,
}

impl std::fmt::Display for VariableDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}: {}", self.name, self.type_signature)
    }
}

/// Variable name for `arg` on the node reached through `path`.
///
/// `path` holds the child field names below the root field, so arguments
/// of the root field itself are not prefixed. Inline fragments contribute
/// their type condition (`pets_Dog_friends_first`).
///
/// Names are not unique across the tree: a root argument literally named
/// `posts_limit` and `posts(limit:)` share `$posts_limit`. When their types
/// also differ the document declares the variable twice and the server will
/// reject it; the builder logs a warning for that case.
#[must_use]
pub fn variable_name(path: &[String], arg: &str) -> String {
    path.iter()
        .map(String::as_str)
        .chain(std::iter::once(arg))
        .collect::<Vec<_>>()
        .join("_")
}

/// The output of a build: the single-line document and its variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltQuery {
    /// Document with no line breaks; sibling selections separated by `,`.
    pub compact: String,
    /// Declarations in first-encounter order, without duplicates.
    pub variables: Vec<VariableDecl>,
}

impl BuiltQuery {
    /// The document pretty-printed with two-space indentation.
    #[must_use]
    pub fn text(&self) -> String {
        format_document(&self.compact)
    }
}

/// Renders selection trees as GraphQL query documents.
#[derive(Default, Clone, Copy)]
pub struct QueryBuilder<'r> {
    resolver: Option<&'r dyn TypeResolver>,
}

impl<'r> QueryBuilder<'r> {
    #[must_use]
    pub fn new() -> Self {
        Self { resolver: None }
    }

    /// Skips children whose field is missing from their parent's resolved type.
    #[must_use]
    pub fn with_resolver(mut self, resolver: &'r dyn TypeResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Builds the operation `query { <root_field> { ... } }` for `root`.
    ///
    /// Never fails because of missing type information; the only error is
    /// an empty root field name.
    pub fn build(&self, root_field: &str, root: &SelectionNode) -> Result<BuiltQuery> {
        let root_field = root_field.trim();
        if root_field.is_empty() {
            return Err(QueryError::InvalidInput(
                "root field name must not be empty".to_string(),
            ));
        }

        let mut render = Render {
            resolver: self.resolver,
            variables: Vec::new(),
        };
        let mut path = Vec::new();
        let root_args = render.arguments(root, &path);
        let body = render.selection(root, &mut path);

        let declarations = if render.variables.is_empty() {
            String::new()
        } else {
            let list: Vec<String> = render.variables.iter().map(ToString::to_string).collect();
            format!("({})", list.join(", "))
        };

        let compact = format!("query{declarations}{{{root_field}{root_args}{{{body}}}}}");
        tracing::debug!(
            root_field,
            variables = render.variables.len(),
            "Built query document"
        );

        Ok(BuiltQuery {
            compact,
            variables: render.variables,
        })
    }
}

/// Builds and pretty-prints a query without a type resolver.
pub fn build_query(root_field: &str, root: &SelectionNode) -> Result<String> {
    QueryBuilder::new()
        .build(root_field, root)
        .map(|built| built.text())
}

struct Render<'r> {
    resolver: Option<&'r dyn TypeResolver>,
    variables: Vec<VariableDecl>,
}

impl Render<'_> {
    /// Renders `(arg: $var, ...)` and declares each variable.
    fn arguments(&mut self, node: &SelectionNode, path: &[String]) -> String {
        let mut uses = Vec::with_capacity(node.selected_arguments().len());

        for arg in node.selected_arguments() {
            let name = variable_name(path, arg);
            let type_signature = node
                .args_def()
                .get(arg)
                .map_or(DEFAULT_VARIABLE_TYPE, |def| def.type_signature.as_str())
                .to_string();

            uses.push(format!("{arg}: ${name}"));
            self.declare(VariableDecl {
                name,
                type_signature,
            });
        }

        if uses.is_empty() {
            String::new()
        } else {
            format!("({})", uses.join(", "))
        }
    }

    fn declare(&mut self, decl: VariableDecl) {
        if self.variables.contains(&decl) {
            return;
        }
        if let Some(existing) = self.variables.iter().find(|v| v.name == decl.name) {
            tracing::warn!(
                variable = %decl.name,
                first = %existing.type_signature,
                second = %decl.type_signature,
                "Variable declared with conflicting types"
            );
        }
        self.variables.push(decl);
    }

    /// Renders the body between a node's braces.
    fn selection(&mut self, node: &SelectionNode, path: &mut Vec<String>) -> String {
        let resolved = self
            .resolver
            .and_then(|resolver| resolver.resolve(node.type_name()));

        let mut parts: Vec<String> = node.selected_scalars().iter().cloned().collect();

        for child in node.children() {
            if let (ChildKind::Field(_), Some(resolved)) = (child.kind, resolved.as_ref()) {
                if resolved.field(&child.field_name).is_none() {
                    tracing::debug!(
                        type_name = %resolved.name,
                        field = %child.field_name,
                        "Skipping field missing from resolved type"
                    );
                    continue;
                }
            }

            path.push(child.field_name.clone());
            let rendered = match child.kind {
                ChildKind::InlineFragment => {
                    let inner = self.selection(&child.node, path);
                    format!("... on {}{{{inner}}}", child.field_name)
                }
                ChildKind::Field(_) => {
                    let args = self.arguments(&child.node, path);
                    let inner = self.selection(&child.node, path);
                    format!("{}{args}{{{inner}}}", child.field_name)
                }
            };
            path.pop();

            parts.push(rendered);
        }

        if parts.is_empty() {
            TYPENAME.to_string()
        } else {
            parts.join(",")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlvis_introspect::{PossibleType, TypeKind};
    use gqlvis_schema::{ArgDef, ArgDefs, FieldKind, SimplifiedField};
    use indexmap::IndexMap;

    fn args(pairs: &[(&str, &str)]) -> ArgDefs {
        pairs
            .iter()
            .map(|(name, signature)| ((*name).to_string(), ArgDef::new(*signature)))
            .collect()
    }

    fn object_field(leaf: &str, kind: FieldKind, field_args: ArgDefs) -> SimplifiedField {
        SimplifiedField {
            kind,
            leaf_type_name: leaf.to_string(),
            description: None,
            args: field_args,
        }
    }

    fn user_type() -> SimplifiedType {
        let mut fields = IndexMap::new();
        fields.insert(
            "posts".to_string(),
            object_field("Post", FieldKind::ListObject, args(&[("limit", "Int")])),
        );
        fields.insert(
            "pet".to_string(),
            object_field("Pet", FieldKind::Interface, ArgDefs::new()),
        );
        SimplifiedType {
            name: "User".to_string(),
            kind: TypeKind::Object,
            fields,
            possible_types: vec![],
        }
    }

    #[test]
    fn test_country_by_code() {
        let root = SelectionNode::new("Country", TypeKind::Object, args(&[("code", "String!")]))
            .add_scalar("name")
            .add_scalar("capital");

        let built = QueryBuilder::new().build("country", &root).unwrap();
        assert_eq!(
            built.compact,
            "query($code: String!){country(code: $code){name,capital}}"
        );
        insta::assert_snapshot!(built.text(), @r"
        query($code: String!) {
          country(code: $code) {
            name
            capital
          }
        }
        ");
    }

    #[test]
    fn test_root_and_child_variables_are_path_qualified() {
        let root = SelectionNode::new("User", TypeKind::Object, args(&[("limit", "Int")]))
            .add_argument("limit")
            .add_child("posts", &user_type())
            .unwrap();
        let root = root
            .edit_at(&[0], |posts| Ok(posts.add_argument("limit").add_scalar("title")))
            .unwrap();

        let built = QueryBuilder::new().build("users", &root).unwrap();
        let names: Vec<&str> = built.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["limit", "posts_limit"]);

        insta::assert_snapshot!(built.text(), @r"
        query($limit: Int, $posts_limit: Int) {
          users(limit: $limit) {
            posts(limit: $posts_limit) {
              title
            }
          }
        }
        ");

        let again = QueryBuilder::new().build("users", &root).unwrap();
        assert_eq!(again.text(), built.text());
    }

    #[test]
    fn test_empty_node_selects_typename() {
        let root = SelectionNode::new("Query", TypeKind::Object, ArgDefs::new());
        let built = QueryBuilder::new().build("viewer", &root).unwrap();
        assert_eq!(built.compact, "query{viewer{__typename}}");
        assert!(built.variables.is_empty());
    }

    #[test]
    fn test_children_only_node_has_no_typename() {
        let root = SelectionNode::new("User", TypeKind::Object, ArgDefs::new())
            .add_child("posts", &user_type())
            .unwrap();
        let built = QueryBuilder::new().build("me", &root).unwrap();
        assert_eq!(built.compact, "query{me{posts{__typename}}}");
    }

    #[test]
    fn test_inline_fragment_nested_under_parent_field() {
        let cat = PossibleType {
            name: "Cat".to_string(),
            kind: TypeKind::Object,
        };
        let root = SelectionNode::new("User", TypeKind::Object, ArgDefs::new())
            .add_child("pet", &user_type())
            .unwrap();
        let root = root
            .edit_at(&[0], |pet| {
                pet.add_scalar("name")
                    .add_inline_fragment(&cat)
                    .and_then(|pet| pet.edit_at(&[0], |fragment| Ok(fragment.add_scalar("meow"))))
            })
            .unwrap();

        let text = build_query("me", &root).unwrap();
        insta::assert_snapshot!(text, @r"
        query {
          me {
            pet {
              name
              ... on Cat {
                meow
              }
            }
          }
        }
        ");
    }

    #[test]
    fn test_unknown_argument_defaults_to_string() {
        let root = SelectionNode::new("Query", TypeKind::Object, ArgDefs::new())
            .add_argument("locale")
            .add_scalar("id");
        let built = QueryBuilder::new().build("me", &root).unwrap();
        assert_eq!(
            built.variables,
            vec![VariableDecl {
                name: "locale".to_string(),
                type_signature: DEFAULT_VARIABLE_TYPE.to_string(),
            }]
        );
    }

    #[test]
    fn test_duplicate_declarations_collapse() {
        // a root argument literally named `posts_limit` collides with the child's variable
        let root = SelectionNode::new("User", TypeKind::Object, args(&[("posts_limit", "Int")]))
            .add_argument("posts_limit")
            .add_child("posts", &user_type())
            .unwrap();
        let root = root
            .edit_at(&[0], |posts| Ok(posts.add_argument("limit")))
            .unwrap();

        let built = QueryBuilder::new().build("users", &root).unwrap();
        assert_eq!(built.variables.len(), 1);
        assert_eq!(
            built.compact,
            "query($posts_limit: Int){users(posts_limit: $posts_limit){posts(limit: $posts_limit){__typename}}}"
        );
    }

    #[test]
    fn test_same_name_with_different_types_is_declared_twice() {
        let mut user = user_type();
        user.fields.insert(
            "posts".to_string(),
            object_field("Post", FieldKind::ListObject, args(&[("limit", "String")])),
        );
        let root = SelectionNode::new("User", TypeKind::Object, args(&[("posts_limit", "Int")]))
            .add_argument("posts_limit")
            .add_child("posts", &user)
            .unwrap();
        let root = root
            .edit_at(&[0], |posts| Ok(posts.add_argument("limit")))
            .unwrap();

        let built = QueryBuilder::new().build("users", &root).unwrap();
        let declared: Vec<String> = built.variables.iter().map(ToString::to_string).collect();
        assert_eq!(declared, vec!["$posts_limit: Int", "$posts_limit: String"]);
    }

    #[test]
    fn test_arguments_below_fragments_include_the_type_condition() {
        let dog = PossibleType {
            name: "Dog".to_string(),
            kind: TypeKind::Object,
        };
        let mut dog_fields = IndexMap::new();
        dog_fields.insert(
            "friends".to_string(),
            object_field("Pet", FieldKind::ListInterface, args(&[("first", "Int")])),
        );
        let dog_type = SimplifiedType {
            name: "Dog".to_string(),
            kind: TypeKind::Object,
            fields: dog_fields,
            possible_types: vec![],
        };
        let mut owner = user_type();
        owner.fields.insert(
            "pets".to_string(),
            object_field("Pet", FieldKind::ListInterface, ArgDefs::new()),
        );

        let root = SelectionNode::new("User", TypeKind::Object, ArgDefs::new())
            .add_child("pets", &owner)
            .unwrap();
        let root = root
            .edit_at(&[0], |pets| pets.add_inline_fragment(&dog))
            .and_then(|root| {
                root.edit_at(&[0, 0], |fragment| fragment.add_child("friends", &dog_type))
            })
            .and_then(|root| {
                root.edit_at(&[0, 0, 0], |friends| {
                    Ok(friends.add_argument("first").add_scalar("name"))
                })
            })
            .unwrap();

        let built = QueryBuilder::new().build("me", &root).unwrap();
        insta::assert_snapshot!(built.text(), @r"
        query($pets_Dog_friends_first: Int) {
          me {
            pets {
              ... on Dog {
                friends(first: $pets_Dog_friends_first) {
                  name
                }
              }
            }
          }
        }
        ");
    }

    #[test]
    fn test_resolver_skips_missing_fields_and_their_variables() {
        let root = SelectionNode::new("User", TypeKind::Object, ArgDefs::new())
            .add_scalar("id")
            .add_child("posts", &user_type())
            .unwrap();
        let root = root
            .edit_at(&[0], |posts| Ok(posts.add_argument("limit")))
            .unwrap();

        // the server dropped `posts` from User since the tree was built
        let mut current = user_type();
        current.fields.shift_remove("posts");
        let mut types = HashMap::new();
        types.insert("User".to_string(), current);

        let built = QueryBuilder::new()
            .with_resolver(&types)
            .build("me", &root)
            .unwrap();
        assert_eq!(built.compact, "query{me{id}}");
        assert!(built.variables.is_empty());

        // unresolvable types render as recorded
        let nothing = |_: &str| -> Option<SimplifiedType> { None };
        let built = QueryBuilder::new()
            .with_resolver(&nothing)
            .build("me", &root)
            .unwrap();
        assert_eq!(
            built.compact,
            "query($posts_limit: Int){me{id,posts(limit: $posts_limit){__typename}}}"
        );
    }

    #[test]
    fn test_empty_root_field_is_invalid() {
        let root = SelectionNode::new("Query", TypeKind::Object, ArgDefs::new());
        assert!(matches!(
            QueryBuilder::new().build("  ", &root),
            Err(QueryError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_variables_serialize_camel_case() {
        let decl = VariableDecl {
            name: "code".to_string(),
            type_signature: "ID!".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&decl).unwrap(),
            serde_json::json!({ "name": "code", "typeSignature": "ID!" })
        );
        assert_eq!(decl.to_string(), "$code: ID!");
    }
}
