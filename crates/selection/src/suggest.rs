//! Typeahead options for the next thing to add to a node.
//!
//! Options match when the query is a case-insensitive substring of the name
//! or the description. Names that are already selected are never offered.

use crate::SelectionNode;
use gqlvis_schema::SimplifiedType;

/// Options shown before anything has been typed.
pub const EMPTY_QUERY_LIMIT: usize = 5;

/// Options shown once the query is non-empty.
pub const QUERY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
}

/// Filters `candidates` against `query`, keeping their order.
#[must_use]
pub fn filter<'a, I>(
    candidates: I,
    query: &str,
    is_selected: impl Fn(&str) -> bool,
) -> Vec<Suggestion<'a>>
where
    I: IntoIterator<Item = Suggestion<'a>>,
{
    let needle = query.trim().to_lowercase();
    let limit = if needle.is_empty() {
        EMPTY_QUERY_LIMIT
    } else {
        QUERY_LIMIT
    };

    candidates
        .into_iter()
        .filter(|candidate| !is_selected(candidate.name))
        .filter(|candidate| matches(candidate, &needle))
        .take(limit)
        .collect()
}

/// Whether `candidate` matches `query`, ignoring case and surrounding whitespace.
#[must_use]
pub fn is_match(candidate: &Suggestion<'_>, query: &str) -> bool {
    matches(candidate, &query.trim().to_lowercase())
}

fn matches(candidate: &Suggestion<'_>, needle: &str) -> bool {
    needle.is_empty()
        || candidate.name.to_lowercase().contains(needle)
        || candidate
            .description
            .is_some_and(|description| description.to_lowercase().contains(needle))
}

/// Scalar fields of `resolved` that `node` does not select yet.
#[must_use]
pub fn scalars<'a>(
    node: &SelectionNode,
    resolved: &'a SimplifiedType,
    query: &str,
) -> Vec<Suggestion<'a>> {
    let candidates = resolved.scalar_fields().map(|(name, field)| Suggestion {
        name,
        description: field.description.as_deref(),
    });
    filter(candidates, query, |name| node.selected_scalars().contains(name))
}

/// Composite fields of `resolved` that are not children of `node` yet.
#[must_use]
pub fn children<'a>(
    node: &SelectionNode,
    resolved: &'a SimplifiedType,
    query: &str,
) -> Vec<Suggestion<'a>> {
    let candidates = resolved.composite_fields().map(|(name, field)| Suggestion {
        name,
        description: field.description.as_deref(),
    });
    filter(candidates, query, |name| node.field_child_index(name).is_some())
}

/// Arguments of the field behind `node` that are not selected yet.
#[must_use]
pub fn arguments<'a>(node: &'a SelectionNode, query: &str) -> Vec<Suggestion<'a>> {
    let candidates = node.args_def().iter().map(|(name, arg)| Suggestion {
        name,
        description: arg.description.as_deref(),
    });
    filter(candidates, query, |name| node.selected_arguments().contains(name))
}

/// Possible types of `resolved` without an inline fragment under `node`.
/// Nodes of object type get none.
#[must_use]
pub fn fragments<'a>(
    node: &SelectionNode,
    resolved: &'a SimplifiedType,
    query: &str,
) -> Vec<Suggestion<'a>> {
    if !node.type_kind().is_abstract() {
        return Vec::new();
    }
    let candidates = resolved.possible_types.iter().map(|possible| Suggestion {
        name: possible.name.as_str(),
        description: None,
    });
    filter(candidates, query, |name| node.fragment_index(name).is_some())
}
