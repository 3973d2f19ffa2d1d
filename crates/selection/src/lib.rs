//! Immutable selection tree for building GraphQL queries interactively.
//!
//! A [`SelectionNode`] records which arguments, scalar fields, nested fields
//! and inline fragments are chosen for one value. Every operation returns a
//! new tree; the one it was called on stays as it was.
//!
//! ```
//! use gqlvis_introspect::TypeKind;
//! use gqlvis_schema::{ArgDef, ArgDefs};
//! use gqlvis_selection::SelectionNode;
//!
//! let mut args = ArgDefs::new();
//! args.insert("code".to_string(), ArgDef::new("ID!"));
//!
//! let root = SelectionNode::new("Country", TypeKind::Object, args);
//! let next = root.add_scalar("name");
//!
//! assert!(root.selected_scalars().is_empty());
//! assert!(next.selected_scalars().contains("name"));
//! assert!(next.selected_arguments().contains("code"));
//! ```

mod error;
mod node;
pub mod suggest;

pub use error::{Result, SelectionError};
pub use node::{Child, ChildKind, SelectionNode};
