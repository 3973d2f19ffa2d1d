//! Turns a selection tree into GraphQL query text.
//!
//! Building happens in two pure passes: [`QueryBuilder::build`] renders a
//! compact single-line document together with its variable declarations,
//! and [`format_document`] lays that document out with two-space
//! indentation.
//!
//! Variables are named after the path of child fields leading to the
//! argument, so `limit` on the root field and `limit` on its `posts` child
//! become `$limit` and `$posts_limit`.

mod builder;
mod error;
mod format;

pub use builder::{
    build_query, variable_name, BuiltQuery, QueryBuilder, TypeResolver, VariableDecl,
    DEFAULT_VARIABLE_TYPE,
};
pub use error::{QueryError, Result};
pub use format::format_document;
