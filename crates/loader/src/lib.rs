//! Schema loading and editor state.
//!
//! [`TypeLoader`] introspects an endpoint one type at a time and keeps what
//! it learns in a [`gqlvis_cache::Cache`]. [`Workspace`] owns the query
//! being edited, and [`Session`] ties the two together, loading types on
//! demand as the selection grows.

mod error;
mod loader;
mod session;
mod workspace;

pub use error::{LoaderError, Result};
pub use loader::{RootType, TypeLoader, DEFAULT_TTL};
pub use session::Session;
pub use workspace::{LoadTicket, Segment, Workspace};
