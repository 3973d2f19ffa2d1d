//! GraphQL introspection payloads and the request capability.
//!
//! This crate knows how to ask a GraphQL endpoint about its types one at a
//! time and how to read the answer. It does not interpret the types; that is
//! the simplifier's job in `gqlvis-schema`.
//!
//! # Examples
//!
//! ```no_run
//! use gqlvis_introspect::{
//!     type_query_variables, Endpoint, HttpTransport, Transport, TypeData, TYPE_QUERY,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let endpoint = Endpoint::parse("https://countries.trevorblades.com/")?;
//!     let data = HttpTransport::new()
//!         .request(&endpoint, TYPE_QUERY, Some(type_query_variables("Country")))
//!         .await?;
//!
//!     let payload: TypeData = serde_json::from_value(data)?;
//!     println!("{:?}", payload.type_);
//!     Ok(())
//! }
//! ```

mod endpoint;
mod error;
mod query;
mod transport;
mod types;

pub use endpoint::{Credentials, Endpoint};
pub use error::{Result, TransportError};
pub use query::{
    type_query_variables, NamedTypeRef, RootTypeData, SchemaRoots, TypeData, ROOT_TYPE_QUERY,
    TYPE_QUERY,
};
pub use transport::{extract_data, HttpTransport, Transport};
pub use types::*;
