//! Caching proxy in front of one GraphQL API.
//!
//! Clients `POST /graphql` with `{ "query": ..., "variables": ... }`.
//! Successful upstream responses are kept in memory under a hash of the
//! query and variables, so repeated introspection from the browser does
//! not spend the upstream rate limit.
//!
//! ```no_run
//! use gqlvis_proxy::{router, serve, HttpUpstream, ProxyOptions, ResponseStore};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run() -> gqlvis_proxy::Result<()> {
//! let upstream = HttpUpstream::new(
//!     "https://api.github.com/graphql",
//!     std::env::var("GITHUB_TOKEN").ok(),
//!     Duration::from_secs(30),
//! )?;
//! let app = router(
//!     Arc::new(upstream),
//!     Arc::new(ResponseStore::new()),
//!     ProxyOptions { namespace: "v1".into(), ttl: Duration::from_secs(86_400) },
//! );
//! serve("127.0.0.1:8787".parse().unwrap(), app).await
//! # }
//! ```

mod error;
mod handler;
mod server;
mod upstream;

pub use error::{ProxyError, Result};
pub use handler::{cache_key, router, ProxyOptions, ResponseStore, GRAPHQL_PATH};
pub use server::serve;
pub use upstream::{HttpUpstream, Upstream, UpstreamResponse, PROXY_USER_AGENT};
