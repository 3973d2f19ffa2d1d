//! `gqlvis proxy`

use crate::context;
use anyhow::{Context, Result};
use gqlvis_proxy::{router, serve, HttpUpstream, ProxyOptions, ResponseStore};
use std::net::SocketAddr;
use std::sync::Arc;

pub async fn run(
    globals: &context::GlobalArgs,
    listen: Option<&str>,
    upstream: Option<&str>,
) -> Result<()> {
    let config = context::load(globals)?;
    let proxy = &config.proxy;

    let listen = listen.unwrap_or_else(|| proxy.listen());
    let addr: SocketAddr = listen
        .parse()
        .with_context(|| format!("Invalid listen address '{listen}'"))?;
    let upstream_url = upstream.unwrap_or_else(|| proxy.upstream());

    let token = std::env::var(proxy.token_env()).ok().filter(|token| !token.is_empty());
    if token.is_none() {
        tracing::warn!(
            env = proxy.token_env(),
            "No upstream token set, forwarding requests without credentials"
        );
    }

    let upstream = HttpUpstream::new(upstream_url, token, config.request.timeout())
        .context("Failed to create upstream client")?;
    tracing::info!(upstream = %upstream.url(), namespace = proxy.namespace(), "Starting proxy");

    let app = router(
        Arc::new(upstream),
        Arc::new(ResponseStore::new()),
        ProxyOptions {
            namespace: proxy.namespace().to_string(),
            ttl: proxy.ttl(),
        },
    );
    serve(addr, app).await?;
    Ok(())
}
