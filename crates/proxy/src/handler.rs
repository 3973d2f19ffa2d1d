use crate::upstream::{Upstream, UpstreamResponse};
use axum::body::Body;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Router;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use gqlvis_cache::MemoryCache;
use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use http::{HeaderValue, Method, StatusCode, Uri};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const GRAPHQL_PATH: &str = "/graphql";

const X_CACHE: &str = "x-cache";
const CACHED_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Store of complete upstream response bodies, keyed by [`cache_key`].
pub type ResponseStore = MemoryCache<Bytes>;

/// Settings for [`router`].
#[derive(Debug, Clone)]
pub struct ProxyOptions {
    /// Prefix of every cache key. Changing it orphans all stored responses.
    pub namespace: String,
    pub ttl: Duration,
}

#[derive(Clone)]
struct ProxyState {
    upstream: Arc<dyn Upstream>,
    store: Arc<ResponseStore>,
    options: Arc<ProxyOptions>,
}

#[derive(Serialize)]
struct ForwardBody<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<&'a serde_json::Value>,
}

/// Builds the proxy app. Every method and path reaches the same handler,
/// which answers `POST /graphql` and rejects the rest.
#[must_use]
pub fn router(
    upstream: Arc<dyn Upstream>,
    store: Arc<ResponseStore>,
    options: ProxyOptions,
) -> Router {
    let state = ProxyState {
        upstream,
        store,
        options: Arc::new(options),
    };
    Router::new().fallback(handle).with_state(state)
}

/// `{namespace}:{sha256 of query, newline, variables JSON}`. Absent or
/// null variables hash as `{}`.
#[must_use]
pub fn cache_key(namespace: &str, query: &str, variables: Option<&serde_json::Value>) -> String {
    let variables = match variables {
        Some(value) if !value.is_null() => value.to_string(),
        _ => "{}".to_string(),
    };
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    hasher.update(b"\n");
    hasher.update(variables.as_bytes());
    format!("{namespace}:{}", hex::encode(hasher.finalize()))
}

async fn handle(
    State(state): State<ProxyState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return with_cors(StatusCode::OK.into_response());
    }
    if method != Method::POST {
        return text(StatusCode::METHOD_NOT_ALLOWED, "Use POST /graphql");
    }
    if uri.path() != GRAPHQL_PATH {
        return text(StatusCode::NOT_FOUND, "Not found");
    }

    let Ok(payload) = serde_json::from_slice::<serde_json::Value>(&body) else {
        return text(StatusCode::BAD_REQUEST, "Invalid JSON");
    };
    let Some(query) = payload.get("query").and_then(serde_json::Value::as_str) else {
        return text(StatusCode::BAD_REQUEST, "\"query\" must be a string");
    };
    let variables = payload.get("variables");

    let key = cache_key(&state.options.namespace, query, variables);
    if let Some(cached) = state.store.lookup(&key) {
        tracing::debug!(%key, size = cached.len(), "Cache hit");
        let mut response = (
            StatusCode::OK,
            [(CONTENT_TYPE, HeaderValue::from_static(CACHED_CONTENT_TYPE))],
            cached,
        )
            .into_response();
        response
            .headers_mut()
            .insert(X_CACHE, HeaderValue::from_static("hit"));
        return with_cors(response);
    }

    let forward = match serde_json::to_vec(&ForwardBody { query, variables }) {
        Ok(forward) => Bytes::from(forward),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode upstream request");
            return text(StatusCode::INTERNAL_SERVER_ERROR, "Internal error");
        }
    };

    match state.upstream.forward(forward).await {
        Ok(upstream) => {
            tracing::debug!(%key, status = %upstream.status, "Cache miss");
            with_cors(relay(upstream, key, state))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Upstream request failed");
            text(StatusCode::BAD_GATEWAY, "Upstream request failed")
        }
    }
}

/// Streams the upstream body to the client while collecting a copy. The copy
/// is stored once the stream ends cleanly with a 2xx status.
fn relay(upstream: UpstreamResponse, key: String, state: ProxyState) -> Response {
    let UpstreamResponse {
        status,
        content_type,
        mut body,
    } = upstream;
    let (tx, mut rx) = mpsc::channel::<Result<Bytes, std::io::Error>>(16);

    tokio::spawn(async move {
        let mut collected = BytesMut::new();
        let mut complete = true;
        let mut client_gone = false;

        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(chunk) => {
                    collected.extend_from_slice(&chunk);
                    if !client_gone && tx.send(Ok(chunk)).await.is_err() {
                        client_gone = true;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Upstream body failed");
                    complete = false;
                    let _ = tx.send(Err(std::io::Error::other(e.to_string()))).await;
                    break;
                }
            }
        }

        if complete && status.is_success() {
            match state
                .store
                .insert(&key, collected.freeze(), state.options.ttl)
            {
                Ok(()) => tracing::debug!(%key, "Stored response"),
                Err(e) => tracing::warn!(error = %e, "Failed to store response"),
            }
        }
        // the client sees the end of the body only after the store completes
        drop(tx);
    });

    let stream = futures::stream::poll_fn(move |cx| rx.poll_recv(cx));
    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = status;
    if let Some(content_type) = content_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    response
        .headers_mut()
        .insert(X_CACHE, HeaderValue::from_static("miss"));
    response
}

fn text(status: StatusCode, message: &'static str) -> Response {
    with_cors((status, message).into_response())
}

fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    response
}
