use crate::{ProxyError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use http::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::{HeaderValue, StatusCode};
use std::time::Duration;
use url::Url;

/// Sent with every upstream request. Some APIs reject requests without one.
pub const PROXY_USER_AGENT: &str = concat!(
    "gqlvis/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/mhadidg/gqlvis)"
);

/// Response head and streaming body received from the upstream API.
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: BoxStream<'static, Result<Bytes>>,
}

impl std::fmt::Debug for UpstreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamResponse")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// The single API every proxied request is forwarded to.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// POSTs a JSON `body` and returns the response without buffering it.
    async fn forward(&self, body: Bytes) -> Result<UpstreamResponse>;
}

/// Forwards over HTTP, authenticating with a bearer token.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
    url: Url,
    token: Option<String>,
}

impl HttpUpstream {
    pub fn new(url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| ProxyError::InvalidUpstream(format!("{url}: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProxyError::Upstream(e.to_string()))?;
        Ok(Self { client, url, token })
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn forward(&self, body: Bytes) -> Result<UpstreamResponse> {
        let mut request = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, PROXY_USER_AGENT)
            .body(body);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProxyError::Upstream(e.to_string()))?;

        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        tracing::debug!(%status, "Upstream responded");

        let body = response
            .bytes_stream()
            .map_err(|e| ProxyError::Upstream(e.to_string()))
            .boxed();

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
