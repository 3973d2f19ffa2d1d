//! A [`Transport`] that answers introspection queries from a fixture and
//! records every request it serves.
//!
//! ## Usage
//!
//! ```ignore
//! use gqlvis_test_utils::{fixtures, FakeTransport};
//!
//! let transport = Arc::new(FakeTransport::new(fixtures::countries()));
//! let loader = TypeLoader::new(endpoint, transport.clone(), cache);
//!
//! // Cold load - hits the transport
//! let checkpoint = transport.checkpoint();
//! loader.load_type("Country").await?;
//! assert_eq!(transport.count_since(&Request::Type("Country".into()), checkpoint), 1);
//!
//! // Warm load - served from cache
//! let checkpoint = transport.checkpoint();
//! loader.load_type("Country").await?;
//! assert!(transport.requests_since(checkpoint).is_empty());
//! ```

use crate::fixtures::Schema;
use gqlvis_introspect::{Endpoint, Transport, TransportError};
use parking_lot::Mutex;
use serde_json::{json, Value};

/// What a served request asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Root,
    Type(String),
    Other(String),
}

#[derive(Debug, Default)]
struct RequestLog {
    requests: Vec<Request>,
}

impl RequestLog {
    fn record(&mut self, request: Request) {
        self.requests.push(request);
    }

    fn checkpoint(&self) -> usize {
        self.requests.len()
    }

    fn since(&self, checkpoint: usize) -> Vec<Request> {
        self.requests[checkpoint.min(self.requests.len())..].to_vec()
    }
}

#[derive(Debug)]
pub struct FakeTransport {
    schema: Schema,
    failure: Option<TransportError>,
    log: Mutex<RequestLog>,
}

impl FakeTransport {
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            failure: None,
            log: Mutex::new(RequestLog::default()),
        }
    }

    /// Every request fails with `error` (after being recorded).
    #[must_use]
    pub fn failing(error: TransportError) -> Self {
        Self {
            schema: Schema::without_query_type(),
            failure: Some(error),
            log: Mutex::new(RequestLog::default()),
        }
    }

    /// Current log position, for use with [`Self::requests_since`].
    #[must_use]
    pub fn checkpoint(&self) -> usize {
        self.log.lock().checkpoint()
    }

    #[must_use]
    pub fn requests_since(&self, checkpoint: usize) -> Vec<Request> {
        self.log.lock().since(checkpoint)
    }

    #[must_use]
    pub fn count_since(&self, request: &Request, checkpoint: usize) -> usize {
        self.log
            .lock()
            .since(checkpoint)
            .iter()
            .filter(|served| *served == request)
            .count()
    }

    /// Total number of requests served.
    #[must_use]
    pub fn total(&self) -> usize {
        self.checkpoint()
    }

    fn classify(query: &str, variables: Option<&Value>) -> Request {
        if query.contains("__schema") {
            return Request::Root;
        }
        if query.contains("__type") {
            let name = variables
                .and_then(|vars| vars.get("name"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            return Request::Type(name.to_string());
        }
        Request::Other(query.to_string())
    }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn request(
        &self,
        _endpoint: &Endpoint,
        query: &str,
        variables: Option<Value>,
    ) -> gqlvis_introspect::Result<Value> {
        let request = Self::classify(query, variables.as_ref());
        self.log.lock().record(request.clone());

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        match request {
            Request::Root => Ok(json!({
                "__schema": { "queryType": self.schema.query_type.as_ref().map(|name| json!({ "name": name })) }
            })),
            Request::Type(name) => Ok(json!({
                "__type": self.schema.types.get(&name).cloned().unwrap_or(Value::Null)
            })),
            Request::Other(_) => Err(TransportError::GraphQL(
                "Unsupported query".to_string(),
            )),
        }
    }
}
