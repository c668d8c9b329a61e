//! HTTP transport trait and implementations.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// Single-file multipart form
    File {
        field: String,
        file_name: String,
        content_type: Option<String>,
        data: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path plus query string, e.g. `/api/recipes?limit=10`
    pub path: String,
    pub token: Option<String>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            token: None,
            body: RequestBody::Empty,
        }
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Path without the query string.
    pub fn route(&self) -> &str {
        self.path.split('?').next().unwrap_or(&self.path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for transports, enabling mockability in tests.
///
/// A transport only reports failures to get a response at all; HTTP error
/// statuses come back as ordinary [`ApiResponse`]s.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Production transport over a shared reqwest client.
pub struct ReqwestTransport {
    inner: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ladle-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            inner,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.inner.request(method, &url);
        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::File {
                field,
                file_name,
                content_type,
                data,
            } => {
                let mut part = reqwest::multipart::Part::bytes(data).file_name(file_name);
                if let Some(ct) = content_type {
                    part = part.mime_str(&ct)?;
                }
                builder.multipart(reqwest::multipart::Form::new().part(field, part))
            }
        };

        tracing::debug!(method = %request.method, url = %url, "sending request");
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(method = %request.method, url = %url, status, "response received");

        Ok(ApiResponse { status, body })
    }
}

/// Mock response for testing.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Status { status: u16, body: Vec<u8> },
    NetworkError(String),
}

/// Mock transport for testing: canned responses keyed by method and path
/// (query string ignored), with every request recorded.
///
/// Several responses registered for the same route are served in order; the
/// last one repeats.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<(Method, String), VecDeque<MockResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, method: Method, path: &str, response: MockResponse) -> Self {
        if let Ok(mut map) = self.responses.lock() {
            map.entry((method, path.to_string()))
                .or_default()
                .push_back(response);
        }
        self
    }

    pub fn with_json(self, method: Method, path: &str, status: u16, body: serde_json::Value) -> Self {
        let body = body.to_string().into_bytes();
        self.with_response(method, path, MockResponse::Status { status, body })
    }

    pub fn with_status(self, method: Method, path: &str, status: u16) -> Self {
        self.with_response(
            method,
            path,
            MockResponse::Status {
                status,
                body: Vec::new(),
            },
        )
    }

    pub fn with_network_error(self, method: Method, path: &str, error: &str) -> Self {
        self.with_response(method, path, MockResponse::NetworkError(error.to_string()))
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Requests sent to `path` with `method`.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.route() == path)
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let key = (request.method, request.route().to_string());
        if let Ok(mut log) = self.requests.lock() {
            log.push(request.clone());
        }

        let response = self.responses.lock().ok().and_then(|mut map| {
            let queue = map.get_mut(&key)?;
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        });

        match response {
            Some(MockResponse::Status { status, body }) => Ok(ApiResponse { status, body }),
            Some(MockResponse::NetworkError(e)) => Err(ApiError::Network(e)),
            None => Err(ApiError::Network(format!(
                "No mock response for {} {}",
                key.0, key.1
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_strips_query() {
        let req = ApiRequest::new(Method::Get, "/api/recipes?title=Soup&limit=5");
        assert_eq!(req.route(), "/api/recipes");
    }

    #[tokio::test]
    async fn test_mock_serves_in_order_then_repeats() {
        let mock = MockTransport::new()
            .with_status(Method::Get, "/api/ping", 500)
            .with_status(Method::Get, "/api/ping", 200);

        let first = mock.send(ApiRequest::new(Method::Get, "/api/ping")).await.unwrap();
        let second = mock.send(ApiRequest::new(Method::Get, "/api/ping")).await.unwrap();
        let third = mock.send(ApiRequest::new(Method::Get, "/api/ping")).await.unwrap();

        assert_eq!(first.status, 500);
        assert_eq!(second.status, 200);
        assert_eq!(third.status, 200);
        assert_eq!(mock.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_mock_unknown_route_is_network_error() {
        let mock = MockTransport::new();
        let err = mock
            .send(ApiRequest::new(Method::Delete, "/api/recipes/x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
