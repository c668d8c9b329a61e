use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::{FileTokenStore, Session};
use crate::transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, RequestBody, Transport};

/// Whether a call needs a signed-in session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    /// Send the token when there is one
    Optional,
    /// Fail with `NotLoggedIn` before sending when there is none
    Required,
}

/// Typed client for the Ladle API.
#[derive(Clone)]
pub struct LadleClient {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
    base_url: String,
}

impl LadleClient {
    /// Client over HTTP with the session persisted to the configured file.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&config.api_base_url, config.timeout)?;
        let session = Session::load(FileTokenStore::new(config.session_file.clone()));
        Ok(Self::with_transport(
            Arc::new(transport),
            Arc::new(session),
            &config.api_base_url,
        ))
    }

    pub fn with_transport(
        transport: Arc<dyn Transport>,
        session: Arc<Session>,
        base_url: &str,
    ) -> Self {
        Self {
            transport,
            session,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Displayable URL for a recipe or avatar image reference.
    pub fn image_url(&self, reference: Option<&str>) -> String {
        ladle_core::resolve_image_url(&self.base_url, reference)
    }

    /// Send a request and map non-success statuses to errors. A 401 from any
    /// endpoint signs the session out.
    pub(crate) async fn execute(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        auth: Auth,
    ) -> Result<ApiResponse, ApiError> {
        let token = self.session.token();
        if auth == Auth::Required && token.is_none() {
            return Err(ApiError::NotLoggedIn);
        }

        let request = ApiRequest::new(method, path).body(body).bearer(token);
        let response = self.transport.send(request).await?;

        if response.is_success() {
            return Ok(response);
        }

        let error = ApiError::from_status(response.status, &response.body);
        if matches!(error, ApiError::Unauthorized(_)) {
            tracing::info!(%method, path, "session rejected by server, signing out");
            self.session.clear();
        } else {
            tracing::debug!(%method, path, status = response.status, error = %error, "request failed");
        }
        Err(error)
    }

    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        auth: Auth,
    ) -> Result<T, ApiError> {
        let response = self.execute(method, path, body, auth).await?;
        serde_json::from_slice(&response.body).map_err(|e| {
            ApiError::Decode(format!("{} {}: {}", method, path, e))
        })
    }

    /// For endpoints answering 204 or a body the caller does not need.
    pub(crate) async fn call_empty(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        auth: Auth,
    ) -> Result<(), ApiError> {
        self.execute(method, path, body, auth).await.map(|_| ())
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> Result<T, ApiError> {
        self.call(Method::Get, path, RequestBody::Empty, auth).await
    }

    pub(crate) async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> Result<T, ApiError> {
        self.call(method, path, json_body(body)?, auth).await
    }

    /// `GET /api/ping`
    pub async fn ping(&self) -> Result<String, ApiError> {
        let response: ladle_core::MessageResponse = self.get("/api/ping", Auth::Optional).await?;
        Ok(response.message)
    }
}

pub(crate) fn json_body<B: Serialize>(body: &B) -> Result<RequestBody, ApiError> {
    serde_json::to_value(body)
        .map(RequestBody::Json)
        .map_err(|e| ApiError::Decode(format!("failed to encode request: {}", e)))
}
