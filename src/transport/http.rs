use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::errors::{AppError, TransportError};
use crate::models::{ErrorBody, SendMessageRequest, SendMessageResponse, StartSessionResponse};
use crate::transport::ChatTransport;

/// Identity of the caller, passed in explicitly rather than read from
/// ambient storage.
#[derive(Clone, Default)]
pub struct AuthContext {
    bearer_token: Option<String>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self { bearer_token: Some(token.into()) }
    }

    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// [`ChatTransport`] over the chat service's JSON API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    auth: AuthContext,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig, auth: AuthContext) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(AppError::HttpClient)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/chat/{path}", self.base_url)
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, TransportError> {
        let status = resp.status();
        if !status.is_success() {
            // Body is optional; an unreadable one still yields the status.
            let message = resp
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message);
            warn!("Chat service returned {status}");
            return Err(TransportError::status(status.as_u16(), message));
        }

        resp.json::<T>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn start_session(&self) -> Result<StartSessionResponse, TransportError> {
        let request = self
            .client
            .post(self.endpoint("session"))
            .json(&serde_json::json!({}));
        let resp = self.auth.apply(request).send().await?;
        Self::decode(resp).await
    }

    async fn send_message(
        &self,
        session_id: &str,
        text: &str,
    ) -> Result<SendMessageResponse, TransportError> {
        debug!(session_id, "Sending chat message ({} chars)", text.chars().count());
        let request = self
            .client
            .post(self.endpoint("message"))
            .json(&SendMessageRequest { session_id, message: text });
        let resp = self.auth.apply(request).send().await?;
        Self::decode(resp).await
    }
}
