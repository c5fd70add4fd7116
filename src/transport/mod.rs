pub mod http;

use async_trait::async_trait;

use crate::errors::TransportError;
use crate::models::{SendMessageResponse, StartSessionResponse};

pub use http::{AuthContext, HttpTransport};

/// The two calls the assistant makes against the chat service.
///
/// Caller identity is a property of the implementation (see
/// [`AuthContext`]), not an argument.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn start_session(&self) -> Result<StartSessionResponse, TransportError>;

    async fn send_message(
        &self,
        session_id: &str,
        text: &str,
    ) -> Result<SendMessageResponse, TransportError>;
}
