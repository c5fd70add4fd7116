use thiserror::Error;

/// Failure of a single call against the chat service.
///
/// Only the authorization case is discriminated by the controller; every
/// other variant collapses into generic retry messaging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Chat service rejected the request with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("{0}")]
    Network(String),

    #[error("Invalid response from chat service: {0}")]
    Decode(String),
}

impl TransportError {
    pub fn status(status: u16, message: Option<String>) -> Self {
        TransportError::Status { status, message }
    }

    /// 401 and 403 both mean the account may not use the assistant yet
    /// (email not verified).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TransportError::Status { status: 401 | 403, .. })
    }

    /// Human-readable text carried by the failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        let message = match self {
            TransportError::Status { message, .. } => message.as_deref(),
            TransportError::Network(message) => Some(message.as_str()),
            TransportError::Decode(_) => None,
        };
        message.filter(|m| !m.trim().is_empty())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        // Statuses are read from the response itself, so a reqwest error
        // here is either a bad body or a failed exchange.
        if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// Startup and configuration failures of the client application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid value for {variable}: {reason}")]
    InvalidConfig { variable: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl AppError {
    pub fn invalid_config(variable: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::InvalidConfig { variable: variable.into(), reason: reason.into() }
    }
}
