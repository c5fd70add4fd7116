//! Client for the lost-and-found intake assistant: conversation vocabulary,
//! message model, chat service transport, and the controller that owns a
//! conversation.

pub mod config;
pub mod errors;
pub mod models;
pub mod service;
pub mod steps;
pub mod transport;
pub mod view;

pub use config::ClientConfig;
pub use errors::{AppError, TransportError};
pub use models::{ChatMessage, ChatQueryResult, MessageRole};
pub use service::{ChatController, ChatPhase, ChatState, ControllerConfig};
pub use steps::{ChatIntent, ConversationStep, PROGRESS_ORDER};
pub use transport::{AuthContext, ChatTransport, HttpTransport};
pub use view::{ChatView, NoopView};
