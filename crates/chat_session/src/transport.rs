use chat_api::ChatApiError;
use thiserror::Error;

use crate::protocol::{ChatRequest, ChatResponse};

/// Failure to complete one request/response exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Api(#[from] ChatApiError),

    #[error("failed to initialize async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Error returned while selecting or constructing a transport.
#[derive(Debug, Error)]
pub enum TransportInitError {
    #[error("unsupported transport '{id}'. Available transports: {available}")]
    UnknownTransport { id: String, available: String },

    #[error("failed to build HTTP client: {0}")]
    Api(#[from] ChatApiError),
}

/// Network boundary executing one chat request.
///
/// `send` blocks until the exchange resolves. Callers run it off the thread
/// that owns the session.
pub trait ChatTransport: Send + Sync + 'static {
    /// Stable transport identifier.
    fn id(&self) -> &'static str;

    fn send(&self, request: ChatRequest) -> Result<ChatResponse, TransportError>;

    /// Checks that the backend is reachable, returning its status line.
    fn probe(&self) -> Result<Option<String>, TransportError> {
        Ok(None)
    }
}
