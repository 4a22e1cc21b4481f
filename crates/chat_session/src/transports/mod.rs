use std::sync::Arc;

use chat_api::ChatApiConfig;

use crate::transport::{ChatTransport, TransportInitError};

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::{MockGate, MockReply, MockTransport};

pub const HTTP_TRANSPORT_ID: &str = "http";
pub const MOCK_TRANSPORT_ID: &str = "mock";
pub const DEFAULT_TRANSPORT_ID: &str = HTTP_TRANSPORT_ID;

pub fn transport_for_id(
    transport_id: &str,
    api_config: ChatApiConfig,
) -> Result<Arc<dyn ChatTransport>, TransportInitError> {
    match transport_id.trim() {
        HTTP_TRANSPORT_ID => Ok(Arc::new(HttpTransport::new(api_config)?)),
        MOCK_TRANSPORT_ID => Ok(Arc::new(MockTransport::default())),
        unknown => Err(TransportInitError::UnknownTransport {
            id: unknown.to_string(),
            available: format!("{HTTP_TRANSPORT_ID}, {MOCK_TRANSPORT_ID}"),
        }),
    }
}
