use chat_api::{ChatApiClient, ChatApiConfig, ChatApiError};

use crate::protocol::{ChatRequest, ChatResponse};
use crate::transport::{ChatTransport, TransportError};
use crate::transports::HTTP_TRANSPORT_ID;

/// `ChatTransport` backed by the `chat_api` HTTP client.
///
/// Each call drives the async client to completion on a fresh current-thread
/// runtime, so `send` can be called from any plain worker thread.
#[derive(Debug)]
pub struct HttpTransport {
    client: ChatApiClient,
}

impl HttpTransport {
    pub fn new(config: ChatApiConfig) -> Result<Self, ChatApiError> {
        Ok(Self {
            client: ChatApiClient::new(config)?,
        })
    }

    fn runtime() -> Result<tokio::runtime::Runtime, TransportError> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(TransportError::Runtime)
    }
}

impl ChatTransport for HttpTransport {
    fn id(&self) -> &'static str {
        HTTP_TRANSPORT_ID
    }

    fn send(&self, request: ChatRequest) -> Result<ChatResponse, TransportError> {
        let runtime = Self::runtime()?;
        Ok(runtime.block_on(self.client.send(&request))?)
    }

    fn probe(&self) -> Result<Option<String>, TransportError> {
        let runtime = Self::runtime()?;
        let health = runtime.block_on(self.client.health())?;
        Ok(Some(health.status))
    }
}
