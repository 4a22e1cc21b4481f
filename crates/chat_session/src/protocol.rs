//! Protocol re-exports used by `chat_session`.

pub use chat_protocol::{
    AgentConfig, ChatOutcome, ChatRequest, ChatResponse, HealthStatus, Message, RequestId, Role,
};
