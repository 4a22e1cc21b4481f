//! Wire and data contract shared by the chat session and its transports.
//!
//! This crate defines only the conversation data model, the `/chat` request and
//! response envelopes, and the three-way outcome of one request. It contains no
//! transport or scheduling logic.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier for one accepted submit and its transport call.
pub type RequestId = u64;

pub const DEFAULT_AGENT_NAME: &str = "Web Search Agent";
pub const DEFAULT_AGENT_SYSTEM_PROMPT: &str =
    "You are a helpful research assistant. When given information from a web search, summarize it for the user.";
pub const WEB_SEARCH_TOOL: &str = "web_search";

/// Author of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One transcript entry. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Agent definition sent with every request; fixed for a session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    pub system_prompt: String,
    #[serde(default)]
    pub tools: Vec<String>,
}

impl AgentConfig {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        system_prompt: impl Into<String>,
        tools: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
            tools: tools.into_iter().map(Into::into).collect(),
        }
    }

    /// The built-in research agent with web search enabled.
    #[must_use]
    pub fn web_search_agent() -> Self {
        Self::new(
            DEFAULT_AGENT_NAME,
            DEFAULT_AGENT_SYSTEM_PROMPT,
            [WEB_SEARCH_TOOL],
        )
    }

    #[must_use]
    pub fn has_tool(&self, tool: &str) -> bool {
        self.tools.iter().any(|candidate| candidate == tool)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::web_search_agent()
    }
}

/// Body of `POST /chat`.
///
/// `history` holds only the messages that preceded `message`; the new user
/// utterance is never duplicated inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub agent_config: AgentConfig,
    pub history: Vec<Message>,
}

/// Body returned by `POST /chat`.
///
/// Both fields are kept as raw JSON so that a present-but-unusable `response`
/// (null, number, empty string) can be told apart from a usable one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl ChatResponse {
    #[must_use]
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            response: Some(Value::String(text.into())),
            error: None,
        }
    }

    /// Returns the reply text when `response` is a non-empty string. Other
    /// values, truthy or not, are never shown as a reply.
    #[must_use]
    pub fn reply_text(&self) -> Option<&str> {
        match self.response.as_ref()? {
            Value::String(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    /// Returns the backend-reported error, if any, rendered as text.
    #[must_use]
    pub fn backend_error(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Body returned by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Resolution of one transport call, as seen by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// The backend answered with usable reply text.
    Reply(String),
    /// The backend answered but the payload lacked a usable `response`.
    MissingResponse { backend_error: Option<String> },
    /// The exchange itself could not complete.
    TransportFailed { error: String },
}

impl ChatOutcome {
    /// Classifies a decoded backend response.
    #[must_use]
    pub fn from_response(response: &ChatResponse) -> Self {
        match response.reply_text() {
            Some(text) => Self::Reply(text.to_string()),
            None => Self::MissingResponse {
                backend_error: response.backend_error(),
            },
        }
    }

    #[must_use]
    pub fn is_reply(&self) -> bool {
        matches!(self, Self::Reply(_))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_serializes_to_backend_schema() {
        let request = ChatRequest {
            message: "hello".to_string(),
            agent_config: AgentConfig::web_search_agent(),
            history: vec![Message::user("earlier"), Message::assistant("reply")],
        };

        let value = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(
            value,
            json!({
                "message": "hello",
                "agent_config": {
                    "name": "Web Search Agent",
                    "system_prompt": DEFAULT_AGENT_SYSTEM_PROMPT,
                    "tools": ["web_search"],
                },
                "history": [
                    {"role": "user", "content": "earlier"},
                    {"role": "assistant", "content": "reply"},
                ],
            })
        );
    }

    #[test]
    fn agent_config_tools_default_to_empty() {
        let config: AgentConfig =
            serde_json::from_value(json!({"name": "bare", "system_prompt": "be brief"}))
                .expect("config without tools should decode");
        assert!(config.tools.is_empty());
        assert!(!config.has_tool(WEB_SEARCH_TOOL));
    }

    #[test]
    fn response_with_text_classifies_as_reply() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"response":"hi there"}"#).expect("decode");
        assert_eq!(
            ChatOutcome::from_response(&response),
            ChatOutcome::Reply("hi there".to_string())
        );
    }

    #[test]
    fn unusable_response_values_classify_as_missing() {
        for body in [
            r#"{}"#,
            r#"{"response":null}"#,
            r#"{"response":""}"#,
            r#"{"response":42}"#,
            r#"{"response":true}"#,
            r#"{"response":{"text":"nested"}}"#,
            r#"{"detail":[{"msg":"field required"}]}"#,
        ] {
            let response: ChatResponse = serde_json::from_str(body).expect("decode");
            assert_eq!(
                ChatOutcome::from_response(&response),
                ChatOutcome::MissingResponse {
                    backend_error: None
                },
                "body {body} should be a validity failure"
            );
        }
    }

    #[test]
    fn backend_error_field_is_carried_into_missing_outcome() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"error":"An error occurred with the model"}"#)
                .expect("decode");
        assert_eq!(
            ChatOutcome::from_response(&response),
            ChatOutcome::MissingResponse {
                backend_error: Some("An error occurred with the model".to_string()),
            }
        );
    }

    #[test]
    fn role_names_match_wire_strings() {
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");
        assert_eq!(
            serde_json::to_value(Role::Assistant).expect("serialize role"),
            json!("assistant")
        );
    }
}
