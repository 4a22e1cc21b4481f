//! Terminal front end for a single-conversation agent chat.
//!
//! The conversation state machine lives in `chat_session`; this crate wires it
//! to the environment, a tracing subscriber, and a readline loop that renders
//! session snapshots as scrollback.

pub mod config;
pub mod logging;
pub mod repl;
pub mod view;

pub use config::{ConfigError, EnvConfig};
pub use repl::{Frontend, LineAction, Repl, ReplError};
pub use view::{TranscriptView, ViewOptions, ViewUpdate};
