//! Single-conversation chat session and its request scheduling.
//!
//! ## Session contract
//!
//! [`ChatSession`] owns the transcript, the pending input, and the in-flight
//! flag. An accepted submit appends the user message immediately and issues one
//! transport call whose `history` holds only the earlier messages. When the
//! call resolves exactly one assistant message is appended:
//!
//! - the backend reply text, when `response` is a non-empty string;
//! - `"Sorry, something went wrong."` when the body lacks a usable `response`;
//! - `"Failed to connect to the backend."` when the exchange itself failed.
//!
//! Blank input and submits while a request is in flight are silent no-ops.
//! There are no retries and no cancellation.
//!
//! ## Scheduling
//!
//! [`ChatController`] runs the transport call on a worker thread and applies
//! the outcome back to the shared session. Presentation observes state through
//! [`ChatSession::subscribe`] snapshots.

pub mod controller;
pub mod protocol;
pub mod session;
pub mod transport;
pub mod transports;

pub use controller::ChatController;
pub use session::{
    ChatSession, HostOps, Mode, SessionListener, SessionSnapshot, SubscriptionId,
    TRANSPORT_FAILURE_TEXT, VALIDITY_FAILURE_TEXT,
};
pub use transport::{ChatTransport, TransportError, TransportInitError};
