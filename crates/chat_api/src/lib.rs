//! Transport-only client for the agent backend's HTTP endpoints.
//!
//! This crate owns request building, header assembly, and response decoding for
//! `POST /chat` and the `GET /` health probe. It has no knowledge of
//! conversation state and never retries.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod url;

pub use client::ChatApiClient;
pub use config::ChatApiConfig;
pub use error::ChatApiError;
pub use url::{health_url, normalize_chat_url, DEFAULT_BASE_URL};
