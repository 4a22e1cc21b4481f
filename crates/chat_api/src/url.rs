/// Default backend address used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

const CHAT_PATH: &str = "/chat";

fn base_or_default(input: &str) -> &str {
    let trimmed = input.trim();
    let base = if trimmed.is_empty() {
        DEFAULT_BASE_URL
    } else {
        trimmed
    };
    base.trim_end_matches('/')
}

/// Normalize a base URL to the chat endpoint.
///
/// Normalization rules:
/// 1) keep a URL already ending in `/chat` unchanged
/// 2) append `/chat` otherwise
pub fn normalize_chat_url(input: &str) -> String {
    let base = base_or_default(input);
    if base.ends_with(CHAT_PATH) {
        return base.to_string();
    }
    format!("{base}{CHAT_PATH}")
}

/// Root URL of the backend, used for the health probe.
pub fn health_url(input: &str) -> String {
    let base = base_or_default(input);
    let root = base.strip_suffix(CHAT_PATH).unwrap_or(base);
    format!("{root}/")
}
