use chat_protocol::{ChatRequest, ChatResponse, HealthStatus};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::config::ChatApiConfig;
use crate::error::{status_message, ChatApiError};
use crate::headers::build_headers;
use crate::url::{health_url, normalize_chat_url};

#[derive(Debug)]
pub struct ChatApiClient {
    http: Client,
    config: ChatApiConfig,
    endpoint: Url,
}

impl ChatApiClient {
    pub fn new(config: ChatApiConfig) -> Result<Self, ChatApiError> {
        let endpoint = parse_url(&normalize_chat_url(&config.base_url))?;

        // Callers may drive each request on its own short-lived runtime, so
        // pooled connections must not outlive the call that opened them.
        let mut builder = Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            config,
            endpoint,
        })
    }

    pub fn config(&self) -> &ChatApiConfig {
        &self.config
    }

    pub fn chat_endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn health_endpoint(&self) -> String {
        health_url(&self.config.base_url)
    }

    pub fn build_headers(&self) -> Result<HeaderMap, ChatApiError> {
        let headers = build_headers(&self.config, None);
        let mut out = HeaderMap::new();
        for (key, value) in headers {
            let name =
                HeaderName::from_bytes(key.as_bytes()).map_err(|error| ChatApiError::InvalidHeader {
                    name: key.clone(),
                    message: error.to_string(),
                })?;
            let value = HeaderValue::from_str(&value).map_err(|error| ChatApiError::InvalidHeader {
                name: key.clone(),
                message: error.to_string(),
            })?;
            out.insert(name, value);
        }
        Ok(out)
    }

    pub fn build_request(
        &self,
        request: &ChatRequest,
    ) -> Result<reqwest::RequestBuilder, ChatApiError> {
        let headers = self.build_headers()?;
        Ok(self
            .http
            .post(self.endpoint.clone())
            .headers(headers)
            .json(request))
    }

    /// Sends one chat request and decodes the response body.
    ///
    /// Any JSON body is returned regardless of HTTP status so the caller can
    /// classify it by content. A JSON body that is not an object decodes to an
    /// empty response. Network failures, non-JSON bodies and a `null` body are
    /// errors.
    pub async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatApiError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            history_len = request.history.len(),
            "sending chat request"
        );

        let response = self.build_request(request)?.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let value: Value = serde_json::from_str(&body)
            .map_err(|source| ChatApiError::Decode { status, source })?;

        if !status.is_success() {
            tracing::warn!(%status, "backend returned non-success status with JSON body");
        }

        match value {
            Value::Null => Err(ChatApiError::NullBody { status }),
            Value::Object(_) => {
                serde_json::from_value(value).map_err(|source| ChatApiError::Decode { status, source })
            }
            _ => Ok(ChatResponse::default()),
        }
    }

    /// Probes the backend root endpoint.
    pub async fn health(&self) -> Result<HealthStatus, ChatApiError> {
        let url = parse_url(&self.health_endpoint())?;
        let headers = self.build_headers()?;
        let response = self.http.get(url).headers(headers).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ChatApiError::Status {
                status,
                message: status_message(status, &body),
            });
        }

        serde_json::from_str(&body).map_err(|source| ChatApiError::Decode { status, source })
    }
}

fn parse_url(raw: &str) -> Result<Url, ChatApiError> {
    let url = Url::parse(raw).map_err(|error| ChatApiError::InvalidBaseUrl {
        url: raw.to_string(),
        message: error.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ChatApiError::InvalidBaseUrl {
            url: raw.to_string(),
            message: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(url)
}
