//! HTTP implementation of the translation backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{TranslationBackend, TranslationRequest, TranslationResponse};
use crate::config::ApiConfig;
use crate::error::{SlangError, SlangResult};

/// Path of the translation endpoint, relative to the base URL.
pub const TRANSLATE_PATH: &str = "/api/translate";

/// Client for `POST /api/translate`.
#[derive(Debug, Clone)]
pub struct HttpTranslationClient {
    /// HTTP client for API requests
    client: Client,
    /// Full endpoint URL
    endpoint: String,
}

impl HttpTranslationClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> SlangResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            SlangError::TransportFailure(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), TRANSLATE_PATH),
        })
    }

    /// Create a client from API settings.
    pub fn from_config(config: &ApiConfig) -> SlangResult<Self> {
        Self::new(&config.base_url, config.timeout())
    }

    /// Endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn map_send_error(error: reqwest::Error) -> SlangError {
    if error.is_timeout() {
        SlangError::TransportFailure("Request timed out".to_string())
    } else {
        SlangError::TransportFailure(format!("Network error: {}", error))
    }
}

#[async_trait]
impl TranslationBackend for HttpTranslationClient {
    async fn translate(&self, request: &TranslationRequest) -> SlangResult<String> {
        tracing::debug!(endpoint = %self.endpoint, chars = request.text.len(), "posting translation request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "translation service returned an error status");
            return Err(SlangError::http_status(status.as_u16()));
        }

        let body: TranslationResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                SlangError::TransportFailure("Request timed out".to_string())
            } else {
                SlangError::TransportFailure(format!("Invalid response: {}", e))
            }
        })?;

        body.into_text().ok_or(SlangError::EmptyResult)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = HttpTranslationClient::new("http://localhost:3000/", None).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:3000/api/translate");

        let client = HttpTranslationClient::new("https://slang.example", None).unwrap();
        assert_eq!(client.endpoint(), "https://slang.example/api/translate");
    }

    #[test]
    fn test_from_config() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9000".to_string(),
            timeout_secs: Some(3),
        };
        let client = HttpTranslationClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:9000/api/translate");
    }
}
