//! HttpTableSessionApi - REST implementation of the table-session backend.
//!
//! One call, no retries: callers decide whether to try again.

use async_trait::async_trait;
use qrdine_core::config::ApiConfig;
use qrdine_core::error::{Result, SessionError};
use qrdine_core::session::{ApiError, ApiErrorCode, ExtendSessionResponse, TableSessionApi};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Clone)]
pub struct HttpTableSessionApi {
    client: Client,
    base_url: String,
}

/// Error bodies come flat (`{code, message}`) or wrapped (`{error: {...}}`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Wrapped { error: ErrorDetail },
    Flat(ErrorDetail),
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

impl HttpTableSessionApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SessionError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn extend_url(&self, table_session_id: &str) -> String {
        let encoded: String =
            url::form_urlencoded::byte_serialize(table_session_id.as_bytes()).collect();
        format!("{}/api/table-sessions/{}/extend", self.base_url, encoded)
    }
}

/// Builds an `ApiError` from a non-2xx response body.
fn parse_error_body(body: &str, status: u16) -> ApiError {
    let detail = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody::Wrapped { error }) => Some(error),
        Ok(ErrorBody::Flat(detail)) => Some(detail),
        Err(_) => None,
    };

    match detail {
        Some(ErrorDetail {
            code: Some(code),
            message,
        }) => ApiError::with_code(
            ApiErrorCode::parse(&code),
            message.unwrap_or_else(|| code.clone()),
            Some(status),
        ),
        Some(ErrorDetail {
            code: None,
            message: Some(message),
        }) => ApiError {
            code: None,
            message,
            status: Some(status),
        },
        _ => ApiError {
            code: None,
            message: format!("Unexpected response body: {}", body.chars().take(200).collect::<String>()),
            status: Some(status),
        },
    }
}

#[async_trait]
impl TableSessionApi for HttpTableSessionApi {
    async fn extend_table_session(
        &self,
        table_session_id: &str,
    ) -> std::result::Result<ExtendSessionResponse, ApiError> {
        let url = self.extend_url(table_session_id);
        tracing::debug!(%url, "Extending table session");

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(parse_error_body(&body, status.as_u16()));
        }

        serde_json::from_str::<ExtendSessionResponse>(&body).map_err(|e| ApiError {
            code: None,
            message: format!("Malformed extend response: {}", e),
            status: Some(status.as_u16()),
        })
    }
}
