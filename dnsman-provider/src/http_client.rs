//! Generic HTTP client tools
//!
//! Reusable request processing shared by the provider adapters: sending,
//! logging, status triage and body reading. Each adapter keeps full control
//! of its own request construction and response envelope.
//!
//! Adapters never retry automatically; a failed call surfaces to the caller,
//! and the idempotent `set_*` operations make a repeat invocation safe.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set.
pub struct HttpUtils;

impl HttpUtils {
    /// Perform an HTTP request and return `(status_code, response_text)`.
    ///
    /// # Arguments
    /// * `request_builder` - configured request (URL, headers, body)
    /// * `provider_name` - provider identifier, for logging and errors
    /// * `method_name` - request verb, for logging
    /// * `url_or_action` - URL or command name, for logging
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url_or_action: &str,
    ) -> Result<(u16, String), ProviderError> {
        log::debug!("[{provider_name}] {method_name} {url_or_action}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::timeout(provider_name, e)
            } else {
                ProviderError::network(provider_name, e)
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{provider_name}] Response Status: {status_code}");

        let response_text = response.text().await.map_err(|e| {
            ProviderError::network(provider_name, format!("Failed to read response body: {e}"))
        })?;

        log::debug!(
            "[{provider_name}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse a JSON response body.
    pub fn parse_json<T>(response_text: &str, provider_name: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{provider_name}] JSON parse failed: {e}");
            log::error!(
                "[{provider_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::parse(provider_name, e)
        })
    }
}
