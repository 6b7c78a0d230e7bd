//! Cloudflare HTTP request methods

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;

use super::{CloudflareProvider, CloudflareResponse, PROVIDER};

impl CloudflareProvider {
    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.header("Authorization", format!("Bearer {}", self.api_token))
    }

    /// Unwrap the Cloudflare envelope, turning `success: false` into an
    /// [`ProviderError::ApiError`] carrying the first error code.
    fn unwrap_envelope<T>(response: CloudflareResponse<T>) -> Result<CloudflareResponse<T>> {
        if response.success {
            return Ok(response);
        }
        let (code, message) = response
            .errors
            .as_ref()
            .and_then(|errors| errors.first())
            .map_or((None, "Unknown error".to_string()), |e| {
                (Some(e.code.to_string()), e.message.clone())
            });
        log::error!("[{PROVIDER}] API error: {message}");
        Err(ProviderError::api(PROVIDER, code, message))
    }

    /// GET returning the envelope's `result`.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        let (_, body) = HttpUtils::execute_request(
            self.authorized(self.client.get(&url)),
            PROVIDER,
            "GET",
            &url,
        )
        .await?;

        let response: CloudflareResponse<T> = HttpUtils::parse_json(&body, PROVIDER)?;
        Self::unwrap_envelope(response)?
            .result
            .ok_or_else(|| ProviderError::parse(PROVIDER, "response missing result field"))
    }

    /// GET returning both `result` and the pagination metadata.
    pub(crate) async fn get_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<(Vec<T>, u32)> {
        let url = format!("{}{path}", self.base_url);
        let (_, body) = HttpUtils::execute_request(
            self.authorized(self.client.get(&url)),
            PROVIDER,
            "GET",
            &url,
        )
        .await?;

        let response: CloudflareResponse<Vec<T>> = HttpUtils::parse_json(&body, PROVIDER)?;
        let response = Self::unwrap_envelope(response)?;
        let total_pages = response.result_info.map_or(1, |info| info.total_pages);
        Ok((response.result.unwrap_or_default(), total_pages))
    }

    /// POST returning the envelope's `result`.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        request_body: &B,
    ) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        let (_, body) = HttpUtils::execute_request(
            self.authorized(self.client.post(&url)).json(request_body),
            PROVIDER,
            "POST",
            &url,
        )
        .await?;

        let response: CloudflareResponse<T> = HttpUtils::parse_json(&body, PROVIDER)?;
        Self::unwrap_envelope(response)?
            .result
            .ok_or_else(|| ProviderError::parse(PROVIDER, "response missing result field"))
    }

    /// DELETE, succeeding on a `success: true` envelope.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = format!("{}{path}", self.base_url);
        let (_, body) = HttpUtils::execute_request(
            self.authorized(self.client.delete(&url)),
            PROVIDER,
            "DELETE",
            &url,
        )
        .await?;

        let response: CloudflareResponse<serde_json::Value> =
            HttpUtils::parse_json(&body, PROVIDER)?;
        Self::unwrap_envelope(response)?;
        Ok(())
    }
}
