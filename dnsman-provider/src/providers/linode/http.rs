//! Linode HTTP request methods

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;

use super::types::LinodeErrors;
use super::{LinodeProvider, PROVIDER};

impl LinodeProvider {
    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.header("Authorization", format!("Bearer {}", self.api_token))
    }

    /// Map a non-2xx response to an [`ProviderError::ApiError`], extracting
    /// the first `reason` from Linode's structured error body when present.
    fn error_from_body(status: u16, body: &str) -> ProviderError {
        let message = serde_json::from_str::<LinodeErrors>(body)
            .ok()
            .and_then(|e| e.errors.into_iter().next())
            .map_or_else(|| body.to_string(), |e| e.reason);
        log::error!("[{PROVIDER}] API error (HTTP {status}): {message}");
        ProviderError::api(PROVIDER, Some(status.to_string()), message)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        let (status, body) =
            HttpUtils::execute_request(self.authorized(self.client.get(&url)), PROVIDER, "GET", &url)
                .await?;
        if !(200..300).contains(&status) {
            return Err(Self::error_from_body(status, &body));
        }
        HttpUtils::parse_json(&body, PROVIDER)
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        request_body: &B,
    ) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        let (status, body) = HttpUtils::execute_request(
            self.authorized(self.client.post(&url)).json(request_body),
            PROVIDER,
            "POST",
            &url,
        )
        .await?;
        if !(200..300).contains(&status) {
            return Err(Self::error_from_body(status, &body));
        }
        HttpUtils::parse_json(&body, PROVIDER)
    }

    /// DELETE. Linode answers a successful delete with an empty JSON object,
    /// so any 2xx status is success and the body is not parsed.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = format!("{}{path}", self.base_url);
        let (status, body) = HttpUtils::execute_request(
            self.authorized(self.client.delete(&url)),
            PROVIDER,
            "DELETE",
            &url,
        )
        .await?;
        if !(200..300).contains(&status) {
            return Err(Self::error_from_body(status, &body));
        }
        Ok(())
    }
}
