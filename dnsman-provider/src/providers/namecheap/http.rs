//! Namecheap HTTP request methods

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::utils::log_sanitizer::truncate_for_log;

use super::{ApiResponse, NamecheapProvider, PROVIDER};

impl NamecheapProvider {
    /// Execute one API command as a form-encoded POST and decode the XML
    /// envelope, mapping `<Errors>` entries and non-`OK` statuses to
    /// [`ProviderError::ApiError`].
    pub(crate) async fn command(
        &self,
        command: &str,
        params: &[(String, String)],
    ) -> Result<ApiResponse> {
        let mut form: Vec<(&str, &str)> = vec![
            ("ApiUser", &self.username),
            ("ApiKey", &self.api_key),
            ("UserName", &self.username),
            ("ClientIp", &self.client_ip),
            ("Command", command),
        ];
        form.extend(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let (status, body) = HttpUtils::execute_request(
            self.client.post(&self.base_url).form(&form),
            PROVIDER,
            "POST",
            command,
        )
        .await?;
        if !(200..300).contains(&status) {
            return Err(ProviderError::api(
                PROVIDER,
                Some(status.to_string()),
                format!("HTTP {status} from {command}"),
            ));
        }

        let response: ApiResponse = quick_xml::de::from_str(&body).map_err(|e| {
            log::error!("[{PROVIDER}] XML parse failed: {e}");
            log::error!("[{PROVIDER}] Raw response: {}", truncate_for_log(&body));
            ProviderError::parse(PROVIDER, e)
        })?;

        if let Some(errors) = &response.errors {
            if let Some(first) = errors.errors.first() {
                let message = first
                    .message
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string());
                log::error!("[{PROVIDER}] API error: {message}");
                return Err(ProviderError::api(PROVIDER, first.number.clone(), message));
            }
        }

        if response.status != "OK" {
            return Err(ProviderError::api(
                PROVIDER,
                None,
                format!("API returned status: {}", response.status),
            ));
        }

        Ok(response)
    }
}
