//! Provider factory functions and environment detection.

use std::env;
use std::sync::Arc;

use crate::error::{ProviderError, Result};
use crate::traits::DnsProvider;
use crate::types::{ProviderCredentials, ProviderKind, PROFILES};

#[cfg(feature = "cloudflare")]
use crate::providers::CloudflareProvider;
#[cfg(feature = "linode")]
use crate::providers::LinodeProvider;
#[cfg(feature = "namecheap")]
use crate::providers::NamecheapProvider;

/// Creates a [`DnsProvider`] instance from the given credentials.
///
/// The concrete provider type is determined by the [`ProviderCredentials`]
/// variant. The returned provider is wrapped in `Arc<dyn DnsProvider>` for
/// easy sharing across async tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use dnsman_provider::{create_provider, ProviderCredentials};
///
/// let provider = create_provider(ProviderCredentials::Cloudflare {
///     api_token: "your-token".to_string(),
/// });
/// ```
pub fn create_provider(credentials: ProviderCredentials) -> Arc<dyn DnsProvider> {
    match credentials {
        #[cfg(feature = "cloudflare")]
        ProviderCredentials::Cloudflare { api_token } => {
            Arc::new(CloudflareProvider::new(api_token))
        }
        #[cfg(feature = "linode")]
        ProviderCredentials::Linode { api_token } => Arc::new(LinodeProvider::new(api_token)),
        #[cfg(feature = "namecheap")]
        ProviderCredentials::Namecheap {
            username,
            api_key,
            client_ip,
            sandbox,
        } => Arc::new(NamecheapProvider::new(username, api_key, client_ip, sandbox)),
    }
}

/// Resolve a provider from an explicit selector or the environment, then
/// build it with credentials read from the environment.
///
/// Resolution order: the `selector` argument, the `DNS_PROVIDER` override
/// variable, then the first entry of the ordered provider table whose
/// detection variable is present.
///
/// # Errors
///
/// [`ProviderError::UnsupportedProvider`] when nothing resolves (the message
/// names every supported provider), or [`ProviderError::MissingCredential`]
/// when the resolved provider's credentials are incomplete.
pub fn provider_from_env(selector: Option<&str>) -> Result<Arc<dyn DnsProvider>> {
    let kind = match selector {
        Some(s) => s.parse()?,
        None => detect_provider()?,
    };
    let credentials = ProviderCredentials::from_env(kind)?;
    Ok(create_provider(credentials))
}

/// Detect the provider kind from environment variables.
///
/// `DNS_PROVIDER` takes precedence; otherwise the ordered provider table is
/// scanned for the first profile whose detection variable is present.
pub fn detect_provider() -> Result<ProviderKind> {
    if let Ok(explicit) = env::var("DNS_PROVIDER") {
        return explicit.parse();
    }

    for profile in PROFILES {
        if profile.is_suitable() {
            log::debug!("detected DNS provider '{}' from {}", profile.kind, profile.detect_env);
            return Ok(profile.kind);
        }
    }

    Err(ProviderError::UnsupportedProvider {
        selector: String::new(),
        supported: supported_providers().join(", "),
    })
}

/// Names of all providers enabled via feature flags, in detection order.
pub fn supported_providers() -> Vec<&'static str> {
    PROFILES.iter().map(|p| p.kind.as_str()).collect()
}
