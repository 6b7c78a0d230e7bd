//! Cloudflare DNS Provider

mod http;
mod provider;
mod types;

use reqwest::Client;
use tokio::sync::Mutex;

use crate::providers::common::create_http_client;
use crate::types::ZoneHandle;

pub(crate) use types::{CloudflareDnsRecord, CloudflareResponse, CloudflareZone};

pub(crate) const PROVIDER: &str = "cloudflare";
pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";
/// Cloudflare Zones API maximum page size.
pub(crate) const MAX_PAGE_SIZE_ZONES: u32 = 50;

/// Cloudflare DNS Provider
///
/// JSON REST dialect with bearer-token auth. Holds the single-entry zone
/// cache for the lifetime of the instance (one process run).
pub struct CloudflareProvider {
    pub(crate) client: Client,
    pub(crate) api_token: String,
    pub(crate) base_url: String,
    pub(crate) zone: Mutex<Option<ZoneHandle>>,
}

impl CloudflareProvider {
    pub fn new(api_token: String) -> Self {
        Self::with_base_url(api_token, CF_API_BASE.to_string())
    }

    /// Point the adapter at a custom API endpoint (used by tests).
    pub fn with_base_url(api_token: String, base_url: String) -> Self {
        Self {
            client: create_http_client(),
            api_token,
            base_url,
            zone: Mutex::new(None),
        }
    }
}
