//! Linode DNS Provider

mod http;
mod provider;
mod types;

use reqwest::Client;
use tokio::sync::Mutex;

use crate::providers::common::create_http_client;
use crate::types::ZoneHandle;

pub(crate) use types::{LinodeDomain, LinodePage, LinodeRecord};

pub(crate) const PROVIDER: &str = "linode";
pub(crate) const LINODE_API_BASE: &str = "https://api.linode.com/v4";

/// Linode DNS Provider
///
/// JSON REST dialect with bearer-token auth. Records are stored by
/// subdomain label relative to the zone, not by FQDN, so every operation
/// first splits the requested name against the resolved zone.
pub struct LinodeProvider {
    pub(crate) client: Client,
    pub(crate) api_token: String,
    pub(crate) base_url: String,
    pub(crate) zone: Mutex<Option<ZoneHandle>>,
}

impl LinodeProvider {
    pub fn new(api_token: String) -> Self {
        Self::with_base_url(api_token, LINODE_API_BASE.to_string())
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
