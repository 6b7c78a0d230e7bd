//! Namecheap DNS Provider

mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::providers::common::create_http_client;

pub(crate) use types::{ApiResponse, HostEntry};

pub(crate) const PROVIDER: &str = "namecheap";
pub(crate) const NC_API_URL: &str = "https://api.namecheap.com/xml.response";
pub(crate) const NC_SANDBOX_API_URL: &str = "https://api.sandbox.namecheap.com/xml.response";

/// Namecheap DNS Provider
///
/// Form-encoded POST requests to a single endpoint multiplexed by a
/// `Command` parameter, XML response bodies. The API has no per-record
/// create/delete primitive: the whole host-record set of a domain is
/// fetched, mutated in memory and rewritten atomically via `setHosts`.
pub struct NamecheapProvider {
    pub(crate) client: Client,
    pub(crate) username: String,
    pub(crate) api_key: String,
    pub(crate) client_ip: String,
    pub(crate) base_url: String,
}

impl NamecheapProvider {
    pub fn new(username: String, api_key: String, client_ip: String, sandbox: bool) -> Self {
        let base_url = if sandbox {
            NC_SANDBOX_API_URL.to_string()
        } else {
            NC_API_URL.to_string()
        };
        Self::with_base_url(username, api_key, client_ip, base_url)
    }

    /// Point the adapter at a custom API endpoint (used by tests).
    pub fn with_base_url(
        username: String,
        api_key: String,
        client_ip: String,
        base_url: String,
    ) -> Self {
        Self {
            client: create_http_client(),
            username,
            api_key,
            client_ip,
            base_url,
        }
    }
}
