//! Namecheap XML response types
//!
//! Elements live under the `https://api.namecheap.com/xml.response` default
//! namespace; tag names are matched as written, attributes as `@Name`.

use serde::Deserialize;

/// Top-level `<ApiResponse>` envelope.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(rename = "@Status")]
    pub status: String,
    #[serde(rename = "Errors")]
    pub errors: Option<ApiErrors>,
    #[serde(rename = "CommandResponse")]
    pub command_response: Option<CommandResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrors {
    #[serde(rename = "Error", default)]
    pub errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorEntry {
    #[serde(rename = "@Number")]
    pub number: Option<String>,
    #[serde(rename = "$text")]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommandResponse {
    #[serde(rename = "DomainDNSGetHostsResult")]
    pub get_hosts: Option<GetHostsResult>,
    #[serde(rename = "DomainDNSSetHostsResult")]
    pub set_hosts: Option<SetHostsResult>,
}

#[derive(Debug, Deserialize)]
pub struct GetHostsResult {
    #[serde(rename = "@Domain")]
    #[allow(dead_code)]
    pub domain: Option<String>,
    #[serde(rename = "host", default)]
    pub hosts: Vec<HostEntry>,
}

/// One `<host>` entry of a `getHosts` response.
#[derive(Debug, Clone, Deserialize)]
pub struct HostEntry {
    #[serde(rename = "@HostId")]
    pub host_id: Option<String>,
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@Type")]
    pub record_type: String,
    #[serde(rename = "@Address")]
    pub address: String,
    #[serde(rename = "@MXPref")]
    pub mx_pref: Option<u16>,
    #[serde(rename = "@TTL")]
    pub ttl: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SetHostsResult {
    #[serde(rename = "@IsSuccess")]
    pub is_success: Option<bool>,
}
