//! Linode API type definitions

use serde::Deserialize;

/// Linode paginated list envelope.
#[derive(Debug, Deserialize)]
pub struct LinodePage<T> {
    pub data: Vec<T>,
    #[allow(dead_code)]
    pub page: u32,
    pub pages: u32,
}

/// Linode domain (zone) entry.
#[derive(Debug, Deserialize)]
pub struct LinodeDomain {
    pub id: u64,
    pub domain: String,
}

/// Linode DNS record (response shape).
///
/// `name` is the subdomain label relative to the zone; the empty string is
/// the zone apex. CAA records carry the tag in `tag` and the value in
/// `target`.
#[derive(Debug, Deserialize)]
pub struct LinodeRecord {
    pub id: u64,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub target: String,
    pub ttl_sec: u32,
    pub priority: Option<u16>,
    pub tag: Option<String>,
}

/// Linode structured error body.
#[derive(Debug, Deserialize)]
pub struct LinodeErrors {
    pub errors: Vec<LinodeErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub struct LinodeErrorEntry {
    pub reason: String,
    #[allow(dead_code)]
    pub field: Option<String>,
}
