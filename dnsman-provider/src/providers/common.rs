//! Shared utilities used by provider implementations.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;

use crate::error::{ProviderError, Result};
use crate::types::{RecordType, ZoneHandle};

// ============ HTTP Client ============

/// Default connect timeout (seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds).
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Create an HTTP client with the standard timeout configuration.
pub fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_default()
}

// ============ Record Type Conversion ============

/// Parse a provider wire string into a [`RecordType`].
pub fn parse_record_type(record_type: &str, provider: &str) -> Result<RecordType> {
    match record_type.to_uppercase().as_str() {
        "A" => Ok(RecordType::A),
        "AAAA" => Ok(RecordType::Aaaa),
        "CNAME" => Ok(RecordType::Cname),
        "TXT" => Ok(RecordType::Txt),
        "MX" => Ok(RecordType::Mx),
        "NS" => Ok(RecordType::Ns),
        "CAA" => Ok(RecordType::Caa),
        "SRV" => Ok(RecordType::Srv),
        "PTR" => Ok(RecordType::Ptr),
        other => Err(ProviderError::InvalidRecordType {
            provider: provider.to_string(),
            record_type: other.to_string(),
        }),
    }
}

// ============ Zone Matching ============

/// Accumulates the best zone candidate for an FQDN across a (possibly
/// paginated) zone listing.
///
/// An exact name match wins immediately; otherwise the longest zone name
/// that is a proper dot-suffix of the FQDN wins, which picks
/// `sub.example.com` over `example.com` when both exist as zones.
pub struct ZoneMatcher<'a> {
    fqdn: &'a str,
    best: Option<ZoneHandle>,
    exact: bool,
}

impl<'a> ZoneMatcher<'a> {
    pub fn new(fqdn: &'a str) -> Self {
        Self {
            fqdn,
            best: None,
            exact: false,
        }
    }

    /// Offer one zone candidate. Returns `true` on an exact match, at which
    /// point the caller may stop listing further pages.
    pub fn offer(&mut self, id: &str, zone_name: &str) -> bool {
        if self.exact {
            return true;
        }
        if self.fqdn == zone_name {
            self.best = Some(ZoneHandle::new(id, zone_name));
            self.exact = true;
            return true;
        }
        if self.fqdn.ends_with(&format!(".{zone_name}")) {
            let better = self
                .best
                .as_ref()
                .is_none_or(|b| zone_name.len() > b.name.len());
            if better {
                self.best = Some(ZoneHandle::new(id, zone_name));
            }
        }
        false
    }

    /// The winning zone, if any candidate matched.
    pub fn into_best(self) -> Option<ZoneHandle> {
        self.best
    }
}

// ============ Name Handling ============

/// Subdomain label of `fqdn` relative to `zone_name`.
///
/// The empty string denotes the zone apex; an FQDN outside the zone is
/// returned unchanged.
pub fn subdomain_of(fqdn: &str, zone_name: &str) -> String {
    if fqdn == zone_name {
        String::new()
    } else if let Some(prefix) = fqdn.strip_suffix(&format!(".{zone_name}")) {
        prefix.to_string()
    } else {
        fqdn.to_string()
    }
}

/// Strip one pair of surrounding literal quote characters, if present.
pub fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// TXT content equality tolerant of wire quoting: a stored `"value"` equals
/// a requested `value`.
pub fn txt_content_matches(stored: &str, requested: &str) -> bool {
    stored == requested || stored == format!("\"{requested}\"")
}

// ============ Credentials Files ============

/// Expand a leading `~/` against the user's home directory.
fn expand_tilde(path: &str) -> Result<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| ProviderError::CredentialsFile {
            provider: String::new(),
            path: path.to_string(),
            detail: "home directory not found".to_string(),
        })?;
        Ok(home.join(rest))
    } else {
        Ok(PathBuf::from(path))
    }
}

/// Write a provider secrets file at `path` (tilde-relative) with owner-only
/// permissions, for the external certificate tool's DNS-01 plugin.
pub async fn write_credentials_file(provider: &str, path: &str, contents: &str) -> Result<PathBuf> {
    let file = expand_tilde(path)?;
    let io_err = |e: std::io::Error| ProviderError::CredentialsFile {
        provider: provider.to_string(),
        path: path.to_string(),
        detail: e.to_string(),
    };

    if let Some(dir) = file.parent() {
        tokio::fs::create_dir_all(dir).await.map_err(io_err)?;
    }
    tokio::fs::write(&file, contents).await.map_err(io_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o600))
            .await
            .map_err(io_err)?;
    }

    log::info!("[{provider}] credentials file created: {}", file.display());
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- parse_record_type ----

    #[test]
    fn parse_record_type_known() {
        assert_eq!(parse_record_type("A", "test").unwrap(), RecordType::A);
        assert_eq!(parse_record_type("caa", "test").unwrap(), RecordType::Caa);
        assert_eq!(parse_record_type("Txt", "test").unwrap(), RecordType::Txt);
    }

    #[test]
    fn parse_record_type_unknown() {
        let err = parse_record_type("LOC", "test").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRecordType { .. }));
    }

    // ---- ZoneMatcher ----

    #[test]
    fn zone_matcher_exact_match_wins() {
        let mut m = ZoneMatcher::new("example.com");
        assert!(!m.offer("z1", "other.com"));
        assert!(m.offer("z2", "example.com"));
        let best = m.into_best().unwrap();
        assert_eq!(best.id, "z2");
    }

    #[test]
    fn zone_matcher_prefers_longest_suffix() {
        let mut m = ZoneMatcher::new("a.sub.example.com");
        m.offer("z1", "example.com");
        m.offer("z2", "sub.example.com");
        let best = m.into_best().unwrap();
        assert_eq!(best.name, "sub.example.com");
        assert_eq!(best.id, "z2");
    }

    #[test]
    fn zone_matcher_order_independent() {
        let mut m = ZoneMatcher::new("a.sub.example.com");
        m.offer("z2", "sub.example.com");
        m.offer("z1", "example.com");
        assert_eq!(m.into_best().unwrap().name, "sub.example.com");
    }

    #[test]
    fn zone_matcher_rejects_lookalike_suffix() {
        let mut m = ZoneMatcher::new("badexample.com");
        m.offer("z1", "example.com");
        assert!(m.into_best().is_none());
    }

    #[test]
    fn zone_matcher_no_candidates() {
        let m = ZoneMatcher::new("a.example.com");
        assert!(m.into_best().is_none());
    }

    #[test]
    fn zone_matcher_exact_short_circuits_later_offers() {
        let mut m = ZoneMatcher::new("sub.example.com");
        m.offer("z1", "sub.example.com");
        m.offer("z2", "much.longer.sub.example.com");
        assert_eq!(m.into_best().unwrap().id, "z1");
    }

    // ---- subdomain_of ----

    #[test]
    fn subdomain_of_apex_is_empty() {
        assert_eq!(subdomain_of("example.com", "example.com"), "");
    }

    #[test]
    fn subdomain_of_strips_zone_suffix() {
        assert_eq!(subdomain_of("www.example.com", "example.com"), "www");
        assert_eq!(subdomain_of("a.b.example.com", "example.com"), "a.b");
    }

    #[test]
    fn subdomain_of_foreign_name_unchanged() {
        assert_eq!(subdomain_of("www.other.org", "example.com"), "www.other.org");
    }

    // ---- quoting ----

    #[test]
    fn strip_quotes_removes_one_pair() {
        assert_eq!(strip_quotes("\"hello\""), "hello");
        assert_eq!(strip_quotes("hello"), "hello");
        assert_eq!(strip_quotes("\"unbalanced"), "\"unbalanced");
    }

    #[test]
    fn txt_content_matches_quoted_and_plain() {
        assert!(txt_content_matches("hello", "hello"));
        assert!(txt_content_matches("\"hello\"", "hello"));
        assert!(!txt_content_matches("hello", "world"));
        assert!(!txt_content_matches("\"hello\"", "hello\""));
    }
}
