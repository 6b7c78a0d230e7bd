//! Namecheap DnsProvider trait implementation

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::common::{parse_record_type, write_credentials_file};
use crate::traits::DnsProvider;
use crate::types::{CaaData, CaaRecord, DnsRecord, ProviderKind, ProviderProfile, RecordType};

use super::{HostEntry, NamecheapProvider, PROVIDER};

/// TTL the API reports when none was set explicitly.
const DEFAULT_HOST_TTL: u32 = 1800;

/// One host entry of a `setHosts` whole-zone rewrite.
struct HostParam {
    name: String,
    record_type: String,
    address: String,
    ttl: u32,
    mx_pref: Option<u16>,
}

impl From<&HostEntry> for HostParam {
    fn from(host: &HostEntry) -> Self {
        Self {
            name: host.name.clone(),
            record_type: host.record_type.clone(),
            address: host.address.clone(),
            ttl: host.ttl.unwrap_or(DEFAULT_HOST_TTL),
            mx_pref: host.mx_pref,
        }
    }
}

impl NamecheapProvider {
    /// Split a name into the registered SLD and TLD by taking the last two
    /// dot-separated labels.
    ///
    /// Known limitation: multi-label public suffixes (`example.co.uk`) are
    /// split as `("co", "uk")` and mis-resolve, matching the behavior of the
    /// certbot plugin this provider pairs with.
    fn split_sld_tld(domain: &str) -> Option<(String, String)> {
        let parts: Vec<&str> = domain.split('.').collect();
        if parts.len() < 2 {
            return None;
        }
        Some((
            parts[parts.len() - 2].to_string(),
            parts[parts.len() - 1].to_string(),
        ))
    }

    /// Fully-qualified name of a host entry within `zone`.
    fn host_fqdn(host_name: &str, zone: &str) -> String {
        if host_name == "@" || host_name.is_empty() {
            zone.to_string()
        } else if host_name.ends_with(&format!(".{zone}")) {
            host_name.to_string()
        } else {
            format!("{host_name}.{zone}")
        }
    }

    /// Host label for an FQDN within `zone` (`"@"` for the apex).
    fn host_label(fqdn: &str, zone: &str) -> String {
        if fqdn == zone {
            "@".to_string()
        } else if let Some(label) = fqdn.strip_suffix(&format!(".{zone}")) {
            label.to_string()
        } else {
            fqdn.to_string()
        }
    }

    /// Parse a CAA Address string of the form `"flags tag value"`.
    fn parse_caa_address(address: &str) -> Option<CaaData> {
        let mut parts = address.splitn(3, ' ');
        let flags = parts.next()?.parse().ok()?;
        let tag = parts.next()?.parse().ok()?;
        let value = parts.next()?.to_string();
        Some(CaaData { flags, tag, value })
    }

    fn host_to_dns_record(host: &HostEntry, zone: &str) -> Result<DnsRecord> {
        let record_type = parse_record_type(&host.record_type, PROVIDER)?;
        let caa = (record_type == RecordType::Caa)
            .then(|| Self::parse_caa_address(&host.address))
            .flatten();

        Ok(DnsRecord {
            id: host.host_id.clone(),
            name: Self::host_fqdn(&host.name, zone),
            record_type,
            content: host.address.clone(),
            ttl: host.ttl.unwrap_or(DEFAULT_HOST_TTL),
            proxied: false,
            priority: host.mx_pref,
            caa,
        })
    }

    async fn fetch_hosts(&self, sld: &str, tld: &str) -> Result<Vec<HostEntry>> {
        let params = vec![
            ("SLD".to_string(), sld.to_string()),
            ("TLD".to_string(), tld.to_string()),
        ];
        let response = self
            .command("namecheap.domains.dns.getHosts", &params)
            .await?;
        Ok(response
            .command_response
            .and_then(|c| c.get_hosts)
            .map(|r| r.hosts)
            .unwrap_or_default())
    }

    /// Rewrite the domain's entire host-record set in one call.
    async fn set_hosts(&self, sld: &str, tld: &str, hosts: &[HostParam]) -> Result<()> {
        let mut params = vec![
            ("SLD".to_string(), sld.to_string()),
            ("TLD".to_string(), tld.to_string()),
        ];
        for (i, host) in hosts.iter().enumerate() {
            let n = i + 1;
            params.push((format!("HostName{n}"), host.name.clone()));
            params.push((format!("RecordType{n}"), host.record_type.clone()));
            params.push((format!("Address{n}"), host.address.clone()));
            params.push((format!("TTL{n}"), host.ttl.to_string()));
            if host.record_type == "MX" {
                params.push((format!("MXPref{n}"), host.mx_pref.unwrap_or(10).to_string()));
            }
        }

        log::info!("[{PROVIDER}] rewriting host records for {sld}.{tld}");
        self.command("namecheap.domains.dns.setHosts", &params)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DnsProvider for NamecheapProvider {
    fn id(&self) -> &'static str {
        PROVIDER
    }

    fn profile() -> &'static ProviderProfile {
        ProviderKind::Namecheap.profile()
    }

    fn supports_caa(&self) -> bool {
        false
    }

    async fn validate_credentials(&self) -> Result<bool> {
        log::info!("[{PROVIDER}] validating API credentials");
        match self.command("namecheap.users.getBalances", &[]).await {
            Ok(_) => Ok(true),
            Err(err) => {
                log::warn!("[{PROVIDER}] credential validation failed: {err}");
                Ok(false)
            }
        }
    }

    async fn setup_credentials(&self) -> Result<()> {
        let profile = Self::profile();
        let contents = format!(
            "# Namecheap API credentials used by Certbot\n\
             dns_namecheap_username={}\n\
             dns_namecheap_api_key={}\n",
            self.username, self.api_key
        );
        write_credentials_file(PROVIDER, profile.credentials_file, &contents).await?;
        Ok(())
    }

    async fn get_records(
        &self,
        name: &str,
        record_type: Option<RecordType>,
    ) -> Result<Vec<DnsRecord>> {
        let Some((sld, tld)) = Self::split_sld_tld(name) else {
            log::warn!("[{PROVIDER}] could not determine domain info from {name}");
            return Ok(Vec::new());
        };
        let zone = format!("{sld}.{tld}");
        log::debug!("[{PROVIDER}] getting records for {name} (SLD: {sld}, TLD: {tld})");

        let mut records = Vec::new();
        for host in self.fetch_hosts(&sld, &tld).await? {
            if let Some(filter) = record_type {
                if host.record_type != filter.as_str() {
                    continue;
                }
            }
            if Self::host_fqdn(&host.name, &zone) != name {
                continue;
            }
            // Provider-specific entries (URL redirects etc.) have no place
            // in the record model; skip them.
            match Self::host_to_dns_record(&host, &zone) {
                Ok(record) => records.push(record),
                Err(err) => log::debug!("[{PROVIDER}] skipping host entry: {err}"),
            }
        }
        Ok(records)
    }

    async fn create_record(&self, record: &DnsRecord) -> Result<()> {
        let Some((sld, tld)) = Self::split_sld_tld(&record.name) else {
            return Err(ProviderError::zone_not_found(PROVIDER, &record.name));
        };
        let zone = format!("{sld}.{tld}");

        // No per-record create: keep every unrelated host, drop entries of
        // the same name and type, append the new one, rewrite the set.
        let existing = self.fetch_hosts(&sld, &tld).await?;
        let mut hosts: Vec<HostParam> = existing
            .iter()
            .filter(|host| {
                !(Self::host_fqdn(&host.name, &zone) == record.name
                    && host.record_type == record.record_type.as_str())
            })
            .map(HostParam::from)
            .collect();

        hosts.push(HostParam {
            name: Self::host_label(&record.name, &zone),
            record_type: record.record_type.as_str().to_string(),
            address: record.content.clone(),
            ttl: record.ttl,
            mx_pref: (record.record_type == RecordType::Mx)
                .then_some(record.priority.unwrap_or(10)),
        });

        log::info!(
            "[{PROVIDER}] adding {} record for {}",
            record.record_type,
            record.name
        );
        self.set_hosts(&sld, &tld, &hosts).await
    }

    async fn delete_record(&self, record_id: &str, name: &str) -> Result<()> {
        let Some((sld, tld)) = Self::split_sld_tld(name) else {
            return Err(ProviderError::zone_not_found(PROVIDER, name));
        };

        let existing = self.fetch_hosts(&sld, &tld).await?;
        let hosts: Vec<HostParam> = existing
            .iter()
            .filter(|host| host.host_id.as_deref() != Some(record_id))
            .map(HostParam::from)
            .collect();

        log::info!("[{PROVIDER}] deleting record {record_id}");
        self.set_hosts(&sld, &tld, &hosts).await
    }

    /// The Namecheap API cannot create CAA records. Reports success without
    /// any network call so multi-provider workflows keep working; the shared
    /// `set_caa_record` surfaces this as [`SetOutcome::Skipped`] via
    /// [`supports_caa`](DnsProvider::supports_caa).
    ///
    /// [`SetOutcome::Skipped`]: crate::types::SetOutcome::Skipped
    async fn create_caa_record(&self, record: &CaaRecord) -> Result<()> {
        log::warn!("[{PROVIDER}] the API does not support CAA records");
        log::warn!(
            "[{PROVIDER}] add the CAA record for {} manually",
            record.name
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CaaTag;

    // ---- SLD/TLD split ----

    #[test]
    fn split_two_labels() {
        assert_eq!(
            NamecheapProvider::split_sld_tld("example.com"),
            Some(("example".to_string(), "com".to_string()))
        );
    }

    #[test]
    fn split_subdomain_keeps_last_two_labels() {
        assert_eq!(
            NamecheapProvider::split_sld_tld("a.b.example.com"),
            Some(("example".to_string(), "com".to_string()))
        );
    }

    #[test]
    fn split_single_label_fails() {
        assert_eq!(NamecheapProvider::split_sld_tld("localhost"), None);
    }

    #[test]
    fn split_multi_label_public_suffix_is_naive() {
        // Documented limitation: the registered domain under a multi-label
        // public suffix is not recovered.
        assert_eq!(
            NamecheapProvider::split_sld_tld("example.co.uk"),
            Some(("co".to_string(), "uk".to_string()))
        );
    }

    // ---- host name mapping ----

    #[test]
    fn host_fqdn_apex_and_label() {
        assert_eq!(
            NamecheapProvider::host_fqdn("@", "example.com"),
            "example.com"
        );
        assert_eq!(
            NamecheapProvider::host_fqdn("www", "example.com"),
            "www.example.com"
        );
        assert_eq!(
            NamecheapProvider::host_fqdn("www.example.com", "example.com"),
            "www.example.com"
        );
    }

    #[test]
    fn host_label_inverts_fqdn() {
        assert_eq!(
            NamecheapProvider::host_label("example.com", "example.com"),
            "@"
        );
        assert_eq!(
            NamecheapProvider::host_label("www.example.com", "example.com"),
            "www"
        );
    }

    // ---- CAA address parsing ----

    #[test]
    fn parse_caa_address_full() {
        let caa = NamecheapProvider::parse_caa_address("0 issue letsencrypt.org").unwrap();
        assert_eq!(caa.flags, 0);
        assert_eq!(caa.tag, CaaTag::Issue);
        assert_eq!(caa.value, "letsencrypt.org");
    }

    #[test]
    fn parse_caa_address_value_with_spaces() {
        let caa =
            NamecheapProvider::parse_caa_address("128 iodef mailto:security@example.com x").unwrap();
        assert_eq!(caa.flags, 128);
        assert_eq!(caa.value, "mailto:security@example.com x");
    }

    #[test]
    fn parse_caa_address_malformed() {
        assert!(NamecheapProvider::parse_caa_address("issue letsencrypt.org").is_none());
        assert!(NamecheapProvider::parse_caa_address("0 issue").is_none());
    }

    // ---- host conversion ----

    #[test]
    fn host_to_dns_record_caa() {
        let host = HostEntry {
            host_id: Some("14".to_string()),
            name: "@".to_string(),
            record_type: "CAA".to_string(),
            address: "0 issuewild digicert.com".to_string(),
            mx_pref: Some(10),
            ttl: Some(1800),
        };
        let record = NamecheapProvider::host_to_dns_record(&host, "example.com").unwrap();
        assert_eq!(record.name, "example.com");
        assert_eq!(record.record_type, RecordType::Caa);
        assert_eq!(record.caa.unwrap().tag, CaaTag::Issuewild);
    }

    #[test]
    fn host_to_dns_record_defaults_ttl() {
        let host = HostEntry {
            host_id: None,
            name: "www".to_string(),
            record_type: "A".to_string(),
            address: "192.0.2.9".to_string(),
            mx_pref: None,
            ttl: None,
        };
        let record = NamecheapProvider::host_to_dns_record(&host, "example.com").unwrap();
        assert_eq!(record.ttl, DEFAULT_HOST_TTL);
        assert!(record.id.is_none());
    }
}
