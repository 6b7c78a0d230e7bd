//! Linode DnsProvider trait implementation

use std::net::SocketAddr;

use async_trait::async_trait;
use serde::Serialize;
use tokio::net::lookup_host;

use crate::error::{ProviderError, Result};
use crate::providers::common::{
    parse_record_type, strip_quotes, subdomain_of, write_credentials_file, ZoneMatcher,
};
use crate::traits::DnsProvider;
use crate::types::{
    CaaData, CaaRecord, CaaTag, DnsRecord, ProviderKind, ProviderProfile, RecordType, SetOutcome,
    ZoneHandle,
};

use super::{LinodeDomain, LinodePage, LinodeProvider, LinodeRecord, PROVIDER};

impl LinodeProvider {
    /// Convert a Linode record into the abstract model.
    ///
    /// `fqdn` is the name the caller asked about; Linode itself only stores
    /// the relative subdomain label.
    fn to_dns_record(fqdn: &str, record: LinodeRecord) -> Result<DnsRecord> {
        let record_type = parse_record_type(&record.record_type, PROVIDER)?;
        let caa = (record_type == RecordType::Caa).then(|| CaaData {
            // Linode has no flags field; entries always read back as 0.
            flags: 0,
            tag: record
                .tag
                .as_deref()
                .and_then(|t| t.parse().ok())
                .unwrap_or(CaaTag::Issue),
            value: strip_quotes(&record.target).to_string(),
        });

        Ok(DnsRecord {
            id: Some(record.id.to_string()),
            name: fqdn.to_string(),
            record_type,
            content: record.target,
            ttl: record.ttl_sec,
            proxied: false,
            priority: record.priority,
            caa,
        })
    }

    /// Resolve (and cache) the zone covering `fqdn` from the account's
    /// domain list, preferring the longest matching suffix.
    async fn resolve_zone(&self, fqdn: &str) -> Result<ZoneHandle> {
        let mut cached = self.zone.lock().await;
        if let Some(zone) = cached.as_ref() {
            if zone.covers(fqdn) {
                return Ok(zone.clone());
            }
        }

        let mut matcher = ZoneMatcher::new(fqdn);
        let mut page = 1_u32;
        loop {
            let listing: LinodePage<LinodeDomain> =
                self.get(&format!("/domains?page={page}")).await?;
            let exact = listing
                .data
                .iter()
                .any(|d| matcher.offer(&d.id.to_string(), &d.domain));
            if exact || page >= listing.pages {
                break;
            }
            page += 1;
        }

        match matcher.into_best() {
            Some(zone) => {
                log::debug!("[{PROVIDER}] resolved zone {} for {fqdn}", zone.name);
                *cached = Some(zone.clone());
                Ok(zone)
            }
            None => Err(ProviderError::zone_not_found(PROVIDER, fqdn)),
        }
    }

    /// Fetch every record in the zone, walking all pages.
    async fn list_zone_records(&self, zone_id: &str) -> Result<Vec<LinodeRecord>> {
        let mut records = Vec::new();
        let mut page = 1_u32;
        loop {
            let listing: LinodePage<LinodeRecord> = self
                .get(&format!("/domains/{zone_id}/records?page={page}"))
                .await?;
            records.extend(listing.data);
            if page >= listing.pages {
                break;
            }
            page += 1;
        }
        Ok(records)
    }
}

#[async_trait]
impl DnsProvider for LinodeProvider {
    fn id(&self) -> &'static str {
        PROVIDER
    }

    fn profile() -> &'static ProviderProfile {
        ProviderKind::Linode.profile()
    }

    async fn validate_credentials(&self) -> Result<bool> {
        match self.get::<serde_json::Value>("/profile").await {
            Ok(_) => Ok(true),
            Err(_) => Ok(false),
        }
    }

    async fn setup_credentials(&self) -> Result<()> {
        let profile = Self::profile();
        let contents = format!(
            "# WARNING: This file contains sensitive credentials for the Linode DNS API.\n\
             # Ensure this file is kept secure and not shared.\n\
             dns_linode_key = {}\n",
            self.api_token
        );
        write_credentials_file(PROVIDER, profile.credentials_file, &contents).await?;
        Ok(())
    }

    async fn get_records(
        &self,
        name: &str,
        record_type: Option<RecordType>,
    ) -> Result<Vec<DnsRecord>> {
        let zone = match self.resolve_zone(name).await {
            Ok(zone) => zone,
            Err(err @ ProviderError::ZoneNotFound { .. }) => {
                log::warn!("{err}");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };

        let subdomain = subdomain_of(name, &zone.name);
        let mut records = Vec::new();
        for record in self.list_zone_records(&zone.id).await? {
            if record.name != subdomain {
                continue;
            }
            if let Some(filter) = record_type {
                if record.record_type != filter.as_str() {
                    continue;
                }
            }
            records.push(Self::to_dns_record(name, record)?);
        }
        Ok(records)
    }

    async fn create_record(&self, record: &DnsRecord) -> Result<()> {
        let zone = self.resolve_zone(&record.name).await?;
        let subdomain = subdomain_of(&record.name, &zone.name);

        #[derive(Serialize)]
        struct CreateRecordBody<'a> {
            #[serde(rename = "type")]
            record_type: &'a str,
            name: &'a str,
            target: String,
            ttl_sec: u32,
            #[serde(skip_serializing_if = "Option::is_none")]
            priority: Option<u16>,
        }

        // TXT targets must carry quotes on the wire.
        let target = if record.record_type == RecordType::Txt
            && !record.content.starts_with('"')
        {
            format!("\"{}\"", record.content)
        } else {
            record.content.clone()
        };

        let body = CreateRecordBody {
            record_type: record.record_type.as_str(),
            name: &subdomain,
            target,
            ttl_sec: record.ttl,
            priority: record.priority,
        };

        log::info!(
            "[{PROVIDER}] adding {} record for {}",
            record.record_type,
            record.name
        );
        let _: LinodeRecord = self
            .post(&format!("/domains/{}/records", zone.id), &body)
            .await?;
        Ok(())
    }

    async fn delete_record(&self, record_id: &str, name: &str) -> Result<()> {
        let zone = self.resolve_zone(name).await?;
        log::info!("[{PROVIDER}] deleting record {record_id}");
        self.delete(&format!("/domains/{}/records/{record_id}", zone.id))
            .await
    }

    async fn create_caa_record(&self, record: &CaaRecord) -> Result<()> {
        let zone = self.resolve_zone(&record.name).await?;
        let subdomain = subdomain_of(&record.name, &zone.name);

        #[derive(Serialize)]
        struct CreateCaaBody<'a> {
            #[serde(rename = "type")]
            record_type: &'a str,
            name: &'a str,
            tag: &'a str,
            target: &'a str,
            ttl_sec: u32,
        }

        // Separate tag/target fields; the API has no flags field, so any
        // requested flags value is not representable and reads back as 0.
        let clean_value = strip_quotes(&record.value);
        let body = CreateCaaBody {
            record_type: "CAA",
            name: &subdomain,
            tag: record.tag.as_str(),
            target: clean_value,
            ttl_sec: record.ttl,
        };

        log::info!(
            "[{PROVIDER}] adding CAA record for {} with tag {} and value {clean_value}",
            record.name,
            record.tag
        );
        let _: LinodeRecord = self
            .post(&format!("/domains/{}/records", zone.id), &body)
            .await?;
        Ok(())
    }

    /// Linode forbids a CNAME and a CAA record coexisting at the same
    /// subdomain, so alias requests resolve the target host to an IPv4
    /// address and write an A record instead of a CNAME.
    async fn set_alias_record(
        &self,
        name: &str,
        target: &str,
        ttl: u32,
        _proxied: bool,
    ) -> Result<SetOutcome> {
        log::info!("[{PROVIDER}] resolving alias target {target}");
        let resolution_failed = |detail: String| ProviderError::HostResolutionFailed {
            provider: PROVIDER.to_string(),
            host: target.to_string(),
            detail,
        };

        let mut addresses = lookup_host((target, 443))
            .await
            .map_err(|e| resolution_failed(e.to_string()))?;
        let ip = addresses
            .find_map(|addr| match addr {
                SocketAddr::V4(v4) => Some(*v4.ip()),
                SocketAddr::V6(_) => None,
            })
            .ok_or_else(|| resolution_failed("no IPv4 address found".to_string()))?;
        log::info!("[{PROVIDER}] resolved {target} to {ip}");

        // Clean transition: any CNAME occupying the name must go before the
        // A record can exist there.
        let existing_cnames = self.get_records(name, Some(RecordType::Cname)).await?;
        for record in &existing_cnames {
            if let Some(id) = &record.id {
                self.delete_record(id, name).await?;
            }
        }

        log::info!(
            "[{PROVIDER}] creating A record for {name} pointing at {ip} (instead of CNAME to {target})"
        );
        self.set_a_record(name, &ip.to_string(), ttl, false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(record_type: &str, name: &str, target: &str) -> LinodeRecord {
        LinodeRecord {
            id: 42,
            record_type: record_type.to_string(),
            name: name.to_string(),
            target: target.to_string(),
            ttl_sec: 300,
            priority: None,
            tag: None,
        }
    }

    #[test]
    fn to_dns_record_uses_requested_fqdn() {
        let record = LinodeProvider::to_dns_record(
            "www.example.com",
            sample_record("A", "www", "192.0.2.1"),
        )
        .unwrap();
        assert_eq!(record.name, "www.example.com");
        assert_eq!(record.id.as_deref(), Some("42"));
        assert_eq!(record.content, "192.0.2.1");
    }

    #[test]
    fn to_dns_record_caa_maps_tag_and_strips_quotes() {
        let mut raw = sample_record("CAA", "", "\"letsencrypt.org\"");
        raw.tag = Some("issuewild".to_string());
        let record = LinodeProvider::to_dns_record("example.com", raw).unwrap();
        let caa = record.caa.unwrap();
        assert_eq!(caa.tag, CaaTag::Issuewild);
        assert_eq!(caa.value, "letsencrypt.org");
        assert_eq!(caa.flags, 0);
    }

    #[test]
    fn to_dns_record_caa_missing_tag_defaults_to_issue() {
        let record =
            LinodeProvider::to_dns_record("example.com", sample_record("CAA", "", "ca.example"))
                .unwrap();
        assert_eq!(record.caa.unwrap().tag, CaaTag::Issue);
    }
}
