//! Cloudflare DnsProvider trait implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};
use crate::providers::common::{parse_record_type, strip_quotes, write_credentials_file, ZoneMatcher};
use crate::traits::DnsProvider;
use crate::types::{
    CaaData, CaaRecord, DnsRecord, ProviderKind, ProviderProfile, RecordType, ZoneHandle,
};

use super::{CloudflareDnsRecord, CloudflareProvider, CloudflareZone, MAX_PAGE_SIZE_ZONES, PROVIDER};

impl CloudflareProvider {
    /// Convert a Cloudflare record into the abstract model.
    fn to_dns_record(cf_record: CloudflareDnsRecord) -> Result<DnsRecord> {
        let record_type = parse_record_type(&cf_record.record_type, PROVIDER)?;
        let caa = cf_record.data.and_then(|data| {
            data.tag.parse().ok().map(|tag| CaaData {
                flags: data.flags,
                tag,
                value: strip_quotes(&data.value).to_string(),
            })
        });

        Ok(DnsRecord {
            id: Some(cf_record.id),
            name: cf_record.name,
            record_type,
            content: cf_record.content,
            ttl: cf_record.ttl,
            proxied: cf_record.proxied.unwrap_or(false),
            priority: cf_record.priority,
            caa,
        })
    }

    /// Resolve (and cache) the zone covering `fqdn`.
    ///
    /// The zones listing is paginated; `total_pages` comes from the envelope
    /// metadata. Longest-suffix matching picks the most specific zone when
    /// nested zones exist.
    async fn resolve_zone(&self, fqdn: &str) -> Result<ZoneHandle> {
        let mut cached = self.zone.lock().await;
        if let Some(zone) = cached.as_ref() {
            if zone.covers(fqdn) {
                return Ok(zone.clone());
            }
        }

        let mut matcher = ZoneMatcher::new(fqdn);
        let mut page = 1_u32;
        let mut total_pages = 1_u32;
        while page <= total_pages {
            let (zones, pages): (Vec<CloudflareZone>, u32) = self
                .get_paginated(&format!("/zones?page={page}&per_page={MAX_PAGE_SIZE_ZONES}"))
                .await?;
            total_pages = pages;

            let exact = zones
                .iter()
                .any(|zone| matcher.offer(&zone.id, &zone.name));
            if exact {
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
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    fn id(&self) -> &'static str {
        PROVIDER
    }

    fn profile() -> &'static ProviderProfile {
        ProviderKind::Cloudflare.profile()
    }

    async fn validate_credentials(&self) -> Result<bool> {
        #[derive(Deserialize)]
        struct VerifyResponse {
            status: String,
        }

        match self.get::<VerifyResponse>("/user/tokens/verify").await {
            Ok(resp) => Ok(resp.status == "active"),
            Err(_) => Ok(false),
        }
    }

    async fn setup_credentials(&self) -> Result<()> {
        let profile = Self::profile();
        let contents = format!("dns_cloudflare_api_token = {}\n", self.api_token);
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

        let mut path = format!("/zones/{}/dns_records?name={name}", zone.id);
        if let Some(record_type) = record_type {
            path.push_str(&format!("&type={record_type}"));
        }

        let (cf_records, _) = self
            .get_paginated::<CloudflareDnsRecord>(&path)
            .await?;
        cf_records.into_iter().map(Self::to_dns_record).collect()
    }

    async fn create_record(&self, record: &DnsRecord) -> Result<()> {
        let zone = self.resolve_zone(&record.name).await?;

        #[derive(Serialize)]
        struct CreateRecordBody<'a> {
            #[serde(rename = "type")]
            record_type: &'a str,
            name: &'a str,
            content: String,
            ttl: u32,
            #[serde(skip_serializing_if = "Option::is_none")]
            priority: Option<u16>,
            #[serde(skip_serializing_if = "Option::is_none")]
            proxied: Option<bool>,
        }

        // The API wants TXT content quoted on the wire; the model keeps it bare.
        let content = if record.record_type == RecordType::Txt
            && strip_quotes(&record.content) == record.content
        {
            format!("\"{}\"", record.content)
        } else {
            record.content.clone()
        };

        let proxied = matches!(record.record_type, RecordType::A | RecordType::Cname)
            .then_some(record.proxied);

        let body = CreateRecordBody {
            record_type: record.record_type.as_str(),
            name: &record.name,
            content,
            ttl: record.ttl,
            priority: record.priority,
            proxied,
        };

        log::info!(
            "[{PROVIDER}] adding {} record for {}",
            record.record_type,
            record.name
        );
        let _: CloudflareDnsRecord = self
            .post(&format!("/zones/{}/dns_records", zone.id), &body)
            .await?;
        Ok(())
    }

    async fn delete_record(&self, record_id: &str, name: &str) -> Result<()> {
        let zone = self.resolve_zone(name).await?;
        log::info!("[{PROVIDER}] deleting record {record_id}");
        self.delete(&format!("/zones/{}/dns_records/{record_id}", zone.id))
            .await
    }

    async fn create_caa_record(&self, record: &CaaRecord) -> Result<()> {
        let zone = self.resolve_zone(&record.name).await?;

        #[derive(Serialize)]
        struct CaaPayload<'a> {
            flags: u8,
            tag: &'a str,
            value: &'a str,
        }

        #[derive(Serialize)]
        struct CreateCaaBody<'a> {
            #[serde(rename = "type")]
            record_type: &'a str,
            name: &'a str,
            ttl: u32,
            data: CaaPayload<'a>,
        }

        let clean_value = strip_quotes(&record.value);
        let body = CreateCaaBody {
            record_type: "CAA",
            name: &record.name,
            ttl: record.ttl,
            data: CaaPayload {
                flags: record.flags,
                tag: record.tag.as_str(),
                value: clean_value,
            },
        };

        log::info!(
            "[{PROVIDER}] adding CAA record for {} with tag {} and value {clean_value}",
            record.name,
            record.tag
        );
        let _: CloudflareDnsRecord = self
            .post(&format!("/zones/{}/dns_records", zone.id), &body)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CaaTag;

    #[test]
    fn to_dns_record_basic_a() {
        let cf = CloudflareDnsRecord {
            id: "r1".to_string(),
            record_type: "A".to_string(),
            name: "www.example.com".to_string(),
            content: "192.0.2.1".to_string(),
            ttl: 60,
            priority: None,
            proxied: Some(true),
            data: None,
        };
        let record = CloudflareProvider::to_dns_record(cf).unwrap();
        assert_eq!(record.id.as_deref(), Some("r1"));
        assert_eq!(record.record_type, RecordType::A);
        assert!(record.proxied);
        assert!(record.caa.is_none());
    }

    #[test]
    fn to_dns_record_caa_data_unquoted() {
        let cf = CloudflareDnsRecord {
            id: "r2".to_string(),
            record_type: "CAA".to_string(),
            name: "example.com".to_string(),
            content: "0 issue \"letsencrypt.org\"".to_string(),
            ttl: 60,
            priority: None,
            proxied: None,
            data: Some(super::super::types::CloudflareCaaData {
                flags: 0,
                tag: "issue".to_string(),
                value: "\"letsencrypt.org\"".to_string(),
            }),
        };
        let record = CloudflareProvider::to_dns_record(cf).unwrap();
        let caa = record.caa.unwrap();
        assert_eq!(caa.tag, CaaTag::Issue);
        assert_eq!(caa.value, "letsencrypt.org");
    }

    #[test]
    fn to_dns_record_rejects_unknown_type() {
        let cf = CloudflareDnsRecord {
            id: "r3".to_string(),
            record_type: "LOC".to_string(),
            name: "example.com".to_string(),
            content: String::new(),
            ttl: 60,
            priority: None,
            proxied: None,
            data: None,
        };
        assert!(CloudflareProvider::to_dns_record(cf).is_err());
    }
}
