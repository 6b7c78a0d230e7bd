use async_trait::async_trait;

use crate::error::Result;
use crate::providers::common::{strip_quotes, txt_content_matches};
use crate::types::{CaaRecord, CaaTag, DnsRecord, ProviderProfile, RecordType, SetOutcome};

/// DNS provider capability contract.
///
/// Each adapter implements the four record primitives plus the credential
/// hooks; the idempotent `set_*` reconciliation operations are default
/// methods composed from those primitives, so an adapter overrides only the
/// operations it must (Linode's `set_alias_record`).
///
/// The trait is object-safe: instances are handed out by the factory as
/// `Arc<dyn DnsProvider>`.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Provider identifier (`"cloudflare"`, `"linode"`, `"namecheap"`).
    fn id(&self) -> &'static str;

    /// Static configuration for this provider (type level).
    ///
    /// Does not require an instance; used by the factory and by the
    /// certificate orchestrator before credentials exist.
    fn profile() -> &'static ProviderProfile
    where
        Self: Sized;

    /// Whether the provider can create CAA records through its API.
    ///
    /// Namecheap cannot; `set_caa_record` reports [`SetOutcome::Skipped`]
    /// there instead of pretending a create happened.
    fn supports_caa(&self) -> bool {
        true
    }

    /// Perform a live, low-cost API call to confirm the configured
    /// credentials authenticate. Default: no validation needed.
    async fn validate_credentials(&self) -> Result<bool> {
        Ok(true)
    }

    /// Persist provider credentials to the profile's well-known path for the
    /// external certificate tool's DNS-01 plugin. Default: no file needed.
    async fn setup_credentials(&self) -> Result<()> {
        Ok(())
    }

    /// Fetch all records at `name`, optionally filtered to one type.
    ///
    /// Zone-resolution failure is not an error here: it logs and yields an
    /// empty list. Transport and API failures surface as `Err`. An empty
    /// result is indistinguishable from "zone resolved, nothing there" by
    /// design; callers that must distinguish should create and observe the
    /// failure.
    async fn get_records(
        &self,
        name: &str,
        record_type: Option<RecordType>,
    ) -> Result<Vec<DnsRecord>>;

    /// Persist a new record.
    ///
    /// The caller must have ensured no conflicting record exists; the `set_*`
    /// operations below do so, direct callers are on their own.
    async fn create_record(&self, record: &DnsRecord) -> Result<()>;

    /// Remove a record by provider-assigned id, scoped to the zone derived
    /// from `name`.
    async fn delete_record(&self, record_id: &str, name: &str) -> Result<()>;

    /// Create a CAA record.
    ///
    /// Separate from [`create_record`](Self::create_record) because every
    /// supported provider needs a structurally different payload for CAA.
    async fn create_caa_record(&self, record: &CaaRecord) -> Result<()>;

    /// Idempotently set the single A record at `name` to `ip`.
    ///
    /// If an A record with the requested IP already exists the call is a
    /// no-op; otherwise every existing A record at the name is deleted and
    /// one fresh record created. There is no rollback: a failed create after
    /// a successful delete leaves the name empty, and the caller retries.
    async fn set_a_record(
        &self,
        name: &str,
        ip: &str,
        ttl: u32,
        proxied: bool,
    ) -> Result<SetOutcome> {
        let existing = self.get_records(name, Some(RecordType::A)).await?;
        if existing.iter().any(|r| r.content == ip) {
            log::info!("[{}] A record for {name} already points at {ip}", self.id());
            return Ok(SetOutcome::Unchanged);
        }

        let had_existing = !existing.is_empty();
        for record in &existing {
            if let Some(id) = &record.id {
                self.delete_record(id, name).await?;
            }
        }

        let record = DnsRecord::new(name, RecordType::A, ip)
            .with_ttl(ttl)
            .with_proxied(proxied);
        self.create_record(&record).await?;
        Ok(if had_existing {
            SetOutcome::Replaced
        } else {
            SetOutcome::Created
        })
    }

    /// Idempotently point `name` at another host.
    ///
    /// The default creates a CNAME. Adapters whose provider cannot host a
    /// CNAME next to other required records substitute a different record
    /// type (Linode resolves the target and writes an A record).
    async fn set_alias_record(
        &self,
        name: &str,
        target: &str,
        ttl: u32,
        proxied: bool,
    ) -> Result<SetOutcome> {
        self.set_cname_record(name, target, ttl, proxied).await
    }

    /// Idempotently set the single CNAME record at `name` to `target`.
    async fn set_cname_record(
        &self,
        name: &str,
        target: &str,
        ttl: u32,
        proxied: bool,
    ) -> Result<SetOutcome> {
        let existing = self.get_records(name, Some(RecordType::Cname)).await?;
        if existing.iter().any(|r| r.content == target) {
            log::info!(
                "[{}] CNAME record for {name} already targets {target}",
                self.id()
            );
            return Ok(SetOutcome::Unchanged);
        }

        let had_existing = !existing.is_empty();
        for record in &existing {
            if let Some(id) = &record.id {
                self.delete_record(id, name).await?;
            }
        }

        let record = DnsRecord::new(name, RecordType::Cname, target)
            .with_ttl(ttl)
            .with_proxied(proxied);
        self.create_record(&record).await?;
        Ok(if had_existing {
            SetOutcome::Replaced
        } else {
            SetOutcome::Created
        })
    }

    /// Idempotently set the single TXT record at `name` to `content`.
    ///
    /// Equality tolerates wire quoting: a stored `"value"` matches a
    /// requested `value`.
    async fn set_txt_record(&self, name: &str, content: &str, ttl: u32) -> Result<SetOutcome> {
        let existing = self.get_records(name, Some(RecordType::Txt)).await?;
        if existing
            .iter()
            .any(|r| txt_content_matches(&r.content, content))
        {
            log::info!("[{}] TXT record for {name} already up to date", self.id());
            return Ok(SetOutcome::Unchanged);
        }

        let had_existing = !existing.is_empty();
        for record in &existing {
            if let Some(id) = &record.id {
                self.delete_record(id, name).await?;
            }
        }

        let record = DnsRecord::new(name, RecordType::Txt, content).with_ttl(ttl);
        self.create_record(&record).await?;
        Ok(if had_existing {
            SetOutcome::Replaced
        } else {
            SetOutcome::Created
        })
    }

    /// Idempotently set the CAA record with `tag` at `name`.
    ///
    /// Conflict scanning is scoped by tag, not full content: a record with
    /// the same tag and a different value is replaced, records with other
    /// tags are left untouched so `issue`/`issuewild`/`iodef` entries
    /// coexist.
    async fn set_caa_record(
        &self,
        name: &str,
        tag: CaaTag,
        value: &str,
        flags: u8,
        ttl: u32,
    ) -> Result<SetOutcome> {
        if !self.supports_caa() {
            log::warn!(
                "[{}] provider cannot manage CAA records; skipped {tag} for {name}",
                self.id()
            );
            return Ok(SetOutcome::Skipped);
        }

        let desired = strip_quotes(value);
        let existing = self.get_records(name, Some(RecordType::Caa)).await?;

        let mut replaced = false;
        for record in &existing {
            let Some(caa) = &record.caa else {
                continue;
            };
            if caa.tag != tag {
                continue;
            }
            if strip_quotes(&caa.value) == desired {
                log::info!(
                    "[{}] CAA {tag} record for {name} already set to {desired}",
                    self.id()
                );
                return Ok(SetOutcome::Unchanged);
            }
            if let Some(id) = &record.id {
                self.delete_record(id, name).await?;
                replaced = true;
            }
        }

        let caa = CaaRecord {
            name: name.to_string(),
            flags,
            tag,
            value: value.to_string(),
            ttl,
        };
        self.create_caa_record(&caa).await?;
        Ok(if replaced {
            SetOutcome::Replaced
        } else {
            SetOutcome::Created
        })
    }
}
