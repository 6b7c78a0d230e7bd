//! Shared test helpers.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use dnsman_provider::{
    CaaData, CaaRecord, DnsProvider, DnsRecord, ProviderError, ProviderKind, ProviderProfile,
    RecordType, Result,
};

/// Skip a live test when credentials are not configured.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping test: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Assert a `Result` is `Ok` and unwrap it, failing the test otherwise.
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got Err");
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Generate a unique test record name.
pub fn generate_test_record_name(zone: &str) -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}.{zone}", &uuid.to_string()[..8])
}

/// In-memory provider implementing only the four record primitives, so the
/// shared reconciliation operations can be exercised against simulated
/// provider state. Counts mutations to verify no-op short circuits.
pub struct MockProvider {
    /// Zone the mock account owns; names outside it fail resolution.
    pub zone: String,
    pub records: Mutex<Vec<DnsRecord>>,
    pub caa_supported: bool,
    next_id: AtomicU64,
    pub creates: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl MockProvider {
    pub fn new(zone: &str) -> Self {
        Self {
            zone: zone.to_string(),
            records: Mutex::new(Vec::new()),
            caa_supported: true,
            next_id: AtomicU64::new(1),
            creates: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn without_caa(zone: &str) -> Self {
        Self {
            caa_supported: false,
            ..Self::new(zone)
        }
    }

    /// Seed a pre-existing record, bypassing the mutation counters.
    pub fn seed(&self, mut record: DnsRecord) {
        record.id = Some(self.next_id.fetch_add(1, Ordering::SeqCst).to_string());
        self.records.lock().unwrap().push(record);
    }

    pub fn mutation_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst) + self.deletes.load(Ordering::SeqCst)
    }

    fn in_zone(&self, name: &str) -> bool {
        name == self.zone || name.ends_with(&format!(".{}", self.zone))
    }
}

#[async_trait]
impl DnsProvider for MockProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    fn profile() -> &'static ProviderProfile {
        // The mock never drives the certificate tool; any profile satisfies
        // the contract.
        ProviderKind::Cloudflare.profile()
    }

    fn supports_caa(&self) -> bool {
        self.caa_supported
    }

    async fn get_records(
        &self,
        name: &str,
        record_type: Option<RecordType>,
    ) -> Result<Vec<DnsRecord>> {
        if !self.in_zone(name) {
            return Ok(Vec::new());
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.name == name)
            .filter(|r| record_type.is_none_or(|t| r.record_type == t))
            .cloned()
            .collect())
    }

    async fn create_record(&self, record: &DnsRecord) -> Result<()> {
        if !self.in_zone(&record.name) {
            return Err(ProviderError::ZoneNotFound {
                provider: "mock".to_string(),
                domain: record.name.clone(),
            });
        }
        let mut stored = record.clone();
        stored.id = Some(self.next_id.fetch_add(1, Ordering::SeqCst).to_string());
        self.records.lock().unwrap().push(stored);
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_record(&self, record_id: &str, _name: &str) -> Result<()> {
        self.records
            .lock()
            .unwrap()
            .retain(|r| r.id.as_deref() != Some(record_id));
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn create_caa_record(&self, record: &CaaRecord) -> Result<()> {
        if !self.in_zone(&record.name) {
            return Err(ProviderError::ZoneNotFound {
                provider: "mock".to_string(),
                domain: record.name.clone(),
            });
        }
        let mut stored = DnsRecord::new(
            record.name.as_str(),
            RecordType::Caa,
            format!("{} {} {}", record.flags, record.tag, record.value),
        )
        .with_ttl(record.ttl);
        stored.caa = Some(CaaData {
            flags: record.flags,
            tag: record.tag,
            value: record.value.clone(),
        });
        stored.id = Some(self.next_id.fetch_add(1, Ordering::SeqCst).to_string());
        self.records.lock().unwrap().push(stored);
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
