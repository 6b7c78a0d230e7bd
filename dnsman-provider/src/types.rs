use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Default TTL (seconds) applied when a caller does not specify one.
pub const DEFAULT_TTL: u32 = 60;

// ============ Record Types ============

/// DNS record type identifier.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Text record.
    Txt,
    /// Mail exchange record.
    Mx,
    /// Name server record.
    Ns,
    /// Certificate Authority Authorization record.
    Caa,
    /// Service locator record.
    Srv,
    /// Pointer (reverse lookup) record.
    Ptr,
}

impl RecordType {
    /// Returns the uppercase wire representation of this record type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Txt => "TXT",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Caa => "CAA",
            Self::Srv => "SRV",
            Self::Ptr => "PTR",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CAA property tag.
///
/// Uniqueness of CAA records at a name is evaluated per tag: entries with
/// distinct tags coexist, entries with the same tag conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaaTag {
    /// Authorize a CA to issue certificates for the name.
    Issue,
    /// Authorize a CA to issue wildcard certificates.
    Issuewild,
    /// Report policy violations to the given URI.
    Iodef,
}

impl CaaTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::Issuewild => "issuewild",
            Self::Iodef => "iodef",
        }
    }
}

impl fmt::Display for CaaTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaaTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "issue" => Ok(Self::Issue),
            "issuewild" => Ok(Self::Issuewild),
            "iodef" => Ok(Self::Iodef),
            other => Err(format!("unknown CAA tag: {other}")),
        }
    }
}

/// Structured CAA payload carried alongside a generic [`DnsRecord`] when a
/// provider's native representation splits tag/value out of `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaaData {
    /// Issuer critical flag (0 where the provider does not support flags).
    pub flags: u8,
    /// Property tag.
    pub tag: CaaTag,
    /// CA domain or reporting URI.
    pub value: String,
}

// ============ Records ============

/// A generic DNS resource record.
///
/// `id` is `None` exactly until the record has been persisted by a provider
/// call. Which optional fields are meaningful depends on `record_type`:
/// `priority` for MX, `caa` for CAA.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned record identifier, absent until created.
    pub id: Option<String>,
    /// Fully-qualified record name.
    pub name: String,
    /// Record type.
    pub record_type: RecordType,
    /// Record value: IP address, target host, TXT payload, etc.
    pub content: String,
    /// Time to live in seconds.
    pub ttl: u32,
    /// Whether the provider's reverse proxy is enabled (Cloudflare only).
    pub proxied: bool,
    /// MX-style ordering priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    /// Structured CAA data when the provider splits it out of `content`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caa: Option<CaaData>,
}

impl DnsRecord {
    /// Create an unpersisted record with default TTL and flags.
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            record_type,
            content: content.into(),
            ttl: DEFAULT_TTL,
            proxied: false,
            priority: None,
            caa: None,
        }
    }

    /// Set the TTL.
    #[must_use]
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the proxied flag.
    #[must_use]
    pub fn with_proxied(mut self, proxied: bool) -> Self {
        self.proxied = proxied;
        self
    }
}

/// A Certificate Authority Authorization record.
///
/// Kept distinct from [`DnsRecord`] because every supported provider's wire
/// format for CAA diverges: Cloudflare nests `{flags, tag, value}`, Linode
/// splits tag/target fields, Namecheap packs `"flags tag value"` into one
/// address string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaaRecord {
    /// Fully-qualified record name.
    pub name: String,
    /// Issuer critical flag (0 where unsupported).
    pub flags: u8,
    /// Property tag.
    pub tag: CaaTag,
    /// CA domain or reporting URI.
    pub value: String,
    /// Time to live in seconds.
    pub ttl: u32,
}

impl CaaRecord {
    pub fn new(name: impl Into<String>, tag: CaaTag, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: 0,
            tag,
            value: value.into(),
            ttl: DEFAULT_TTL,
        }
    }
}

/// Result of an idempotent `set_*` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetOutcome {
    /// No record of the type existed; one was created.
    Created,
    /// Conflicting records were deleted and a fresh record created.
    Replaced,
    /// The desired record already existed; nothing was mutated.
    Unchanged,
    /// The provider cannot perform the operation; it was skipped without
    /// touching remote state (Namecheap CAA).
    Skipped,
}

impl SetOutcome {
    /// Whether the operation mutated remote state.
    pub fn changed(self) -> bool {
        matches!(self, Self::Created | Self::Replaced)
    }
}

// ============ Provider Selection ============

/// Identifies which DNS provider implementation to use.
///
/// Each variant is gated behind its corresponding feature flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Cloudflare DNS. Requires feature `cloudflare`.
    #[cfg(feature = "cloudflare")]
    Cloudflare,
    /// Linode DNS. Requires feature `linode`.
    #[cfg(feature = "linode")]
    Linode,
    /// Namecheap DNS. Requires feature `namecheap`.
    #[cfg(feature = "namecheap")]
    Namecheap,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            #[cfg(feature = "cloudflare")]
            Self::Cloudflare => "cloudflare",
            #[cfg(feature = "linode")]
            Self::Linode => "linode",
            #[cfg(feature = "namecheap")]
            Self::Namecheap => "namecheap",
        }
    }

    /// Static configuration for this provider.
    pub fn profile(self) -> &'static ProviderProfile {
        match self {
            #[cfg(feature = "cloudflare")]
            Self::Cloudflare => &CLOUDFLARE_PROFILE,
            #[cfg(feature = "linode")]
            Self::Linode => &LINODE_PROFILE,
            #[cfg(feature = "namecheap")]
            Self::Namecheap => &NAMECHEAP_PROFILE,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            #[cfg(feature = "cloudflare")]
            "cloudflare" => Ok(Self::Cloudflare),
            #[cfg(feature = "linode")]
            "linode" => Ok(Self::Linode),
            #[cfg(feature = "namecheap")]
            "namecheap" => Ok(Self::Namecheap),
            other => Err(ProviderError::UnsupportedProvider {
                selector: other.to_string(),
                supported: crate::factory::supported_providers().join(", "),
            }),
        }
    }
}

/// Static configuration record for a provider: how it is auto-detected and
/// how the external certificate tool's DNS-01 plugin is wired to it.
///
/// Consulted by the factory (detection) and by the certificate orchestrator
/// (plugin name, package, propagation delay, credentials-file path).
#[derive(Debug, Clone, Copy)]
pub struct ProviderProfile {
    /// Provider this profile describes.
    pub kind: ProviderKind,
    /// Environment variable whose presence marks the provider as suitable.
    pub detect_env: &'static str,
    /// Certbot authenticator plugin name.
    pub certbot_plugin: &'static str,
    /// Pip package providing the plugin.
    pub certbot_package: &'static str,
    /// Seconds to wait for DNS propagation during a DNS-01 challenge.
    pub propagation_seconds: u64,
    /// Credentials file consumed by the plugin, `~`-relative.
    pub credentials_file: &'static str,
}

impl ProviderProfile {
    /// True iff this provider's detection environment variable is present.
    pub fn is_suitable(&self) -> bool {
        env::var_os(self.detect_env).is_some()
    }
}

#[cfg(feature = "cloudflare")]
pub(crate) static CLOUDFLARE_PROFILE: ProviderProfile = ProviderProfile {
    kind: ProviderKind::Cloudflare,
    detect_env: "CLOUDFLARE_API_TOKEN",
    certbot_plugin: "dns-cloudflare",
    certbot_package: "certbot-dns-cloudflare==4.0.0",
    propagation_seconds: 120,
    credentials_file: "~/.cloudflare/cloudflare.ini",
};

#[cfg(feature = "linode")]
pub(crate) static LINODE_PROFILE: ProviderProfile = ProviderProfile {
    kind: ProviderKind::Linode,
    detect_env: "LINODE_API_TOKEN",
    certbot_plugin: "dns-linode",
    certbot_package: "certbot-dns-linode",
    propagation_seconds: 300,
    credentials_file: "~/.linode/credentials.ini",
};

#[cfg(feature = "namecheap")]
pub(crate) static NAMECHEAP_PROFILE: ProviderProfile = ProviderProfile {
    kind: ProviderKind::Namecheap,
    detect_env: "NAMECHEAP_API_KEY",
    certbot_plugin: "dns-namecheap",
    certbot_package: "certbot-dns-namecheap==1.0.0",
    propagation_seconds: 120,
    credentials_file: "~/.namecheap/namecheap.ini",
};

/// Ordered detection table; the factory scans it front to back.
pub static PROFILES: &[&ProviderProfile] = &[
    #[cfg(feature = "cloudflare")]
    &CLOUDFLARE_PROFILE,
    #[cfg(feature = "linode")]
    &LINODE_PROFILE,
    #[cfg(feature = "namecheap")]
    &NAMECHEAP_PROFILE,
];

// ============ Credentials ============

/// Type-safe credential container for all supported DNS providers.
///
/// Pass this to [`create_provider()`](crate::create_provider) to instantiate
/// a provider, or build it from the process environment with
/// [`from_env()`](Self::from_env).
#[derive(Debug, Clone)]
pub enum ProviderCredentials {
    /// Cloudflare credentials. Requires feature `cloudflare`.
    #[cfg(feature = "cloudflare")]
    Cloudflare {
        /// Cloudflare API token.
        api_token: String,
    },

    /// Linode credentials. Requires feature `linode`.
    #[cfg(feature = "linode")]
    Linode {
        /// Linode personal access token.
        api_token: String,
    },

    /// Namecheap credentials. Requires feature `namecheap`.
    #[cfg(feature = "namecheap")]
    Namecheap {
        /// Account user name (doubles as `ApiUser` and `UserName`).
        username: String,
        /// API key.
        api_key: String,
        /// Whitelisted client IP reported to the API.
        client_ip: String,
        /// Use the sandbox endpoint.
        sandbox: bool,
    },
}

impl ProviderCredentials {
    /// Read the credentials for `kind` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingCredential`] when a required variable
    /// is absent or empty. This is the fatal configuration error: it fires at
    /// construction time, before any network call.
    pub fn from_env(kind: ProviderKind) -> Result<Self, ProviderError> {
        match kind {
            #[cfg(feature = "cloudflare")]
            ProviderKind::Cloudflare => Ok(Self::Cloudflare {
                api_token: required_env(kind, "CLOUDFLARE_API_TOKEN")?,
            }),
            #[cfg(feature = "linode")]
            ProviderKind::Linode => Ok(Self::Linode {
                api_token: required_env(kind, "LINODE_API_TOKEN")?,
            }),
            #[cfg(feature = "namecheap")]
            ProviderKind::Namecheap => Ok(Self::Namecheap {
                username: required_env(kind, "NAMECHEAP_USERNAME")?,
                api_key: required_env(kind, "NAMECHEAP_API_KEY")?,
                client_ip: env::var("NAMECHEAP_CLIENT_IP")
                    .unwrap_or_else(|_| "127.0.0.1".to_string()),
                sandbox: env::var("NAMECHEAP_SANDBOX")
                    .map(|v| v.eq_ignore_ascii_case("true"))
                    .unwrap_or(false),
            }),
        }
    }

    /// Returns the [`ProviderKind`] corresponding to this credential variant.
    pub fn kind(&self) -> ProviderKind {
        match self {
            #[cfg(feature = "cloudflare")]
            Self::Cloudflare { .. } => ProviderKind::Cloudflare,
            #[cfg(feature = "linode")]
            Self::Linode { .. } => ProviderKind::Linode,
            #[cfg(feature = "namecheap")]
            Self::Namecheap { .. } => ProviderKind::Namecheap,
        }
    }
}

fn required_env(kind: ProviderKind, variable: &'static str) -> Result<String, ProviderError> {
    match env::var(variable) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ProviderError::MissingCredential {
            provider: kind.as_str().to_string(),
            variable: variable.to_string(),
        }),
    }
}

// ============ Zone Handle ============

/// A resolved provider-side zone: opaque identifier plus the canonical zone
/// name it was resolved from.
///
/// Cached per adapter instance, one entry at a time. A later name covered by
/// the cached zone's suffix reuses it; any other name forces re-resolution
/// which overwrites the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneHandle {
    /// Provider-specific zone/domain identifier.
    pub id: String,
    /// Canonical zone name (e.g. `"example.com"`).
    pub name: String,
}

impl ZoneHandle {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// True iff `fqdn` equals the zone name or is a subdomain of it.
    pub fn covers(&self, fqdn: &str) -> bool {
        fqdn == self.name || fqdn.ends_with(&format!(".{}", self.name))
    }
}
