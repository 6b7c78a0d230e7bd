//! # dnsman-provider
//!
//! A unified DNS provider abstraction for managing records across multiple
//! registrars and cloud platforms, built around an idempotent
//! record-reconciliation engine.
//!
//! ## Supported Providers
//!
//! | Provider | Feature Flag | Dialect | Auth |
//! |----------|--------------|---------|------|
//! | [Cloudflare](https://www.cloudflare.com/) | `cloudflare` | JSON REST | Bearer token |
//! | [Linode](https://www.linode.com/products/dns-manager/) | `linode` | JSON REST | Bearer token |
//! | [Namecheap](https://www.namecheap.com/) | `namecheap` | XML over form POST | API key |
//!
//! ## Feature Flags
//!
//! - **`all-providers`** *(default)* — enable every provider listed above,
//!   or pick individual `cloudflare` / `linode` / `namecheap` features.
//! - **`native-tls`** *(default)* / **`rustls`** — TLS backend selection.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dnsman_provider::{provider_from_env, DnsProvider, SetOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Resolve the provider from DNS_PROVIDER or the credential
//!     // environment variables, then converge one record.
//!     let provider = provider_from_env(None)?;
//!     let outcome = provider
//!         .set_a_record("www.example.com", "192.0.2.1", 60, false)
//!         .await?;
//!     if outcome == SetOutcome::Unchanged {
//!         println!("already up to date");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Reconciliation model
//!
//! The `set_*` family converges to exactly one desired record per
//! (name, type) — or per (name, tag) for CAA — via inspect, delete-stale,
//! create-new, with a no-op short circuit when the desired state already
//! exists. Operations are safe to re-invoke after a failure, but are not
//! protected against concurrent invocations from multiple processes.
//!
//! ## Error Handling
//!
//! Operations return [`Result<T, ProviderError>`](ProviderError). A missing
//! credential fails at construction; an unresolvable zone surfaces as an
//! empty list from reads and [`ProviderError::ZoneNotFound`] from writes;
//! transport and API failures are never retried automatically.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::{create_provider, detect_provider, provider_from_env, supported_providers};

// Re-export core trait
pub use traits::DnsProvider;

// Re-export types
pub use types::{
    CaaData, CaaRecord, CaaTag, DnsRecord, ProviderCredentials, ProviderKind, ProviderProfile,
    RecordType, SetOutcome, ZoneHandle, DEFAULT_TTL, PROFILES,
};

// Re-export concrete providers (behind feature flags)
#[cfg(feature = "cloudflare")]
pub use providers::CloudflareProvider;

#[cfg(feature = "linode")]
pub use providers::LinodeProvider;

#[cfg(feature = "namecheap")]
pub use providers::NamecheapProvider;
