//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

#[cfg(feature = "cloudflare")]
mod cloudflare;
#[cfg(feature = "linode")]
mod linode;
#[cfg(feature = "namecheap")]
mod namecheap;

#[cfg(feature = "cloudflare")]
pub use cloudflare::CloudflareProvider;
#[cfg(feature = "linode")]
pub use linode::LinodeProvider;
#[cfg(feature = "namecheap")]
pub use namecheap::NamecheapProvider;
