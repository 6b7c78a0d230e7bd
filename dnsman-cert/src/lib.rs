//! # dnsman-cert
//!
//! Certificate lifecycle orchestration on top of [`dnsman_provider`]: picks
//! the certbot DNS-01 plugin matching the detected DNS provider, installs it
//! when missing, writes the plugin's credentials file and drives
//! `certbot certonly` / `certbot renew` as external processes under a
//! wall-clock timeout.
//!
//! ```rust,no_run
//! use dnsman_cert::{CertAction, CertManager, CertOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = CertManager::from_env(None)?;
//!     let outcome = manager
//!         .run_action(CertAction::Auto, "example.com", "admin@example.com")
//!         .await?;
//!     if outcome == CertOutcome::NotDue {
//!         println!("nothing to renew");
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod manager;

pub use error::{CertError, Result};
pub use manager::{CertAction, CertManager, CertOutcome};
