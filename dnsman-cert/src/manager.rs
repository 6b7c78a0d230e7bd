//! Certificate lifecycle orchestration.
//!
//! Pure process orchestration around the external `certbot` binary: the DNS
//! work itself happens inside certbot's DNS-01 plugin, which reads the
//! credentials file written by the matching [`DnsProvider`].

use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;

use dnsman_provider::{
    detect_provider, provider_from_env, DnsProvider, ProviderKind, ProviderProfile,
};

use crate::error::{CertError, Result};

/// Wall-clock budget for one certbot invocation.
const CERTBOT_TIMEOUT_SECS: u64 = 300;
/// Budget for quick probes (plugin listing, pip installs).
const PROBE_TIMEOUT_SECS: u64 = 120;

/// High-level certificate action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertAction {
    /// Renew when a certificate exists for the domain, obtain otherwise.
    Auto,
    /// Obtain a new certificate.
    Obtain,
    /// Renew existing certificates.
    Renew,
}

/// Result of a certificate action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertOutcome {
    /// A new certificate was issued.
    Issued,
    /// An existing certificate was renewed.
    Renewed,
    /// Nothing was due for renewal; no certificate changed.
    NotDue,
}

impl CertOutcome {
    /// Whether certificate material actually changed.
    pub fn renewal_performed(self) -> bool {
        !matches!(self, Self::NotDue)
    }
}

/// Certificate management on top of a DNS provider and its certbot profile.
pub struct CertManager {
    provider: Arc<dyn DnsProvider>,
    profile: &'static ProviderProfile,
}

impl CertManager {
    /// Build a manager from an explicit provider selector or environment
    /// detection, with credentials read from the environment.
    pub fn from_env(selector: Option<&str>) -> Result<Self> {
        let kind: ProviderKind = match selector {
            Some(s) => s.parse()?,
            None => detect_provider()?,
        };
        let provider = provider_from_env(Some(kind.as_str()))?;
        Ok(Self::new(provider, kind.profile()))
    }

    pub fn new(provider: Arc<dyn DnsProvider>, profile: &'static ProviderProfile) -> Self {
        Self { provider, profile }
    }

    pub fn kind(&self) -> ProviderKind {
        self.profile.kind
    }

    fn credentials_path(&self) -> PathBuf {
        expand_tilde(self.profile.credentials_file)
    }

    async fn run(command: &str, args: &[String], timeout_secs: u64) -> Result<Output> {
        log::debug!("running: {command} {}", args.join(" "));
        let future = Command::new(command).args(args).output();
        match tokio::time::timeout(Duration::from_secs(timeout_secs), future).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(source)) => Err(CertError::Spawn {
                command: command.to_string(),
                source,
            }),
            Err(_) => Err(CertError::Timeout {
                command: command.to_string(),
                seconds: timeout_secs,
            }),
        }
    }

    /// Probe whether certbot lists the provider's DNS-01 plugin.
    pub async fn plugin_available(&self) -> bool {
        match Self::run("certbot", &["plugins".to_string()], PROBE_TIMEOUT_SECS).await {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                output.status.success() && stdout.contains(self.profile.certbot_plugin)
            }
            Err(err) => {
                log::warn!("certbot plugin probe failed: {err}");
                false
            }
        }
    }

    /// Ensure the provider's certbot plugin package is installed.
    ///
    /// Probes first; installs via pip only when the plugin is not listed.
    /// A package that installs but still fails to register is logged and
    /// tolerated, since registration quirks tend to resolve inside the
    /// actual certbot run.
    pub async fn install_plugin(&self) -> Result<()> {
        if self.plugin_available().await {
            log::info!(
                "certbot plugin {} is already available",
                self.profile.certbot_plugin
            );
            return Ok(());
        }

        let package = self.profile.certbot_package;
        log::info!("installing certbot plugin package: {package}");

        let mut installed = false;
        for pip in ["pip", "pip3"] {
            let args = vec!["install".to_string(), package.to_string()];
            match Self::run(pip, &args, PROBE_TIMEOUT_SECS).await {
                Ok(output) if output.status.success() => {
                    installed = true;
                    break;
                }
                Ok(output) => {
                    log::warn!(
                        "{pip} install failed: {}",
                        String::from_utf8_lossy(&output.stderr).trim()
                    );
                }
                Err(err) => log::warn!("{pip} unavailable: {err}"),
            }
        }
        if !installed {
            return Err(CertError::PluginInstall {
                package: package.to_string(),
            });
        }

        if !self.plugin_available().await {
            log::warn!(
                "plugin {} not listed by certbot after install; continuing",
                self.profile.certbot_plugin
            );
        }
        Ok(())
    }

    /// Install the plugin, validate credentials against the live API and
    /// write the plugin's credentials file.
    pub async fn setup(&self) -> Result<()> {
        self.install_plugin().await?;

        if !self.provider.validate_credentials().await? {
            return Err(CertError::InvalidCredentials {
                provider: self.provider.id().to_string(),
            });
        }

        self.provider.setup_credentials().await?;
        Ok(())
    }

    fn certbot_args(&self, action: &str, domain: &str, email: &str) -> Result<Vec<String>> {
        let credentials = self.credentials_path();
        if !credentials.exists() {
            return Err(CertError::MissingCredentialsFile {
                path: credentials.display().to_string(),
            });
        }
        Ok(build_certbot_args(
            action,
            self.profile.certbot_plugin,
            &credentials,
            self.profile.propagation_seconds,
            domain,
            email,
        ))
    }

    /// Obtain a new certificate for `domain`.
    pub async fn obtain(&self, domain: &str, email: &str) -> Result<CertOutcome> {
        log::info!("obtaining certificate for {domain} using {}", self.kind());
        self.setup().await?;

        let args = self.certbot_args("certonly", domain, email)?;
        let output = Self::run("certbot", &args, CERTBOT_TIMEOUT_SECS).await?;
        if output.status.success() {
            log::info!("certificate obtained for {domain}");
            return Ok(CertOutcome::Issued);
        }

        log_certbot_failure(&output);
        Err(CertError::CertbotFailed {
            action: "certonly".to_string(),
            code: output.status.code(),
        })
    }

    /// Renew existing certificates.
    pub async fn renew(&self, domain: &str) -> Result<CertOutcome> {
        log::info!("renewing certificate using {}", self.kind());
        self.install_plugin().await?;

        let args = self.certbot_args("renew", domain, "")?;
        let output = Self::run("certbot", &args, CERTBOT_TIMEOUT_SECS).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        if no_renewal_attempted(&stdout) {
            log::info!("no certificates need renewal");
            return Ok(CertOutcome::NotDue);
        }
        if output.status.success() {
            log::info!("certificate renewal completed");
            return Ok(CertOutcome::Renewed);
        }

        log_certbot_failure(&output);
        Err(CertError::CertbotFailed {
            action: "renew".to_string(),
            code: output.status.code(),
        })
    }

    /// Whether a certificate already exists for `domain`.
    pub fn certificate_exists(&self, domain: &str) -> bool {
        Path::new(&format!("/etc/letsencrypt/live/{domain}/fullchain.pem")).is_file()
    }

    /// Run a high-level action. `Auto` renews when a certificate exists and
    /// obtains otherwise.
    pub async fn run_action(
        &self,
        action: CertAction,
        domain: &str,
        email: &str,
    ) -> Result<CertOutcome> {
        match action {
            CertAction::Obtain => self.obtain(domain, email).await,
            CertAction::Renew => self.renew(domain).await,
            CertAction::Auto => {
                if self.certificate_exists(domain) {
                    self.renew(domain).await
                } else {
                    self.obtain(domain, email).await
                }
            }
        }
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    path.strip_prefix("~/")
        .and_then(|rest| dirs::home_dir().map(|home| home.join(rest)))
        .unwrap_or_else(|| PathBuf::from(path))
}

/// Assemble the certbot argument vector for one action.
fn build_certbot_args(
    action: &str,
    plugin: &str,
    credentials: &Path,
    propagation_seconds: u64,
    domain: &str,
    email: &str,
) -> Vec<String> {
    let mut args = vec![
        action.to_string(),
        "-a".to_string(),
        plugin.to_string(),
        "--non-interactive".to_string(),
        "-v".to_string(),
        format!("--{plugin}-credentials={}", credentials.display()),
    ];
    if action == "certonly" {
        args.extend([
            "--agree-tos".to_string(),
            "--no-eff-email".to_string(),
            "--email".to_string(),
            email.to_string(),
            "-d".to_string(),
            domain.to_string(),
        ]);
    }
    args.push(format!("--{plugin}-propagation-seconds={propagation_seconds}"));
    args
}

fn no_renewal_attempted(stdout: &str) -> bool {
    stdout.contains("No renewals were attempted")
}

fn log_certbot_failure(output: &Output) {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    if stderr.contains("unrecognized arguments") {
        log::error!("plugin arguments not recognized; the plugin is not properly registered");
    } else if stderr.contains("DNS problem") || stdout.contains("DNS problem") {
        log::error!("DNS validation failed; check domain configuration");
    } else if stderr.contains("Rate limited") || stdout.contains("Rate limited") {
        log::error!("rate limited by the certificate authority");
    }

    if !stderr.trim().is_empty() {
        log::error!("certbot stderr: {}", stderr.trim());
    }
    if !stdout.trim().is_empty() {
        log::debug!("certbot stdout: {}", stdout.trim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certonly_args_include_identity_and_propagation() {
        let args = build_certbot_args(
            "certonly",
            "dns-cloudflare",
            Path::new("/home/user/.cloudflare/cloudflare.ini"),
            120,
            "example.com",
            "admin@example.com",
        );
        assert_eq!(args[0], "certonly");
        assert!(args.contains(&"-a".to_string()));
        assert!(args.contains(&"dns-cloudflare".to_string()));
        assert!(args
            .contains(&"--dns-cloudflare-credentials=/home/user/.cloudflare/cloudflare.ini".to_string()));
        assert!(args.contains(&"--agree-tos".to_string()));
        assert!(args.contains(&"-d".to_string()));
        assert!(args.contains(&"example.com".to_string()));
        assert!(args.contains(&"--dns-cloudflare-propagation-seconds=120".to_string()));
    }

    #[test]
    fn renew_args_omit_enrollment_flags() {
        let args = build_certbot_args(
            "renew",
            "dns-linode",
            Path::new("/home/user/.linode/credentials.ini"),
            300,
            "example.com",
            "",
        );
        assert_eq!(args[0], "renew");
        assert!(!args.contains(&"--agree-tos".to_string()));
        assert!(!args.contains(&"-d".to_string()));
        assert!(args.contains(&"--dns-linode-propagation-seconds=300".to_string()));
    }

    #[test]
    fn propagation_flag_follows_the_active_plugin() {
        let args = build_certbot_args(
            "renew",
            "dns-namecheap",
            Path::new("/tmp/namecheap.ini"),
            120,
            "",
            "",
        );
        assert!(args.contains(&"--dns-namecheap-propagation-seconds=120".to_string()));
        assert!(!args.iter().any(|a| a.contains("dns-cloudflare")));
    }

    #[test]
    fn no_renewal_detection() {
        assert!(no_renewal_attempted(
            "Processing /etc/letsencrypt/renewal/example.com.conf\nNo renewals were attempted."
        ));
        assert!(!no_renewal_attempted("Congratulations, all renewals succeeded"));
    }

    #[test]
    fn outcome_renewal_performed() {
        assert!(CertOutcome::Issued.renewal_performed());
        assert!(CertOutcome::Renewed.renewal_performed());
        assert!(!CertOutcome::NotDue.renewal_performed());
    }
}
