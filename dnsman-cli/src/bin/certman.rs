//! Manage TLS certificates with certbot using DNS providers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use dnsman_cert::{CertAction, CertManager, CertOutcome};

/// Exit code signalling success with no renewal performed, so callers can
/// skip downstream steps that only matter when certificate material changed.
const EXIT_NO_RENEWAL: u8 = 2;

#[derive(Parser)]
#[command(
    name = "certman",
    version,
    about = "Manage TLS certificates with certbot using DNS providers"
)]
struct Cli {
    /// DNS provider (cloudflare, linode, namecheap); auto-detected from the
    /// environment when omitted
    #[arg(long, global = true)]
    provider: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Obtain a new certificate
    Obtain {
        /// Domain name
        #[arg(long)]
        domain: String,
        /// Email for certificate authority registration
        #[arg(long, env = "CERTBOT_EMAIL")]
        email: String,
    },
    /// Renew existing certificates
    Renew {
        /// Domain name
        #[arg(long)]
        domain: String,
    },
    /// Renew when a certificate exists, obtain otherwise
    Auto {
        /// Domain name
        #[arg(long)]
        domain: String,
        /// Email for certificate authority registration
        #[arg(long, env = "CERTBOT_EMAIL")]
        email: String,
    },
    /// Install the certbot plugin and write the credentials file
    Setup,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let manager = match CertManager::from_env(cli.provider.as_deref()) {
        Ok(manager) => manager,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.action {
        Action::Setup => {
            return match manager.setup().await {
                Ok(()) => {
                    println!("Setup completed for {} provider", manager.kind());
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("Error: {err}");
                    ExitCode::FAILURE
                }
            };
        }
        Action::Obtain { domain, email } => {
            manager.run_action(CertAction::Obtain, &domain, &email).await
        }
        Action::Renew { domain } => manager.run_action(CertAction::Renew, &domain, "").await,
        Action::Auto { domain, email } => {
            manager.run_action(CertAction::Auto, &domain, &email).await
        }
    };

    match result {
        Ok(CertOutcome::NotDue) => {
            println!("No certificates need renewal");
            ExitCode::from(EXIT_NO_RENEWAL)
        }
        Ok(CertOutcome::Issued) => {
            println!("Certificate obtained successfully");
            ExitCode::SUCCESS
        }
        Ok(CertOutcome::Renewed) => {
            println!("Certificate renewal completed");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
