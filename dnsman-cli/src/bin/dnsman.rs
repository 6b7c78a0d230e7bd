//! Manage DNS records across multiple providers from the command line.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use dnsman_provider::{provider_from_env, DnsProvider, SetOutcome, DEFAULT_TTL};

#[derive(Parser)]
#[command(
    name = "dnsman",
    version,
    about = "Manage DNS records across multiple DNS providers"
)]
struct Cli {
    /// DNS provider (cloudflare, linode, namecheap); auto-detected from the
    /// environment when omitted
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Record TTL in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TTL)]
    ttl: u32,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Set a CNAME record for a domain
    SetCname {
        /// Record name (FQDN)
        #[arg(long)]
        domain: String,
        /// Alias target host
        #[arg(long)]
        content: String,
    },
    /// Point a domain at another host (CNAME, or a provider-specific substitute)
    SetAlias {
        /// Record name (FQDN)
        #[arg(long)]
        domain: String,
        /// Alias target host
        #[arg(long)]
        content: String,
    },
    /// Set a TXT record for a domain
    SetTxt {
        /// Record name (FQDN)
        #[arg(long)]
        domain: String,
        /// TXT payload
        #[arg(long)]
        content: String,
    },
    /// Set a CAA record for a domain
    SetCaa {
        /// Record name (FQDN)
        #[arg(long)]
        domain: String,
        /// CAA property tag
        #[arg(long = "caa-tag", value_parser = ["issue", "issuewild", "iodef"])]
        tag: String,
        /// CAA value (CA domain or reporting URI)
        #[arg(long = "caa-value")]
        value: String,
        /// CAA flags
        #[arg(long, default_value_t = 0)]
        flags: u8,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let provider = provider_from_env(cli.provider.as_deref()).map_err(|e| e.to_string())?;
    let ttl = cli.ttl;

    let (label, domain, outcome) = match cli.action {
        // set-cname routes through the alias logic too, so providers that
        // must substitute another record type behave consistently.
        Action::SetCname { domain, content } | Action::SetAlias { domain, content } => {
            let outcome = provider
                .set_alias_record(&domain, &content, ttl, false)
                .await
                .map_err(|e| e.to_string())?;
            ("alias", domain, outcome)
        }
        Action::SetTxt { domain, content } => {
            let outcome = provider
                .set_txt_record(&domain, &content, ttl)
                .await
                .map_err(|e| e.to_string())?;
            ("TXT", domain, outcome)
        }
        Action::SetCaa {
            domain,
            tag,
            value,
            flags,
        } => {
            let tag = tag.parse().map_err(|e: String| e)?;
            let outcome = provider
                .set_caa_record(&domain, tag, &value, flags, ttl)
                .await
                .map_err(|e| e.to_string())?;
            ("CAA", domain, outcome)
        }
    };

    match outcome {
        SetOutcome::Unchanged => println!("{label} record for {domain} already up to date"),
        SetOutcome::Skipped => {
            println!("{label} record for {domain} skipped (unsupported by provider)");
        }
        _ => println!("Successfully set {label} record for {domain}"),
    }
    Ok(())
}
