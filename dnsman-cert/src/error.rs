use dnsman_provider::ProviderError;
use thiserror::Error;

/// Errors from certificate orchestration.
#[derive(Debug, Error)]
pub enum CertError {
    /// A DNS provider operation failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider's credentials did not validate against the live API.
    #[error("credential validation failed for {provider}")]
    InvalidCredentials { provider: String },

    /// An external command could not be spawned.
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// An external command exceeded its wall-clock budget.
    #[error("{command} timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    /// Certbot exited unsuccessfully.
    #[error("certbot {action} failed (exit code {code:?})")]
    CertbotFailed { action: String, code: Option<i32> },

    /// The certbot plugin could not be installed.
    #[error("failed to install certbot plugin package {package}")]
    PluginInstall { package: String },

    /// The plugin's credentials file is missing; run setup first.
    #[error("credentials file does not exist: {path}")]
    MissingCredentialsFile { path: String },
}

/// Convenience type alias for `Result<T, CertError>`.
pub type Result<T> = std::result::Result<T, CertError>;
