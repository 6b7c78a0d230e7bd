use serde::{Deserialize, Serialize};

/// Unified error type for all DNS provider operations.
///
/// Most variants include a `provider` field identifying which provider
/// produced the error, plus variant-specific context. All variants are
/// serializable for structured error reporting.
///
/// # Failure policy
///
/// - [`MissingCredential`](Self::MissingCredential) is fatal and fires at
///   adapter construction, before any network call.
/// - [`ZoneNotFound`](Self::ZoneNotFound) is non-fatal: `get_records`
///   swallows it into an empty list, mutating operations return it.
/// - Transport and API failures surface as errors from the failing call;
///   adapters never retry automatically. The idempotent `set_*` operations
///   are safe to invoke again because of their no-op-on-match check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A required credential environment variable is absent or empty.
    MissingCredential {
        /// Provider that requires the credential.
        provider: String,
        /// Name of the missing environment variable.
        variable: String,
    },

    /// No zone owned by the credentialed account matches the requested name.
    ZoneNotFound {
        /// Provider that performed the lookup.
        provider: String,
        /// The name that could not be resolved to a zone.
        domain: String,
    },

    /// A network-level error occurred (connection refused, TLS failure, etc.).
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// Failed to parse the provider's API response (JSON or XML).
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// The remote API answered with a structured error envelope.
    ApiError {
        /// Provider that produced the error.
        provider: String,
        /// Provider-supplied error code, if any.
        #[serde(rename = "api_code")]
        code: Option<String>,
        /// Provider-supplied error message.
        message: String,
    },

    /// A record type string the model does not know.
    InvalidRecordType {
        /// Provider that returned the type.
        provider: String,
        /// The unrecognized record type string.
        record_type: String,
    },

    /// An alias target could not be resolved to an IPv4 address.
    ///
    /// Intentionally fatal on the Linode alias path: silently falling back
    /// would create an incorrect record.
    HostResolutionFailed {
        /// Provider whose alias substitution needed the address.
        provider: String,
        /// Host name that failed to resolve.
        host: String,
        /// Resolution error details.
        detail: String,
    },

    /// No provider matches the requested selector, and auto-detection found
    /// nothing in the environment.
    UnsupportedProvider {
        /// The selector that failed to resolve (empty when auto-detecting).
        selector: String,
        /// Comma-separated list of supported provider names.
        supported: String,
    },

    /// Failed to persist a credentials file for the certificate tool.
    CredentialsFile {
        /// Provider whose credentials were being written.
        provider: String,
        /// Target path.
        path: String,
        /// I/O error details.
        detail: String,
    },
}

impl ProviderError {
    /// Whether this error is an expected condition (user input, resource
    /// not present) rather than a malfunction, for log-level selection:
    /// `warn` when `true`, `error` when `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential { .. }
                | Self::ZoneNotFound { .. }
                | Self::UnsupportedProvider { .. }
        )
    }

    pub(crate) fn network(provider: &str, detail: impl ToString) -> Self {
        Self::NetworkError {
            provider: provider.to_string(),
            detail: detail.to_string(),
        }
    }

    pub(crate) fn timeout(provider: &str, detail: impl ToString) -> Self {
        Self::Timeout {
            provider: provider.to_string(),
            detail: detail.to_string(),
        }
    }

    pub(crate) fn parse(provider: &str, detail: impl ToString) -> Self {
        Self::ParseError {
            provider: provider.to_string(),
            detail: detail.to_string(),
        }
    }

    pub(crate) fn api(provider: &str, code: Option<String>, message: impl ToString) -> Self {
        Self::ApiError {
            provider: provider.to_string(),
            code,
            message: message.to_string(),
        }
    }

    pub(crate) fn zone_not_found(provider: &str, domain: &str) -> Self {
        Self::ZoneNotFound {
            provider: provider.to_string(),
            domain: domain.to_string(),
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredential { provider, variable } => {
                write!(f, "[{provider}] Missing credential: {variable} is required")
            }
            Self::ZoneNotFound { provider, domain } => {
                write!(f, "[{provider}] No zone found for '{domain}'")
            }
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::ApiError {
                provider,
                code,
                message,
            } => {
                if let Some(code) = code {
                    write!(f, "[{provider}] API error {code}: {message}")
                } else {
                    write!(f, "[{provider}] API error: {message}")
                }
            }
            Self::InvalidRecordType {
                provider,
                record_type,
            } => {
                write!(f, "[{provider}] Unsupported record type: {record_type}")
            }
            Self::HostResolutionFailed {
                provider,
                host,
                detail,
            } => {
                write!(f, "[{provider}] Could not resolve '{host}': {detail}")
            }
            Self::UnsupportedProvider {
                selector,
                supported,
            } => {
                if selector.is_empty() {
                    write!(
                        f,
                        "Could not detect DNS provider from environment; set DNS_PROVIDER to one of: {supported}"
                    )
                } else {
                    write!(
                        f,
                        "Unsupported DNS provider: {selector}. Supported providers: {supported}"
                    )
                }
            }
            Self::CredentialsFile {
                provider,
                path,
                detail,
            } => {
                write!(f, "[{provider}] Failed to write {path}: {detail}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
