//! Authorization error types.

use bridge_config::ConfigError;
use bridge_oauth::OAuth1Error;
use bridge_store::StoreError;

use crate::keys::KeyValidationError;

/// Error raised by [`AuthorizationManager`](crate::AuthorizationManager).
#[derive(Debug, thiserror::Error)]
pub enum AuthorizationError {
    /// Application lookup or certificate directory failure.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A key file exists but does not hold a valid RSA key.
    #[error(transparent)]
    KeyValidation(#[from] KeyValidationError),

    /// The application private key is not provisioned.
    #[error("Private key {filename} is not available")]
    PrivateKeyUnavailable { filename: String },

    /// Signing or token exchange failure.
    #[error("OAuth 1.0 error: {0}")]
    OAuth1(#[from] OAuth1Error),

    /// Service URL is not an absolute http(s) URL.
    #[error("Invalid service URL: {url}")]
    InvalidServiceUrl { url: String },

    /// No pending authorization carries the temporary token.
    #[error("No authorization in progress for temporary token {token}")]
    TokenNotFound { token: String },

    /// Stored payload is not a valid authorization state.
    #[error("Stored authorization data is invalid")]
    InvalidStateData(#[source] serde_json::Error),

    /// Authorization store failure.
    #[error("Authorization store error: {0}")]
    Store(#[from] StoreError),
}

/// Coarse error category for callers mapping errors to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthorizationErrorKind {
    UnknownApplication,
    CertificateDirectoryNotFound,
    Configuration,
    KeyValidation,
    PrivateKeyUnavailable,
    OAuth1,
    Timeout,
    InvalidServiceUrl,
    TokenNotFound,
    InvalidStateData,
    Store,
}

impl AuthorizationError {
    /// Error category.
    #[must_use]
    pub fn kind(&self) -> AuthorizationErrorKind {
        match self {
            Self::Config(ConfigError::UnknownApplication(_)) => {
                AuthorizationErrorKind::UnknownApplication
            }
            Self::Config(ConfigError::CertificateDirectoryNotFound(_)) => {
                AuthorizationErrorKind::CertificateDirectoryNotFound
            }
            Self::Config(_) => AuthorizationErrorKind::Configuration,
            Self::KeyValidation(_) => AuthorizationErrorKind::KeyValidation,
            Self::PrivateKeyUnavailable { .. } => AuthorizationErrorKind::PrivateKeyUnavailable,
            Self::OAuth1(e) if e.is_timeout() => AuthorizationErrorKind::Timeout,
            Self::OAuth1(_) => AuthorizationErrorKind::OAuth1,
            Self::InvalidServiceUrl { .. } => AuthorizationErrorKind::InvalidServiceUrl,
            Self::TokenNotFound { .. } => AuthorizationErrorKind::TokenNotFound,
            Self::InvalidStateData(_) => AuthorizationErrorKind::InvalidStateData,
            Self::Store(_) => AuthorizationErrorKind::Store,
        }
    }

    /// Operator-facing hint for resolving the error.
    #[must_use]
    pub fn remediation(&self) -> &'static str {
        match self.kind() {
            AuthorizationErrorKind::UnknownApplication => {
                "Register the integration type under [applications] in bridge.toml"
            }
            AuthorizationErrorKind::CertificateDirectoryNotFound => {
                "Make sure the certificate directory was provisioned and bridge.certs_dir points to it"
            }
            AuthorizationErrorKind::Configuration => "Check the configuration file",
            AuthorizationErrorKind::KeyValidation => {
                "Regenerate the application key pair and update the key files"
            }
            AuthorizationErrorKind::PrivateKeyUnavailable => {
                "Make sure the application private key file exists and is readable"
            }
            AuthorizationErrorKind::Timeout => {
                "The tracker did not answer in time; retry or raise oauth.timeout_secs"
            }
            AuthorizationErrorKind::OAuth1 => {
                "Check that the application link on the tracker uses the same consumer key and public key"
            }
            AuthorizationErrorKind::InvalidServiceUrl => {
                "Use an absolute http(s) URL for the tracker"
            }
            AuthorizationErrorKind::TokenNotFound => {
                "Start the authorization again; the temporary token is unknown or was already used"
            }
            AuthorizationErrorKind::InvalidStateData => {
                "Start the authorization again to replace the stored record"
            }
            AuthorizationErrorKind::Store => "Check the authorization store path and permissions",
        }
    }
}
