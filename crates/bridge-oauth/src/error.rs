//! Error types for the OAuth 1.0 provider.

/// RSA key decoding/parsing error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum KeyError {
    /// Key body is empty after stripping the PEM envelope.
    #[error("key is empty")]
    Empty,

    /// Key body is not valid base64.
    #[error("invalid base64 in key")]
    Base64(#[from] base64::DecodeError),

    /// SPKI/PKCS#1 public key parsing error (returned when both formats fail).
    #[error("invalid RSA public key")]
    PublicKey(#[source] rsa::pkcs8::spki::Error),

    /// PKCS#8/PKCS#1 private key parsing error (returned when both formats fail).
    #[error("invalid RSA private key")]
    PrivateKey(#[source] rsa::pkcs8::Error),
}

/// Error from OAuth 1.0 protocol operations.
#[derive(Debug, thiserror::Error)]
pub enum OAuth1Error {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request to {url} failed")]
    Transport {
        /// Request URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: ureq::Error,
    },

    /// Remote service rejected an OAuth step.
    #[error("{operation} failed ({status}): {body}")]
    Rejected {
        /// Protocol step (e.g. "Request token").
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body (may contain `oauth_problem`).
        body: String,
    },

    /// Remote service answered without a required parameter.
    #[error("{operation} response missing parameter: {parameter}")]
    MissingParameter {
        /// Protocol step (e.g. "Request token").
        operation: &'static str,
        /// Missing parameter name.
        parameter: &'static str,
    },

    /// Response body could not be read.
    #[error("failed to read response from {url}")]
    Body {
        /// Request URL.
        url: String,
        /// Underlying read error.
        #[source]
        source: ureq::Error,
    },

    /// Private key could not be parsed.
    #[error("RSA key error")]
    Key(#[from] KeyError),

    /// Request URL is not an absolute http(s) URL.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

impl OAuth1Error {
    /// Whether the error was caused by the request timeout expiring.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                source: ureq::Error::Timeout(_),
                ..
            } | Self::Body {
                source: ureq::Error::Timeout(_),
                ..
            }
        )
    }
}
