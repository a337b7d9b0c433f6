//! Signing provider abstraction.
//!
//! A provider is bound to one signing identity and one tracker host. The
//! [`OAuth1ProviderFactory`] hands out a fresh provider for every call so no
//! configuration is shared between concurrent requests.

use std::fmt;

use crate::error::OAuth1Error;

/// Signing identity and target host for a provider.
#[derive(Clone)]
pub struct ProviderConfig {
    /// OAuth consumer key registered with the tracker.
    pub consumer_key: String,
    /// PEM-stripped base64 RSA private key.
    pub private_key: String,
    /// Tracker base URL.
    pub base_url: String,
    /// URL the tracker redirects to after the user grants access.
    pub callback_url: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("consumer_key", &self.consumer_key)
            .field("private_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

/// HTTP method of a signed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Uppercase method name used in the signature base string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw response of a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, uninterpreted.
    pub body: String,
}

impl SignedResponse {
    /// Whether the tracker answered `401 Unauthorized`.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// Three-legged OAuth 1.0 operations against one tracker.
pub trait OAuth1Provider: Send {
    /// Obtain temporary credentials, returning the temporary token.
    ///
    /// # Errors
    ///
    /// Returns [`OAuth1Error`] if the tracker rejects the request or the
    /// response is malformed.
    fn request_temporary_token(&self) -> Result<String, OAuth1Error>;

    /// Build the consent URL the user must visit for a temporary token.
    ///
    /// Pure; performs no network call.
    fn authorization_url(&self, temporary_token: &str) -> String;

    /// Exchange a temporary token and verifier code for an access token.
    ///
    /// # Errors
    ///
    /// Returns [`OAuth1Error`] if the tracker rejects the exchange.
    fn request_access_token(
        &self,
        temporary_token: &str,
        verifier_code: &str,
    ) -> Result<String, OAuth1Error>;

    /// Send an RSA-SHA1 signed request on behalf of the access token holder.
    ///
    /// Any HTTP status is returned as a [`SignedResponse`]; only transport
    /// failures are errors.
    ///
    /// # Errors
    ///
    /// Returns [`OAuth1Error`] on invalid URL, transport failure or timeout.
    fn make_authorized_request(
        &self,
        access_token: &str,
        url: &str,
        method: HttpMethod,
        body: Option<&[u8]>,
    ) -> Result<SignedResponse, OAuth1Error>;
}

/// Creates configured providers.
pub trait OAuth1ProviderFactory: Send + Sync {
    /// Bind a fresh provider to a signing identity and tracker host.
    ///
    /// # Errors
    ///
    /// Returns [`OAuth1Error::Key`] if the private key does not parse.
    fn configure(&self, config: ProviderConfig) -> Result<Box<dyn OAuth1Provider>, OAuth1Error>;
}
