//! RSA-SHA1 signing provider over `ureq`.
//!
//! Handles the three-legged OAuth 1.0 flow against the tracker's OAuth servlet:
//! 1. Request temporary credentials (request token)
//! 2. Generate authorization URL for the user
//! 3. Exchange verifier for access credentials
//!
//! and signs API requests with the resulting access token.

use std::collections::HashMap;
use std::time::Duration;

use percent_encoding::percent_decode_str;
use rsa::RsaPrivateKey;
use tracing::{debug, info};
use ureq::Agent;
use ureq::http::{Response, Uri};

use crate::error::OAuth1Error;
use crate::key::parse_private_key;
use crate::provider::{
    HttpMethod, OAuth1Provider, OAuth1ProviderFactory, ProviderConfig, SignedResponse,
};
use crate::signature::{TokenParams, create_authorization_header, oauth_encode, split_request_url};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// OAuth endpoint paths relative to the tracker base URL.
#[derive(Debug, Clone)]
pub struct OAuthEndpoints {
    /// Temporary credential request path.
    pub request_token: String,
    /// User consent path.
    pub authorize: String,
    /// Access token exchange path.
    pub access_token: String,
}

impl Default for OAuthEndpoints {
    fn default() -> Self {
        Self {
            request_token: "/plugins/servlet/oauth/request-token".to_owned(),
            authorize: "/plugins/servlet/oauth/authorize".to_owned(),
            access_token: "/plugins/servlet/oauth/access-token".to_owned(),
        }
    }
}

/// Resolve an absolute path against the scheme and authority of `base_url`.
///
/// Any path or query on `base_url` is replaced, so a tracker URL such as
/// `https://jira.example.com/browse/X-1` resolves `/rest/api/2/myself` to
/// `https://jira.example.com/rest/api/2/myself`.
///
/// # Errors
///
/// Returns [`OAuth1Error::InvalidUrl`] if `base_url` is not an absolute
/// http(s) URL with a host.
pub fn endpoint_url(base_url: &str, path: &str) -> Result<String, OAuth1Error> {
    let invalid = || OAuth1Error::InvalidUrl(base_url.to_owned());

    let uri: Uri = base_url.trim().parse().map_err(|_| invalid())?;
    let scheme = uri
        .scheme_str()
        .filter(|s| s.eq_ignore_ascii_case("http") || s.eq_ignore_ascii_case("https"))
        .ok_or_else(invalid)?;
    let authority = uri
        .authority()
        .filter(|a| !a.host().is_empty())
        .ok_or_else(invalid)?;

    Ok(format!(
        "{}://{}/{}",
        scheme.to_ascii_lowercase(),
        authority.as_str(),
        path.trim_start_matches('/')
    ))
}

/// Builds [`RsaSha1Provider`]s sharing endpoint layout and timeout.
#[derive(Debug, Clone)]
pub struct RsaSha1ProviderFactory {
    endpoints: OAuthEndpoints,
    timeout: Duration,
}

impl Default for RsaSha1ProviderFactory {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT))
    }
}

impl RsaSha1ProviderFactory {
    /// Create a factory with default endpoints and the given request timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            endpoints: OAuthEndpoints::default(),
            timeout,
        }
    }

    /// Override the OAuth endpoint paths.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: OAuthEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

impl OAuth1ProviderFactory for RsaSha1ProviderFactory {
    fn configure(&self, config: ProviderConfig) -> Result<Box<dyn OAuth1Provider>, OAuth1Error> {
        Ok(Box::new(RsaSha1Provider::new(
            config,
            &self.endpoints,
            self.timeout,
        )?))
    }
}

/// OAuth 1.0 RSA-SHA1 provider bound to one tracker and signing identity.
pub struct RsaSha1Provider {
    agent: Agent,
    consumer_key: String,
    private_key: RsaPrivateKey,
    callback_url: String,
    request_token_url: String,
    authorize_url: String,
    access_token_url: String,
}

impl RsaSha1Provider {
    /// Create a provider.
    ///
    /// The tracker base URL is normalized (lowercase scheme and host, no
    /// default port) so token requests go to the URL they are signed for.
    ///
    /// # Errors
    ///
    /// Returns [`OAuth1Error::Key`] if the private key cannot be parsed and
    /// [`OAuth1Error::InvalidUrl`] if the base URL is not an absolute http(s)
    /// URL.
    pub fn new(
        config: ProviderConfig,
        endpoints: &OAuthEndpoints,
        timeout: Duration,
    ) -> Result<Self, OAuth1Error> {
        let private_key = parse_private_key(&config.private_key)?;
        let (base_url, _) = split_request_url(config.base_url.trim())?;
        let base_url = base_url.trim_end_matches('/');

        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self {
            agent,
            consumer_key: config.consumer_key,
            private_key,
            request_token_url: format!("{base_url}{}", endpoints.request_token),
            authorize_url: format!("{base_url}{}", endpoints.authorize),
            access_token_url: format!("{base_url}{}", endpoints.access_token),
            callback_url: config.callback_url,
        })
    }

    /// POST a signed token-flow request and return the decoded response params.
    fn post_token_request(
        &self,
        operation: &'static str,
        url: &str,
        token_params: TokenParams<'_>,
    ) -> Result<HashMap<String, String>, OAuth1Error> {
        let (base_url, query_params) = split_request_url(url)?;
        let auth_header = create_authorization_header(
            "POST",
            &base_url,
            &query_params,
            &self.consumer_key,
            token_params,
            &self.private_key,
        );

        let response = self
            .agent
            .post(url)
            .header("Authorization", &auth_header)
            .send(&[] as &[u8])
            .map_err(|source| OAuth1Error::Transport {
                url: url.to_owned(),
                source,
            })?;

        let signed = read_response(url, response)?;
        if signed.status >= 400 {
            return Err(OAuth1Error::Rejected {
                operation,
                status: signed.status,
                body: signed.body,
            });
        }

        Ok(parse_oauth_response(&signed.body))
    }
}

impl OAuth1Provider for RsaSha1Provider {
    fn request_temporary_token(&self) -> Result<String, OAuth1Error> {
        const OPERATION: &str = "Request token";

        debug!("Requesting temporary token from {}", self.request_token_url);
        let params = self.post_token_request(
            OPERATION,
            &self.request_token_url,
            TokenParams {
                callback: Some(&self.callback_url),
                ..TokenParams::default()
            },
        )?;

        get_required_param(&params, OPERATION, "oauth_token")
    }

    fn authorization_url(&self, temporary_token: &str) -> String {
        format!(
            "{}?oauth_token={}&oauth_callback={}",
            self.authorize_url,
            oauth_encode(temporary_token),
            oauth_encode(&self.callback_url)
        )
    }

    fn request_access_token(
        &self,
        temporary_token: &str,
        verifier_code: &str,
    ) -> Result<String, OAuth1Error> {
        const OPERATION: &str = "Access token exchange";

        debug!("Exchanging verifier at {}", self.access_token_url);
        let params = self.post_token_request(
            OPERATION,
            &self.access_token_url,
            TokenParams {
                token: Some(temporary_token),
                verifier: Some(verifier_code),
                ..TokenParams::default()
            },
        )?;

        let access_token = get_required_param(&params, OPERATION, "oauth_token")?;
        info!("Access token granted by {}", self.access_token_url);
        Ok(access_token)
    }

    fn make_authorized_request(
        &self,
        access_token: &str,
        url: &str,
        method: HttpMethod,
        body: Option<&[u8]>,
    ) -> Result<SignedResponse, OAuth1Error> {
        let (base_url, query_params) = split_request_url(url)?;
        let auth_header = create_authorization_header(
            method.as_str(),
            &base_url,
            &query_params,
            &self.consumer_key,
            TokenParams {
                token: Some(access_token),
                ..TokenParams::default()
            },
            &self.private_key,
        );

        debug!("{method} {url}");

        let result = match method {
            HttpMethod::Get => self
                .agent
                .get(url)
                .header("Authorization", &auth_header)
                .header("Accept", "application/json")
                .call(),
            HttpMethod::Delete => self
                .agent
                .delete(url)
                .header("Authorization", &auth_header)
                .header("Accept", "application/json")
                .call(),
            HttpMethod::Post => self
                .agent
                .post(url)
                .header("Authorization", &auth_header)
                .header("Accept", "application/json")
                .header("Content-Type", "application/json")
                .send(body.unwrap_or_default()),
            HttpMethod::Put => self
                .agent
                .put(url)
                .header("Authorization", &auth_header)
                .header("Accept", "application/json")
                .header("Content-Type", "application/json")
                .send(body.unwrap_or_default()),
        };

        let response = result.map_err(|source| OAuth1Error::Transport {
            url: url.to_owned(),
            source,
        })?;

        read_response(url, response)
    }
}

/// Read status and body of a response.
fn read_response(url: &str, response: Response<ureq::Body>) -> Result<SignedResponse, OAuth1Error> {
    let status = response.status().as_u16();
    let mut body_reader = response.into_body();
    let body = body_reader
        .read_to_string()
        .map_err(|source| OAuth1Error::Body {
            url: url.to_owned(),
            source,
        })?;

    Ok(SignedResponse { status, body })
}

/// Parse OAuth URL-encoded response body.
fn parse_oauth_response(body: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in body.trim().split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            params.insert(
                percent_decode_str(key).decode_utf8_lossy().into_owned(),
                percent_decode_str(value).decode_utf8_lossy().into_owned(),
            );
        }
    }
    params
}

/// Extract required non-empty parameter from OAuth response.
fn get_required_param(
    params: &HashMap<String, String>,
    operation: &'static str,
    parameter: &'static str,
) -> Result<String, OAuth1Error> {
    params
        .get(parameter)
        .filter(|value| !value.is_empty())
        .cloned()
        .ok_or(OAuth1Error::MissingParameter {
            operation,
            parameter,
        })
}
