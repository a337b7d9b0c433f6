//! OAuth 1.0 signature generation (RFC 5849).

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, percent_encode};
use rsa::RsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha1::Sha1;
use ureq::http::Uri;

use crate::error::OAuth1Error;

/// OAuth unreserved characters: A-Z a-z 0-9 - . _ ~
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Protocol parameters that vary between the three legs of the flow.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TokenParams<'a> {
    /// `oauth_token` (absent for the request token phase).
    pub token: Option<&'a str>,
    /// `oauth_callback` (request token phase only).
    pub callback: Option<&'a str>,
    /// `oauth_verifier` (access token phase only).
    pub verifier: Option<&'a str>,
}

/// Percent-encode string per RFC 3986.
pub(crate) fn oauth_encode(input: &str) -> String {
    percent_encode(input.as_bytes(), OAUTH_ENCODE_SET).to_string()
}

/// Generate cryptographically random nonce (32 hex characters).
fn generate_nonce() -> String {
    let bytes: [u8; 16] = rand::random();
    hex::encode(bytes)
}

/// Generate Unix timestamp.
fn generate_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
        .to_string()
}

/// Sign data with RSA-SHA1 and return base64-encoded signature.
fn sign_rsa_sha1(private_key: &RsaPrivateKey, data: &str) -> String {
    let signing_key = SigningKey::<Sha1>::new(private_key.clone());
    let signature = signing_key.sign(data.as_bytes());
    BASE64_STANDARD.encode(signature.to_bytes())
}

/// Build OAuth signature base string per RFC 5849 Section 3.4.1.
///
/// Format: `HTTP_METHOD&encoded_base_url&encoded_parameters`
fn build_signature_base_string(method: &str, base_url: &str, params: &[(String, String)]) -> String {
    // Normalize parameters: encode keys/values, sort by key then value
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (oauth_encode(k), oauth_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        oauth_encode(base_url),
        oauth_encode(&param_string)
    )
}

/// Build OAuth Authorization header from OAuth params.
fn build_authorization_header(oauth_params: &BTreeMap<&'static str, String>) -> String {
    let header_parts: Vec<String> = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, oauth_encode(v)))
        .collect();
    format!("OAuth {}", header_parts.join(", "))
}

/// Split a request URL into its signature base URL and decoded query parameters.
///
/// The base URL excludes the query string and default ports
/// (RFC 5849 Section 3.4.1.2); query parameters are included in the
/// signature (RFC 5849 Section 3.4.1.3).
pub(crate) fn split_request_url(url: &str) -> Result<(String, Vec<(String, String)>), OAuth1Error> {
    let uri: Uri = url
        .parse()
        .map_err(|_| OAuth1Error::InvalidUrl(url.to_owned()))?;

    let scheme = uri
        .scheme_str()
        .map(str::to_ascii_lowercase)
        .filter(|s| s == "http" || s == "https")
        .ok_or_else(|| OAuth1Error::InvalidUrl(url.to_owned()))?;
    let host = uri
        .host()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| OAuth1Error::InvalidUrl(url.to_owned()))?
        .to_ascii_lowercase();

    let base_url = match uri.port_u16() {
        Some(80) if scheme == "http" => format!("{scheme}://{host}{}", uri.path()),
        Some(443) if scheme == "https" => format!("{scheme}://{host}{}", uri.path()),
        Some(port) => format!("{scheme}://{host}:{port}{}", uri.path()),
        None => format!("{scheme}://{host}{}", uri.path()),
    };

    let query_params = uri
        .query()
        .map(|q| {
            q.split('&')
                .filter(|param| !param.is_empty())
                .map(|param| {
                    let (key, value) = param.split_once('=').unwrap_or((param, ""));
                    (decode_component(key), decode_component(value))
                })
                .collect()
        })
        .unwrap_or_default();

    Ok((base_url, query_params))
}

/// Decode a form-encoded query component (`+` is a space).
fn decode_component(value: &str) -> String {
    percent_decode_str(&value.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

/// Create OAuth Authorization header value.
///
/// # Arguments
/// * `method` - HTTP method (GET, POST, etc.)
/// * `base_url` - URL without query string (<scheme://host/path>)
/// * `query_params` - Query parameters to include in signature
/// * `consumer_key` - OAuth consumer key
/// * `token_params` - Token, callback and verifier for the current leg
/// * `private_key` - RSA private key for signing
pub(crate) fn create_authorization_header(
    method: &str,
    base_url: &str,
    query_params: &[(String, String)],
    consumer_key: &str,
    token_params: TokenParams<'_>,
    private_key: &RsaPrivateKey,
) -> String {
    let mut oauth_params = BTreeMap::new();
    oauth_params.insert("oauth_consumer_key", consumer_key.to_owned());
    oauth_params.insert("oauth_nonce", generate_nonce());
    oauth_params.insert("oauth_signature_method", "RSA-SHA1".to_owned());
    oauth_params.insert("oauth_timestamp", generate_timestamp());
    oauth_params.insert("oauth_version", "1.0".to_owned());

    if let Some(token) = token_params.token {
        oauth_params.insert("oauth_token", token.to_owned());
    }
    if let Some(callback) = token_params.callback {
        oauth_params.insert("oauth_callback", callback.to_owned());
    }
    if let Some(verifier) = token_params.verifier {
        oauth_params.insert("oauth_verifier", verifier.to_owned());
    }

    // Build signature params: OAuth params + query params (RFC 5849 Section 3.4.1.3)
    let mut signature_params: Vec<(String, String)> = oauth_params
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect();
    signature_params.extend(query_params.iter().cloned());

    let base_string = build_signature_base_string(method, base_url, &signature_params);
    let signature = sign_rsa_sha1(private_key, &base_string);
    oauth_params.insert("oauth_signature", signature);

    build_authorization_header(&oauth_params)
}
