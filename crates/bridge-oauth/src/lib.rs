//! OAuth 1.0 RSA-SHA1 signing provider for issue trackers.
//!
//! This crate provides the wire-level half of the three-legged OAuth 1.0 flow:
//! - [`key`]: RSA key factory for PEM-stripped base64 key material
//! - [`OAuth1Provider`]: temporary token, consent URL, access token exchange
//!   and signed requests
//! - [`RsaSha1ProviderFactory`]: builds a fresh [`RsaSha1Provider`] per call
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use bridge_oauth::{OAuth1ProviderFactory, ProviderConfig, RsaSha1ProviderFactory};
//!
//! let factory = RsaSha1ProviderFactory::new(Duration::from_secs(30));
//! let provider = factory.configure(ProviderConfig {
//!     consumer_key: "bridge".to_owned(),
//!     private_key: private_key_base64,
//!     base_url: "https://jira.example.com".to_owned(),
//!     callback_url: "https://bridge.example.com/v1/application/42/authorization/authorize".to_owned(),
//! })?;
//!
//! let token = provider.request_temporary_token()?;
//! println!("Open {}", provider.authorization_url(&token));
//! ```

mod client;
pub mod error;
pub mod key;
mod provider;
mod signature;

pub use client::{OAuthEndpoints, RsaSha1Provider, RsaSha1ProviderFactory, endpoint_url};
pub use error::{KeyError, OAuth1Error};
pub use provider::{HttpMethod, OAuth1Provider, OAuth1ProviderFactory, ProviderConfig, SignedResponse};
