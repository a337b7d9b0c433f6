//! Three-legged OAuth 1.0 authorization between the integration bridge and
//! an issue tracker.
//!
//! [`AuthorizationManager`] drives the flow for one user at a time:
//!
//! 1. [`AuthorizationManager::authorization_url`] obtains a temporary token,
//!    records a pending authorization and returns the consent URL.
//! 2. The tracker redirects the user to the bridge callback with a verifier.
//! 3. [`AuthorizationManager::authorize_temporary_token`] exchanges the
//!    verifier for an access token and records it.
//! 4. [`AuthorizationManager::is_user_authorized`] checks the tracker with the
//!    stored access token.
//!
//! Application keys are read from the configured certificate directory by
//! [`KeyMaterialLoader`]. Records live in any
//! [`AuthorizationStore`](bridge_store::AuthorizationStore).

mod error;
mod keys;
mod manager;
mod state;

pub use error::{AuthorizationError, AuthorizationErrorKind};
pub use keys::{KeyMaterialLoader, KeyValidationError, private_key_filename, public_key_filename};
pub use manager::{
    AuthorizationManager, IntegrationSettings, KeyStatus, ResolvedAuthorizationModel,
    callback_url,
};
pub use state::OAuth1AuthorizationState;
