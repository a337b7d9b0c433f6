//! Application key material from the certificate directory.
//!
//! Key files are looked up by filename inside the configured certificate
//! directory. Filenames default to `{application_id}_app_pub.pem` and
//! `{application_id}_app.pkcs8` and can be overridden per application.
//!
//! Lookups distinguish three outcomes: a usable key, no key provisioned
//! (`Ok(None)`, logged), and a key file whose content is not a valid RSA key
//! ([`KeyValidationError`]).

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use bridge_config::{AuthorizationModel, Config};
use bridge_oauth::KeyError;
use bridge_oauth::key::{
    parse_private_key, parse_public_key, strip_private_key_envelope, strip_public_key_envelope,
};
use tracing::{error, warn};

const PUBLIC_KEY_SUFFIX: &str = "_app_pub.pem";
const PRIVATE_KEY_SUFFIX: &str = "_app.pkcs8";

/// Key file content that does not decode to an RSA key.
#[derive(Debug, thiserror::Error)]
#[error("Key file {filename} does not contain a valid RSA key")]
pub struct KeyValidationError {
    /// Key filename within the certificate directory.
    pub filename: String,
    #[source]
    pub source: KeyError,
}

/// Public key filename for an application.
#[must_use]
pub fn public_key_filename(model: &AuthorizationModel, application_id: &str) -> String {
    model
        .public_key_filename
        .clone()
        .unwrap_or_else(|| format!("{application_id}{PUBLIC_KEY_SUFFIX}"))
}

/// Private key filename for an application.
#[must_use]
pub fn private_key_filename(model: &AuthorizationModel, application_id: &str) -> String {
    model
        .private_key_filename
        .clone()
        .unwrap_or_else(|| format!("{application_id}{PRIVATE_KEY_SUFFIX}"))
}

/// Reads application keys relative to the configured certificate directory.
#[derive(Debug, Clone, Copy)]
pub struct KeyMaterialLoader<'a> {
    config: &'a Config,
}

impl<'a> KeyMaterialLoader<'a> {
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Read a key file from the certificate directory.
    ///
    /// Returns `None` and logs an error if the directory is missing or the
    /// file cannot be read. Empty files are treated as absent.
    #[must_use]
    pub fn load_key(&self, filename: &str) -> Option<String> {
        let certs_dir = match self.config.certs_dir() {
            Ok(dir) => dir,
            Err(e) => {
                error!("{e}. Make sure the certificate directory was provisioned");
                return None;
            }
        };

        read_key_file(&certs_dir.join(filename))
    }

    /// Application public key as base64 with the PEM envelope removed.
    ///
    /// # Errors
    ///
    /// Returns [`KeyValidationError`] if the file exists but is not an RSA
    /// public key.
    pub fn resolve_public_key(
        &self,
        model: &AuthorizationModel,
        application_id: &str,
    ) -> Result<Option<String>, KeyValidationError> {
        let filename = public_key_filename(model, application_id);
        let Some(pem) = self.load_key(&filename) else {
            return Ok(None);
        };

        let encoded = strip_public_key_envelope(&pem);
        parse_public_key(&encoded).map_err(|source| KeyValidationError { filename, source })?;
        Ok(Some(encoded))
    }

    /// Application private key as base64 with the PEM envelope removed.
    ///
    /// # Errors
    ///
    /// Returns [`KeyValidationError`] if the file exists but is not an RSA
    /// private key.
    pub fn resolve_private_key(
        &self,
        model: &AuthorizationModel,
        application_id: &str,
    ) -> Result<Option<String>, KeyValidationError> {
        let filename = private_key_filename(model, application_id);
        let Some(pem) = self.load_key(&filename) else {
            return Ok(None);
        };

        let encoded = strip_private_key_envelope(&pem);
        parse_private_key(&encoded).map_err(|source| KeyValidationError { filename, source })?;
        Ok(Some(encoded))
    }
}

fn read_key_file(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => {
            warn!("Key file {} is empty", path.display());
            None
        }
        Ok(content) => Some(content),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            error!(
                "Cannot read the key. Make sure the file {} exists",
                path.display()
            );
            None
        }
        Err(e) => {
            error!(
                "Cannot read the key from {}: {e}. Make sure the file has the right permissions",
                path.display()
            );
            None
        }
    }
}
