//! CLI error types.

use bridge_auth::AuthorizationError;
use bridge_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Authorization(#[from] AuthorizationError),

    #[error("{0}")]
    Validation(String),
}
