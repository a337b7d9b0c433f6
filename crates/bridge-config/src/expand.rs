//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a string field.
///
/// `field` is the dotted config path used in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

/// Expand environment variables and a leading `~` in a path field.
pub(crate) fn expand_path(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::full(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}
