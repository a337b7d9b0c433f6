//! Configuration management for the tracker authorization bridge.
//!
//! Parses `bridge.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `bridge.url`
//! - `bridge.certs_dir` (also expands a leading `~`)
//! - `store.path` (also expands a leading `~`)
//! - `applications.<type>.authorization.consumer_key`
//!
//! ## Example
//!
//! ```toml
//! [bridge]
//! url = "https://bridge.example.com"
//! certs_dir = "certs"
//!
//! [applications.jira]
//! id = "jira"
//!
//! [applications.jira.authorization]
//! consumer_key = "${JIRA_CONSUMER_KEY:-bridge}"
//! ```

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override integration bridge base URL.
    pub bridge_url: Option<String>,
    /// Override certificate directory.
    pub certs_dir: Option<PathBuf>,
    /// Override authorization store file.
    pub store_path: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "bridge.toml";

/// Default timeout for outbound OAuth calls.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Integration bridge configuration.
    pub bridge: BridgeConfig,
    /// Outbound OAuth call configuration.
    pub oauth: OAuthConfig,
    /// Authorization store configuration (paths are relative strings from TOML).
    store: StoreConfigRaw,
    /// Applications keyed by integration type.
    pub applications: BTreeMap<String, Application>,

    /// Resolved certificate directory (set after loading).
    #[serde(skip)]
    pub certs_dir_resolved: Option<PathBuf>,
    /// Resolved store configuration (set after loading).
    #[serde(skip)]
    pub store_resolved: StoreConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Integration bridge configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Public base URL of the integration bridge, used for OAuth callbacks.
    pub url: String,
    /// Directory holding application key files (relative to the config file).
    certs_dir: Option<String>,
}

/// Outbound OAuth call configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// Timeout in seconds applied to every signed request.
    pub timeout_secs: u64,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Raw store configuration as parsed from TOML (paths as strings).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoreConfigRaw {
    path: Option<String>,
}

/// Resolved authorization store configuration with absolute paths.
#[derive(Debug, Default)]
pub struct StoreConfig {
    /// JSON file holding user authorization records.
    pub path: PathBuf,
}

/// Application registered with the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct Application {
    /// Application identifier, used to derive default key filenames.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Static authorization configuration.
    pub authorization: AuthorizationModel,
}

/// Static authorization configuration of an application.
///
/// Immutable after load. Key filenames are optional overrides of the
/// `{id}_app_pub.pem` and `{id}_app.pkcs8` conventions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizationModel {
    /// OAuth consumer key registered with the tracker.
    pub consumer_key: String,
    /// Public key filename inside the certificate directory.
    #[serde(default)]
    pub public_key_filename: Option<String>,
    /// Private key filename inside the certificate directory.
    #[serde(default)]
    pub private_key_filename: Option<String>,
    /// Free-form properties exposed to callers.
    ///
    /// Never consulted for key lookup; `publicKeyFilename` or
    /// `privateKeyFilename` entries here have no effect.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`bridge.url`").
        field: String,
        /// Error message (e.g., "${`BRIDGE_URL`} not set").
        message: String,
    },
    /// No application is configured for the integration type.
    #[error("No application configured for integration type '{0}'")]
    UnknownApplication(String),
    /// Certificate directory is not configured or does not exist.
    #[error("Certificate directory not found{}", .0.as_ref().map(|p| format!(": {}", p.display())).unwrap_or_default())]
    CertificateDirectoryNotFound(Option<PathBuf>),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `bridge.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The merged result
    /// is validated, so an override cannot bypass the `bridge.url` checks.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the merged configuration is invalid (e.g. no bridge URL anywhere).
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from a TOML string.
    ///
    /// Relative paths are resolved against `base_dir`. Environment variables
    /// are expanded and the result is validated, as for a file load.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_paths(base_dir);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(url) = &settings.bridge_url {
            self.bridge.url.clone_from(url);
        }
        if let Some(certs_dir) = &settings.certs_dir {
            self.certs_dir_resolved = Some(certs_dir.clone());
        }
        if let Some(store_path) = &settings.store_path {
            self.store_resolved.path.clone_from(store_path);
        }
    }

    /// Get the application registered for an integration type.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownApplication` if the type is not configured.
    pub fn application(&self, integration_type: &str) -> Result<&Application, ConfigError> {
        self.applications
            .get(integration_type)
            .ok_or_else(|| ConfigError::UnknownApplication(integration_type.to_owned()))
    }

    /// Public base URL of the integration bridge.
    #[must_use]
    pub fn integration_bridge_url(&self) -> &str {
        &self.bridge.url
    }

    /// Directory holding application key files.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::CertificateDirectoryNotFound` if no directory is
    /// configured or it does not exist on disk.
    pub fn certs_dir(&self) -> Result<&Path, ConfigError> {
        match &self.certs_dir_resolved {
            Some(dir) if dir.is_dir() => Ok(dir),
            Some(dir) => Err(ConfigError::CertificateDirectoryNotFound(Some(dir.clone()))),
            None => Err(ConfigError::CertificateDirectoryNotFound(None)),
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            bridge: BridgeConfig::default(),
            oauth: OAuthConfig::default(),
            store: StoreConfigRaw::default(),
            applications: BTreeMap::new(),
            certs_dir_resolved: None,
            store_resolved: StoreConfig {
                path: base.join(".bridge").join("authorizations.json"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml_str(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_bridge()?;
        self.validate_applications()?;
        Ok(())
    }

    /// Validate bridge and OAuth configuration.
    fn validate_bridge(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.bridge.url, "bridge.url")?;
        require_http_url(&self.bridge.url, "bridge.url")?;

        if self.oauth.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "oauth.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate application entries.
    fn validate_applications(&self) -> Result<(), ConfigError> {
        for (integration_type, application) in &self.applications {
            require_non_empty(&application.id, &format!("applications.{integration_type}.id"))?;
            require_non_empty(
                &application.authorization.consumer_key,
                &format!("applications.{integration_type}.authorization.consumer_key"),
            )?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.bridge.url = expand::expand_env(&self.bridge.url, "bridge.url")?;

        if let Some(ref dir) = self.bridge.certs_dir {
            self.bridge.certs_dir = Some(expand::expand_path(dir, "bridge.certs_dir")?);
        }

        if let Some(ref path) = self.store.path {
            self.store.path = Some(expand::expand_path(path, "store.path")?);
        }

        for (integration_type, application) in &mut self.applications {
            let auth = &mut application.authorization;
            auth.consumer_key = expand::expand_env(
                &auth.consumer_key,
                &format!("applications.{integration_type}.authorization.consumer_key"),
            )?;
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.certs_dir_resolved = self.bridge.certs_dir.as_deref().map(|d| config_dir.join(d));
        self.store_resolved = StoreConfig {
            path: config_dir.join(
                self.store
                    .path
                    .as_deref()
                    .unwrap_or(".bridge/authorizations.json"),
            ),
        };
    }
}
