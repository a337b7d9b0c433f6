//! CLI command implementations.

mod authorize;
mod authorize_url;
mod keys;
mod status;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bridge_auth::{AuthorizationManager, IntegrationSettings};
use bridge_config::{CliSettings, Config};
use bridge_oauth::RsaSha1ProviderFactory;
use bridge_store::FileAuthorizationStore;
use clap::Args;

pub(crate) use authorize::AuthorizeArgs;
pub(crate) use authorize_url::AuthorizeUrlArgs;
pub(crate) use keys::KeysArgs;
pub(crate) use status::StatusArgs;

use crate::error::CliError;

/// Integration instance and configuration overrides shared by all commands.
#[derive(Args)]
pub(crate) struct IntegrationArgs {
    /// Path to configuration file (default: auto-discover bridge.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Integration type selecting the application.
    #[arg(short = 't', long = "type", default_value = "jira")]
    integration_type: String,

    /// Integration configuration ID.
    #[arg(long = "config-id", env = "BRIDGE_CONFIGURATION_ID")]
    configuration_id: String,

    /// Public bridge URL (overrides bridge.url).
    #[arg(long, env = "BRIDGE_URL")]
    bridge_url: Option<String>,

    /// Certificate directory (overrides bridge.certs_dir).
    #[arg(long)]
    certs_dir: Option<PathBuf>,

    /// Authorization store file (overrides store.path).
    #[arg(long)]
    store: Option<PathBuf>,
}

impl IntegrationArgs {
    /// Load configuration and wire the manager with the file store and the
    /// RSA-SHA1 provider.
    pub(crate) fn manager(
        self,
    ) -> Result<(AuthorizationManager, IntegrationSettings), CliError> {
        let cli_settings = CliSettings {
            bridge_url: self.bridge_url,
            certs_dir: self.certs_dir,
            store_path: self.store,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        tracing::info!(
            "Using authorization store {}",
            config.store_resolved.path.display()
        );
        let store = FileAuthorizationStore::new(config.store_resolved.path.clone());
        let providers =
            RsaSha1ProviderFactory::new(Duration::from_secs(config.oauth.timeout_secs));

        let settings = IntegrationSettings::new(self.integration_type, self.configuration_id);
        let manager =
            AuthorizationManager::new(Arc::new(config), Arc::new(store), Arc::new(providers));
        Ok((manager, settings))
    }
}
