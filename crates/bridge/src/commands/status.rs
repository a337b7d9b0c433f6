//! `bridge status` command implementation.

use clap::Args;

use super::IntegrationArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the status command.
#[derive(Args)]
pub(crate) struct StatusArgs {
    #[command(flatten)]
    integration: IntegrationArgs,

    /// Tracker base URL.
    #[arg(short = 'u', long)]
    url: String,

    /// Messaging platform user ID.
    #[arg(long = "user")]
    user_id: i64,
}

impl StatusArgs {
    /// Execute the status command.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is not authorized or the check request fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (manager, settings) = self.integration.manager()?;

        if manager.is_user_authorized(&settings, &self.url, self.user_id)? {
            output.success(&format!("User {} is authorized at {}", self.user_id, self.url));
            return Ok(());
        }

        output.warning(&format!(
            "User {} is not authorized at {}",
            self.user_id, self.url
        ));
        output.info("Run `bridge authorize-url` to start the authorization");
        Err(CliError::Validation("user is not authorized".to_owned()))
    }
}
