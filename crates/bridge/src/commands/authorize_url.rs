//! `bridge authorize-url` command implementation.

use std::io::{self, Write};

use clap::Args;

use super::IntegrationArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the authorize-url command.
#[derive(Args)]
pub(crate) struct AuthorizeUrlArgs {
    #[command(flatten)]
    integration: IntegrationArgs,

    /// Tracker base URL.
    #[arg(short = 'u', long)]
    url: String,

    /// Messaging platform user ID.
    #[arg(long = "user")]
    user_id: i64,
}

impl AuthorizeUrlArgs {
    /// Execute the authorize-url command.
    ///
    /// The consent URL goes to stdout; progress goes to stderr.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker rejects the request or the record
    /// cannot be saved.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (manager, settings) = self.integration.manager()?;

        output.info(&format!("Requesting temporary credentials from {}...", self.url));
        let consent_url = manager.authorization_url(&settings, &self.url, self.user_id)?;
        output.success("Temporary token received");
        output.info("\nOpen this URL in your browser to grant access:");

        writeln!(io::stdout(), "{consent_url}")?;
        Ok(())
    }
}
