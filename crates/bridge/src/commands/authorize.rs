//! `bridge authorize` command implementation.

use std::io::{self, Write};

use clap::Args;

use super::IntegrationArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the authorize command.
#[derive(Args)]
pub(crate) struct AuthorizeArgs {
    #[command(flatten)]
    integration: IntegrationArgs,

    /// Temporary token from the callback (`oauth_token`).
    #[arg(long)]
    token: String,

    /// Verifier code from the callback (`oauth_verifier`). Prompted if omitted.
    #[arg(long)]
    verifier: Option<String>,
}

impl AuthorizeArgs {
    /// Execute the authorize command.
    ///
    /// # Errors
    ///
    /// Returns an error if no authorization is pending for the token or the
    /// tracker rejects the exchange.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (manager, settings) = self.integration.manager()?;

        let verifier = match self.verifier {
            Some(verifier) => verifier,
            None => prompt_verifier()?,
        };
        if verifier.is_empty() {
            return Err(CliError::Validation("verifier code is required".to_owned()));
        }

        output.info("Exchanging verifier for access token...");
        manager.authorize_temporary_token(&settings, &self.token, &verifier)?;

        output.separator();
        output.success("Authorization successful");
        output.separator();
        Ok(())
    }
}

fn prompt_verifier() -> Result<String, CliError> {
    write!(io::stdout(), "Enter the verification code: ")?;
    io::stdout().flush()?;
    let mut verifier = String::new();
    io::stdin().read_line(&mut verifier)?;
    Ok(verifier.trim().to_owned())
}
