//! `bridge keys` command implementation.

use clap::Args;

use super::IntegrationArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the keys command.
#[derive(Args)]
pub(crate) struct KeysArgs {
    #[command(flatten)]
    integration: IntegrationArgs,

    /// Print the PEM-stripped public key for registering the application link.
    #[arg(long)]
    show_public_key: bool,
}

impl KeysArgs {
    /// Execute the keys command.
    ///
    /// # Errors
    ///
    /// Returns an error if a key file is invalid or the key pair is incomplete.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (manager, settings) = self.integration.manager()?;

        let model = manager.authorization_model(&settings)?;
        let status = manager.validate_keys(&settings)?;

        output.status("Application", &model.application_id, true);
        output.status("Consumer key", &model.consumer_key, true);
        output.status("Callback", &manager.callback_url(&settings), true);
        output.status(
            "Public key",
            &presence(&status.public_key_filename, status.public_key.is_some()),
            status.public_key.is_some(),
        );
        output.status(
            "Private key",
            &presence(&status.private_key_filename, status.private_key_present),
            status.private_key_present,
        );

        if self.show_public_key
            && let Some(public_key) = &status.public_key
        {
            output.separator();
            output.highlight(public_key);
            output.separator();
        }

        if !status.is_complete() {
            return Err(CliError::Validation(
                "application key pair is incomplete".to_owned(),
            ));
        }

        output.success("Key pair is valid");
        Ok(())
    }
}

fn presence(filename: &str, present: bool) -> String {
    if present {
        format!("{filename} (valid)")
    } else {
        format!("{filename} (missing)")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_presence() {
        assert_eq!(presence("jira_app.pkcs8", true), "jira_app.pkcs8 (valid)");
        assert_eq!(presence("jira_app.pkcs8", false), "jira_app.pkcs8 (missing)");
    }
}
