use anyhow::bail;
use clap::Subcommand;
use evogym_config::Config;
use evogym_core_contact_contracts::{ContactSubmitError, SubmissionStatus};
use evogym_models::contact::ContactFormInput;

use crate::environment::{types::ContactForm, ConfigProvider, Provider};

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Fill in and submit the contact form
    #[command(aliases(["s"]))]
    Send {
        /// Name of the sender
        #[arg(long)]
        name: String,
        /// Email address replies should go to
        #[arg(long)]
        email: String,
        /// The message itself
        #[arg(long)]
        message: String,
    },
}

impl ContactCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            ContactCommand::Send {
                name,
                email,
                message,
            } => {
                send(
                    config,
                    ContactFormInput {
                        name,
                        email,
                        message,
                    },
                )
                .await
            }
        }
    }
}

async fn send(config: Config, input: ContactFormInput) -> anyhow::Result<()> {
    let provider = Provider::new(ConfigProvider::new(&config)?);
    let form = provider.contact_form();

    match submit(&form, input).await {
        Ok(()) => Ok(()),
        Err(ContactSubmitError::Invalid(errors)) => {
            for (field, error) in errors.iter() {
                eprintln!("{}: {}", field.as_str(), error.describe(field));
            }
            bail!("Invalid contact form")
        }
        Err(err) => Err(err.into()),
    }
}

/// Submit `input` and print every status the form passes through.
async fn submit(form: &ContactForm, input: ContactFormInput) -> Result<(), ContactSubmitError> {
    let mut status = form.subscribe();

    let submit = form.submit(input);
    tokio::pin!(submit);
    let result = loop {
        tokio::select! {
            result = &mut submit => break result,
            Ok(()) = status.changed() => print_status(&status.borrow_and_update()),
        }
    };

    if status.has_changed().unwrap_or(false) {
        print_status(&status.borrow_and_update());
    }

    result
}

fn print_status(status: &SubmissionStatus) {
    match status {
        SubmissionStatus::Idle => {}
        SubmissionStatus::Submitting => println!("Enviando..."),
        SubmissionStatus::Success { message } => println!("{message}"),
        SubmissionStatus::Error { message } => eprintln!("{message}"),
    }
}
