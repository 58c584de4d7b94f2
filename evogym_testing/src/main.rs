use std::net::IpAddr;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use evogym_testing::emailjs::{self, EmailJsAccount};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Command::EmailJs {
            host,
            port,
            public_key,
            service_id,
            template_id,
            private_key,
        } => {
            let account = EmailJsAccount {
                public_key,
                service_id,
                template_id,
                private_key,
            };
            emailjs::start_server(host, port, account).await?
        }
        Command::Completion { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                env!("CARGO_BIN_NAME"),
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the EmailJS testing server
    #[clap(name = "emailjs")]
    EmailJs {
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,
        #[arg(long, default_value = "8001")]
        port: u16,
        #[arg(long, default_value = "test-public-key")]
        public_key: String,
        #[arg(long, default_value = "test-service")]
        service_id: String,
        #[arg(long, default_value = "test-template")]
        template_id: String,
        /// Require this access token on every request
        #[arg(long)]
        private_key: Option<String>,
    },
    /// Generate shell completions
    Completion {
        /// The shell to generate completions for
        #[clap(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli() {
        Cli::command().debug_assert();
    }
}
