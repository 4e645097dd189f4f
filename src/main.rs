use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod client;
mod core;
mod daemon;
mod ui;

use crate::cli::control::DaemonCommand;
use crate::core::settings::BodyFormat;

#[derive(Parser)]
#[command(name = "tracking-display")]
#[command(author, version, about = "Desktop tracking display for the OctoPrint MaintenanceManager plugin")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the tracking display daemon
    Daemon,

    /// Fetch tracking information once and print it
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Body format for text output
        #[arg(long, value_enum, default_value = "text")]
        format: FormatArg,
    },

    /// Show the tracking display and resume polling
    Show,

    /// Hide the tracking display and pause polling
    Hide,

    /// Stop the daemon
    Stop,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Html,
    Text,
}

impl From<FormatArg> for BodyFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Html => BodyFormat::Html,
            FormatArg::Text => BodyFormat::Text,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Daemon => {
            init_logging();
            daemon::run().await
        }
        Commands::Status { json, format } => {
            init_logging();
            cli::status::run(json, format.into()).await
        }
        Commands::Show => {
            init_logging();
            cli::control::run(DaemonCommand::Show).await
        }
        Commands::Hide => {
            init_logging();
            cli::control::run(DaemonCommand::Hide).await
        }
        Commands::Stop => {
            init_logging();
            cli::control::run(DaemonCommand::Stop).await
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}
