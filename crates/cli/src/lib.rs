pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "leasey",
    about = "Leasey operator CLI",
    long_about = "Operate the leasing-assistant store: config inspection, readiness checks, \
                  seeding, and smoke validation of the tool layer.",
    after_help = "Examples:\n  leasey doctor --json\n  leasey seed\n  leasey smoke"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and database connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Create the schema and load the fixed seed dataset into the configured store")]
    Seed,
    #[command(about = "Run an end-to-end readiness pass through the tool registry")]
    Smoke,
}

pub fn init_logging() {
    use leasey_core::config::{AppConfig, LoadOptions, LogFormat};
    use tracing::Level;

    let logging = AppConfig::load(LoadOptions::default())
        .map(|config| config.logging)
        .unwrap_or_else(|_| AppConfig::default().logging);
    let log_level = logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match logging.format {
        LogFormat::Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Seed => commands::seed::run(),
        Command::Smoke => commands::smoke::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
