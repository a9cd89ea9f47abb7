pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "souschef",
    about = "Souschef operator CLI",
    long_about = "Inspect configuration, run readiness checks, and replay scripted conversations \
                  against the real turn dispatcher.",
    after_help = "Examples:\n  souschef doctor --json\n  souschef config\n  souschef simulate --script conversation.json"
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
    #[command(about = "Validate config and collaborator endpoint readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(
        about = "Replay a scripted conversation through the dispatcher using in-memory collaborators"
    )]
    Simulate {
        #[arg(long, help = "Path to a JSON conversation script")]
        script: PathBuf,
    },
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
        Command::Simulate { script } => commands::simulate::run(&script),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
