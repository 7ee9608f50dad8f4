pub mod bootstrap;
pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use almox_core::config::{AppConfig, LoadOptions, LogFormat};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "almox",
    about = "Almox inventory assistant CLI",
    long_about = "Ask the equipment-loan help-desk assistant, chat with it, and inspect its rules, inventory counts, and configuration.",
    after_help = "Examples:\n  almox ask Quantos equipamentos temos?\n  almox chat\n  almox stats\n  almox config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Read configuration from this TOML file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Resolve one question and print the reply as a JSON payload")]
    Ask {
        #[arg(help = "Question text; multiple words are joined with spaces")]
        text: Vec<String>,
    },
    #[command(about = "Start an interactive chat session on stdin (type /sair to quit)")]
    Chat,
    #[command(about = "Print the inventory counts the assistant replies with")]
    Stats,
    #[command(about = "List the response rules in evaluation order")]
    Rules,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = LoadOptions {
        require_file: cli.config.is_some(),
        config_path: cli.config,
        ..LoadOptions::default()
    };

    if let Ok(config) = AppConfig::load(options.clone()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Ask { text } => commands::ask::run(options, &text.join(" ")),
        Command::Chat => commands::chat::run(options),
        Command::Stats => commands::stats::run(options),
        Command::Rules => commands::rules::run(options),
        Command::Config => commands::config::run(options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout carries only command payloads and chat text.
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
