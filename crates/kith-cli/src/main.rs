//! Kith CLI - Command line interface for the in-memory social network

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;
mod parse;
mod session;

use commands::{completions, config as config_cmd, repl, run};
use config::{config_file_path, Config};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "kith")]
#[command(author, version, about = "In-memory social network with friend suggestions")]
pub struct Cli {
    /// Config file (default: <config dir>/kith/config.toml)
    #[arg(short, long, global = true, env = "KITH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format: text, json (overrides the config file)
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Get the config file path
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_file_path)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive session (default)
    Repl,
    /// Run a file of session commands
    Run(run::RunArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
    /// Manage configuration
    Config(config_cmd::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting kith CLI");

    let config_path = cli.config_path();
    if let Some(Commands::Config(args)) = &cli.command {
        return config_cmd::run(args, &config_path);
    }
    if let Some(Commands::Completions(args)) = &cli.command {
        return completions::run(args);
    }

    let config = Config::load(&config_path)?;
    let format = OutputFormat::from(cli.format.as_deref().unwrap_or(&config.format));

    match &cli.command {
        None | Some(Commands::Repl) => repl::run(&config, format)?,
        Some(Commands::Run(args)) => run::run(args, &config, format)?,
        Some(Commands::Completions(_)) | Some(Commands::Config(_)) => {}
    }

    Ok(())
}
