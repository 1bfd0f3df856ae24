//! CLI for pdump.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pdump_core::config::{self, PdumpConfig};
use std::path::{Path, PathBuf};

use commands::{parse_var, run_completions, run_emit, run_serve, run_validate};

/// Top-level CLI for pdump.
#[derive(Debug, Parser)]
#[command(name = "pdump")]
#[command(about = "pdump: dump resolved request placeholders to files or logs", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/pdump/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run the HTTP pipeline and dump every matching request until Ctrl-C.
    Serve {
        /// Override the configured listen address (e.g. 0.0.0.0:8080).
        #[arg(long, value_name = "ADDR")]
        listen: Option<String>,
    },

    /// Load and validate the config, then list the configured dumps.
    Validate,

    /// Run every configured dump once against the given variables.
    Emit {
        /// Placeholder value, e.g. --var method=GET or --var http.request.uri.path=/a.
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,

        /// JSON object of placeholder values; --var entries override it.
        #[arg(long, value_name = "PATH")]
        vars_file: Option<PathBuf>,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn load_config(path: Option<&Path>) -> Result<PdumpConfig> {
    let cfg = match path {
        Some(path) => config::load_from_path(path)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let config_path = cli.config.as_deref();

        match cli.command {
            CliCommand::Serve { listen } => {
                let mut cfg = load_config(config_path)?;
                if let Some(listen) = listen {
                    cfg.listen = listen;
                }
                run_serve(cfg).await?;
            }
            CliCommand::Validate => run_validate(&load_config(config_path)?)?,
            CliCommand::Emit { vars, vars_file } => {
                let cfg = load_config(config_path)?;
                run_emit(&cfg, &vars, vars_file.as_deref())?;
            }
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
