//! CLI for checking and extracting UPLOAD declarations.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tapload_core::{config, UploadSyntax};

use commands::{run_check, run_extract, ExtractOptions};

/// Top-level CLI for tapload.
#[derive(Debug, Parser)]
#[command(name = "tapload")]
#[command(about = "tapload: check and extract DALI/TAP UPLOAD declarations", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Build a request from parameters and files, then extract its uploads.
    Extract {
        /// Upload syntax, "tap" or "dali" (default: from config).
        #[arg(long, value_name = "SYNTAX")]
        syntax: Option<UploadSyntax>,

        /// Request parameter (repeatable). UPLOAD declarations are given this way.
        #[arg(long = "param", value_name = "NAME=VALUE", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// File submitted inline under parameter NAME (repeatable). A copy is staged.
        #[arg(long = "file", value_name = "NAME=PATH", value_parser = parse_key_value)]
        files: Vec<(String, String)>,

        /// Also print size and SHA-256 of inline uploads.
        #[arg(long)]
        digest: bool,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check the syntax of UPLOAD values without resolving them.
    Check {
        /// Upload syntax, "tap" or "dali" (default: from config).
        #[arg(long, value_name = "SYNTAX")]
        syntax: Option<UploadSyntax>,

        /// UPLOAD values to check.
        #[arg(required = true)]
        values: Vec<String>,
    },
}

/// Parse `NAME=VALUE`; the value may itself contain `=`.
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got \"{s}\"")),
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Extract {
                syntax,
                params,
                files,
                digest,
                json,
            } => {
                let opts = ExtractOptions {
                    syntax: syntax.unwrap_or(cfg.syntax),
                    params,
                    files,
                    digest,
                    json,
                };
                run_extract(&cfg, &opts)?;
            }
            CliCommand::Check { syntax, values } => {
                run_check(syntax.unwrap_or(cfg.syntax), &values)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
