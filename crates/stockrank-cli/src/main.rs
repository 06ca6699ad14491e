//! Command-line interface for stockrank
//!
//! Commands:
//! - `serve` runs the daily fetch jobs and the HTTP API until interrupted
//! - `migrate` creates the price tables
//! - `fetch-eod` / `fetch-intraday` fetch the latest trading day once
//! - `backfill-eod` / `backfill-intraday` fetch a date range once
//! - `analyze` prints the current leaderboard

mod commands;
mod output;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stockrank_utils::{AppConfig, DEFAULT_CONFIG_PATH, LogFormat};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stockrank")]
#[command(about = "Rank stocks by momentum, stability and volume trend", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the YAML file listing the symbols
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Log output format (pretty or json); overrides LOG_FORMAT
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Schedule the fetch jobs and serve the HTTP API
    Serve {
        /// Keep prices in memory instead of Postgres
        #[arg(long, default_value_t = false)]
        in_memory: bool,

        /// Also schedule the intraday job
        #[arg(long, default_value_t = false)]
        with_intraday: bool,
    },
    /// Create the price tables if missing
    Migrate,
    /// Fetch end-of-day prices for the last trading day
    FetchEod,
    /// Fetch end-of-day prices for a date range
    BackfillEod {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,

        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
    },
    /// Fetch intraday prices for the last trading day
    FetchIntraday,
    /// Fetch intraday prices for a date range
    BackfillIntraday {
        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,
    },
    /// Rank stored symbols and print the leaderboard
    Analyze {
        /// Print the JSON result instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    stockrank_utils::init_tracing(cli.log_format.unwrap_or(config.log_format));
    info!(symbols = config.symbols.len(), command = ?cli.command, "starting stockrank");

    match cli.command {
        Commands::Serve {
            in_memory,
            with_intraday,
        } => commands::serve(&config, in_memory, with_intraday).await,
        Commands::Migrate => commands::migrate(&config).await,
        Commands::FetchEod => commands::fetch_eod(&config, None).await,
        Commands::BackfillEod { from, to } => commands::fetch_eod(&config, Some((from, to))).await,
        Commands::FetchIntraday => commands::fetch_intraday(&config, None).await,
        Commands::BackfillIntraday { from, to } => {
            commands::fetch_intraday(&config, Some((from, to))).await
        }
        Commands::Analyze { json } => commands::analyze(&config, json).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_backfill() {
        let cli = Cli::try_parse_from([
            "stockrank",
            "backfill-eod",
            "--from",
            "2024-01-02",
            "--to",
            "2024-03-28",
        ])
        .unwrap();

        match cli.command {
            Commands::BackfillEod { from, to } => {
                assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
                assert_eq!(to, NaiveDate::from_ymd_opt(2024, 3, 28).unwrap());
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "stockrank",
            "serve",
            "--in-memory",
            "--log-format",
            "json",
            "--config",
            "other.yaml",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Commands::Serve {
                in_memory: true,
                with_intraday: false
            }
        ));
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        assert_eq!(cli.config, PathBuf::from("other.yaml"));
    }

    #[test]
    fn test_bad_date_rejected() {
        assert!(
            Cli::try_parse_from(["stockrank", "backfill-eod", "--from", "yesterday", "--to", "2024-01-01"])
                .is_err()
        );
    }
}
