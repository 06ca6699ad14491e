//! Project automation tasks for stockrank
//!
//! Run with `cargo xtask <task>`.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Project automation tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check formatting without rewriting files
    Fmt,
    /// Run clippy on all targets, warnings denied
    Lint,
    /// Run all tests
    Test,
    /// Fmt, lint and test, stopping at the first failure
    Ci,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = workspace_root();

    match cli.command {
        Commands::Fmt => fmt(&root),
        Commands::Lint => lint(&root),
        Commands::Test => test(&root),
        Commands::Ci => {
            fmt(&root)?;
            lint(&root)?;
            test(&root)
        }
    }
}

fn fmt(root: &Path) -> Result<()> {
    println!("Checking formatting...");
    cargo(root, &["fmt", "--all", "--", "--check"])
}

fn lint(root: &Path) -> Result<()> {
    println!("Running clippy...");
    cargo(
        root,
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn test(root: &Path) -> Result<()> {
    println!("Running tests...");
    cargo(root, &["test", "--workspace"])
}

fn cargo(root: &Path, args: &[&str]) -> Result<()> {
    let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    let status = Command::new(&cargo)
        .args(args)
        .current_dir(root)
        .status()
        .with_context(|| format!("Failed to spawn {cargo}"))?;

    if !status.success() {
        bail!("`cargo {}` failed with {status}", args.join(" "));
    }
    Ok(())
}

/// crates/xtask -> workspace root
fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .map_or_else(|| manifest_dir.clone(), Path::to_path_buf)
}
