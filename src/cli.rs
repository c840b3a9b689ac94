//! CLI argument parsing module for peerbump

use clap::Parser;
use std::path::PathBuf;

/// Update package.json dependencies to the newest mutually compatible versions
#[derive(Parser, Debug, Clone)]
#[command(
    name = "peerbump",
    version,
    about = "Update package.json dependencies to the newest versions that satisfy each other's peer dependencies"
)]
pub struct CliArgs {
    /// Project directory containing package.json
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Show the update plan without changing package.json
    #[arg(short = 'r', long, visible_alias = "dryrun")]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    // Range policy
    /// Write updated versions with a caret prefix (^1.2.3)
    #[arg(short, long)]
    pub caret: bool,

    /// Write updated versions with a tilde prefix (~1.2.3); wins over --caret
    #[arg(short, long)]
    pub tilde: bool,

    /// Keep a declared range when it already admits the new version
    #[arg(long)]
    pub conservative: bool,

    // Git
    /// Commit package.json after updating
    #[arg(short, long)]
    pub git: bool,

    /// Prefix of the commit message (e.g. "chore: ")
    #[arg(short = 'p', long, value_name = "PREFIX")]
    pub commit_prefix: Option<String>,

    // Registry
    /// Registry URL (default: .npmrc registry, then https://registry.npmjs.org)
    #[arg(long, value_name = "URL")]
    pub registry: Option<String>,

    /// Query package metadata with `npm info` instead of HTTP
    #[arg(long)]
    pub npm_cli: bool,
}
