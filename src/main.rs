//! peerbump - peer-aware dependency updater CLI tool
//!
//! Updates package.json dependencies to the newest versions that keep the
//! peer dependencies between them satisfied.

use anyhow::Context;
use clap::Parser;
use colored::control::SHOULD_COLORIZE;
use peerbump::cli::CliArgs;
use peerbump::domain::DependencySection;
use peerbump::logging;
use peerbump::manifest::PackageJson;
use peerbump::output::TextFormatter;
use peerbump::registry::{create_registry, RegistryOptions};
use peerbump::update::{Updater, UpdaterConfig};
use peerbump::vcs::GitCli;
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.debug);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<()> {
    let project_dir = std::fs::canonicalize(&args.path).unwrap_or_else(|_| args.path.clone());
    let manifest = PackageJson::load_from_dir(&project_dir)?;
    tracing::debug!(project = %project_dir.display(), "loaded package.json");

    let options = RegistryOptions {
        registry_url: args.registry.clone(),
        use_npm_cli: args.npm_cli,
    };
    let registry = create_registry(&project_dir, &options)?;

    let config = UpdaterConfig::from_cli(&args);
    let git = config.git;
    let mut updater = Updater::new(config, registry, Box::new(manifest));
    if git {
        updater = updater.with_vcs(Box::new(GitCli::new(&project_dir)));
    }

    let formatter = TextFormatter::new(SHOULD_COLORIZE.should_colorize());
    let mut stdout = io::stdout().lock();
    for section in DependencySection::all() {
        let report = updater
            .update(*section)
            .await
            .with_context(|| format!("failed to update {}", section))?;
        formatter.format(&report, &mut stdout)?;
    }
    stdout.flush()?;

    Ok(())
}
