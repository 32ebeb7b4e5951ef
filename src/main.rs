//! certcheck - TLS certificate chain checks from a mobile platform's
//! point of view

use anyhow::Result;
use certcheck::cli::{Cli, Commands};
use certcheck::commands;
use certcheck::config::load_config;
use certcheck::models::{CheckResult, CheckStatus};
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Handle color preference
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            ExitCode::from(1)
        }
    }
}

/// Returns false when a checked host ended CRITICAL or ERROR
async fn run(cli: Cli) -> Result<bool> {
    let settings = load_config(cli.config.as_deref())?;

    if let Some(host) = cli.shortcut_host() {
        let result = commands::run_check(
            host,
            None,
            settings.check.clone(),
            cli.json,
            None,
            cli.verbose,
        )
        .await?;
        return Ok(passed(&result));
    }

    match cli.command {
        Some(Commands::Check(args)) => {
            let result = commands::run_check(
                &args.host,
                args.port,
                settings.check.clone(),
                args.json || cli.json,
                args.output.as_deref(),
                cli.verbose,
            )
            .await?;
            Ok(passed(&result))
        }
        Some(Commands::Batch(args)) => {
            let any_failure = commands::run_batch(
                &args.file,
                args.parallel,
                settings.check.clone(),
                args.json || cli.json,
                args.issues_only,
            )
            .await?;
            Ok(!any_failure)
        }
        Some(Commands::Watch(args)) => {
            commands::run_watch(
                args.host.as_deref(),
                args.port,
                args.interval,
                args.count,
                &args.store,
                settings,
            )
            .await?;
            Ok(true)
        }
        Some(Commands::Favorites(args)) => {
            commands::run_favorites(&args.action, &args.store, settings.check.default_port)?;
            Ok(true)
        }
        None => {
            // No command or host provided - show help
            println!("{}", style("certcheck").cyan().bold());
            println!("TLS certificate chain checks from a mobile platform's point of view\n");
            println!("Usage: certcheck [OPTIONS] [HOST]");
            println!("       certcheck <COMMAND>\n");
            println!("Run 'certcheck --help' for more information.");
            Ok(true)
        }
    }
}

fn passed(result: &CheckResult) -> bool {
    !matches!(
        result.overall_status(),
        CheckStatus::Critical | CheckStatus::Error
    )
}
