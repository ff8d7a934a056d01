//! orca-profiles CLI
//!
//! Orders, regenerates and validates OrcaSlicer vendor profile manifests.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use context::ProfileContext;
use error::Result;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        // No command provided - show help hint
        println!("{} OrcaSlicer profile tooling", "orca-profiles".green().bold());
        println!();
        println!("Run {} for available commands.", "orca-profiles --help".cyan());
        return Ok(true);
    };

    if let Commands::Completions { shell } = command {
        commands::run_completions(shell);
        return Ok(true);
    }

    let ctx = ProfileContext::load(&cli.profiles_dir)?;
    execute_command(&ctx, command)
}

fn execute_command(ctx: &ProfileContext, cmd: Commands) -> Result<bool> {
    match cmd {
        Commands::List { json } => commands::run_list(ctx, json),
        Commands::Order {
            vendor,
            kind,
            policy,
            json,
        } => commands::run_order(ctx, &vendor, kind, policy, json),
        Commands::Generate {
            vendor,
            kinds,
            policy,
            dry_run,
            json,
        } => commands::run_generate(ctx, &vendor, &kinds, policy, dry_run, json),
        Commands::Check {
            vendor,
            strict,
            json,
        } => commands::run_check(ctx, vendor.as_deref(), strict, json),
        Commands::Completions { shell } => {
            commands::run_completions(shell);
            Ok(true)
        }
    }
}

/// Log to stderr so `--json` output stays parseable.
///
/// `--verbose` forces debug level; otherwise `RUST_LOG` applies, defaulting
/// to warnings only.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("{} failed to set tracing subscriber", "warning:".yellow().bold());
    }
    tracing::debug!("Verbose mode enabled");
}
