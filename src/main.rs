use anyhow::{Context, Result};
use clap::Parser;
use cppmodernize::cli::Cli;
use cppmodernize::commands::{self, ModernizeOptions};
use cppmodernize::config;
use cppmodernize::formatting::FormattingConfig;
use cppmodernize::output;
use cppmodernize::progress::ProgressConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let (config, source) = config::load_config(cli.config.as_deref(), &cli.directory)
        .context("Failed to load configuration")?;
    log::info!("Using configuration from {}", source);

    let mut policy = config.classification_policy();
    if cli.convert_void {
        policy.suppress_void = false;
    }

    let options = ModernizeOptions::from_config(cli.directory.clone(), &config)
        .dry_run(cli.dry_run)
        .parallel(!cli.no_parallel)
        .with_kinds(cli.select_kinds(config.enabled_kinds()))
        .with_policy(policy)
        .with_progress(ProgressConfig::from_env(cli.quiet, cli.verbosity));

    if options.parallel {
        commands::configure_thread_pool(cli.jobs);
    }

    let summary = commands::run(&options)
        .with_context(|| format!("Cannot modernise {}", cli.directory.display()))?;

    output::print_summary(&summary, cli.format, formatting_config(&cli), cli.verbosity)?;
    Ok(())
}

/// `-v` raises the level; `RUST_LOG` still wins when set.
fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn formatting_config(cli: &Cli) -> FormattingConfig {
    if cli.plain {
        return FormattingConfig::plain();
    }
    match cli.color {
        Some(color) => FormattingConfig::new(color),
        None => FormattingConfig::from_env(),
    }
}
