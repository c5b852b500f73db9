use crate::core::RewriteKind;
use crate::formatting::ColorMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cppmodernize")]
#[command(
    about = "Rewrite C++ declarations to trailing return types and apply related modernizations",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Directory to modernize (searched recursively)
    pub directory: PathBuf,

    /// Show what would change without writing any file
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    /// -v: List every modified file
    /// -vv: Debug logging, one line per candidate
    /// -vvv: Trace logging
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Suppress the progress bar
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Run only these transforms (comma-separated)
    #[arg(long = "only", value_enum, value_delimiter = ',', conflicts_with = "skip")]
    pub only: Option<Vec<TransformArg>>,

    /// Skip these transforms (comma-separated)
    #[arg(long = "skip", value_enum, value_delimiter = ',')]
    pub skip: Option<Vec<TransformArg>>,

    /// Also convert functions returning void
    #[arg(long = "convert-void")]
    pub convert_void: bool,

    /// Configuration file (default: nearest .cppmodernize.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format for the run summary
    #[arg(short, long, value_enum, default_value = "terminal")]
    pub format: OutputFormat,

    /// When to use colors
    #[arg(long = "color", value_enum)]
    pub color: Option<ColorMode>,

    /// Plain output: no colors
    #[arg(long = "plain")]
    pub plain: bool,

    /// Number of worker threads (0 = one per core)
    #[arg(short = 'j', long = "jobs", default_value = "0")]
    pub jobs: usize,

    /// Process files one at a time
    #[arg(long = "no-parallel")]
    pub no_parallel: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

/// CLI spelling of a [`RewriteKind`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TransformArg {
    TrailingReturn,
    Nodiscard,
    Override,
    DefaultMembers,
}

impl From<TransformArg> for RewriteKind {
    fn from(arg: TransformArg) -> Self {
        match arg {
            TransformArg::TrailingReturn => RewriteKind::TrailingReturn,
            TransformArg::Nodiscard => RewriteKind::Nodiscard,
            TransformArg::Override => RewriteKind::Override,
            TransformArg::DefaultMembers => RewriteKind::DefaultMember,
        }
    }
}

impl Cli {
    /// Apply `--only` / `--skip` to the kinds enabled by the config file.
    pub fn select_kinds(&self, configured: Vec<RewriteKind>) -> Vec<RewriteKind> {
        if let Some(only) = &self.only {
            let only: Vec<RewriteKind> = only.iter().copied().map(RewriteKind::from).collect();
            return RewriteKind::ALL
                .into_iter()
                .filter(|kind| only.contains(kind))
                .collect();
        }
        let skip: Vec<RewriteKind> = self
            .skip
            .iter()
            .flatten()
            .copied()
            .map(RewriteKind::from)
            .collect();
        configured
            .into_iter()
            .filter(|kind| !skip.contains(kind))
            .collect()
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
