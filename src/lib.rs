// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod formatting;
pub mod io;
pub mod output;
pub mod progress;
pub mod rewrite;

// Re-export commonly used types
pub use crate::core::{
    Candidate, Classification, Error, ExclusionReason, FileOutcome, FileStatus, Result,
    RewriteKind, RewriteStats,
};

pub use crate::rewrite::{
    classify, ClassificationPolicy, DefaultMembers, Modernizer, Nodiscard, OverrideSpecifier,
    SourceMap, TrailingReturn, Transform, TransformOutput,
};

pub use crate::config::{load_config, ConfigSource, ModernizeConfig};

pub use crate::commands::{run, ModernizeOptions, RunSummary};
