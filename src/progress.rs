//! Progress feedback for a modernization run.
//!
//! - **Quiet Mode**: no bar (`CPPMODERNIZE_QUIET` env var or `--quiet`)
//! - **Non-TTY**: no bar in CI or when stderr is piped
//! - **Verbose**: no bar; per-file log lines would tear it

use indicatif::{ProgressBar, ProgressStyle};

pub const TEMPLATE_FILES: &str = "{msg} {wide_bar} {pos}/{len} files ({percent}%) - {eta}";

/// Configuration for progress display behavior
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressConfig {
    /// Whether to suppress all progress output
    pub quiet_mode: bool,
    /// Verbosity level (0 = bar only, 1+ = log lines instead of a bar)
    pub verbosity: u8,
}

impl ProgressConfig {
    /// Create progress configuration from environment and CLI arguments
    pub fn from_env(quiet: bool, verbosity: u8) -> Self {
        let env_quiet = std::env::var("CPPMODERNIZE_QUIET").is_ok();
        Self {
            quiet_mode: quiet || env_quiet,
            verbosity,
        }
    }

    /// Determine if progress bars should be displayed
    pub fn should_show_progress(&self) -> bool {
        if self.quiet_mode || self.verbosity > 0 {
            return false;
        }

        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
    }
}

/// A bar counting processed files, hidden when progress should not show.
pub fn create_file_bar(len: u64, config: &ProgressConfig) -> ProgressBar {
    if !config.should_show_progress() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(TEMPLATE_FILES)
            .expect("Invalid progress bar template")
            .progress_chars("█▓▒░  "),
    );
    pb.set_message("Modernising");
    pb
}
