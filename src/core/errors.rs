//! Errors that stop a run before any file is rewritten, plus the per-file
//! I/O error that is recorded in a [`FileOutcome`](crate::core::FileOutcome).

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a specific file failed
    #[error("{}: {message}", display_path(.path))]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The directory to modernize is missing or is not a directory
    #[error("Target directory not found: {}", .0.display())]
    MissingTarget(PathBuf),

    /// `.cppmodernize.toml` could not be parsed or failed validation
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An ignore glob did not compile
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unknown path>".to_string())
}

impl Error {
    pub fn file_system(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: None,
        }
    }

    /// Like [`Error::file_system`], keeping the I/O error as the source.
    pub fn file_system_io(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: format!("{}: {}", message.into(), source),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// The file or directory the error is about, if it names one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::FileSystem { path, .. } => path.as_deref(),
            Self::MissingTarget(path) => Some(path),
            _ => None,
        }
    }

    /// Prefix the message with `context`; the variant becomes `WithContext`.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// `.context(..)` for this crate's [`Result`].
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_target_message_names_path() {
        let err = Error::MissingTarget(PathBuf::from("/no/such/dir"));
        assert_eq!(err.to_string(), "Target directory not found: /no/such/dir");
        assert_eq!(err.path(), Some(Path::new("/no/such/dir")));
    }

    #[test]
    fn test_context_wraps_message() {
        let result: Result<()> = Err(Error::configuration("empty extension list"));
        let err = result.context("Loading .cppmodernize.toml").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Loading .cppmodernize.toml: Invalid configuration: empty extension list"
        );
    }

    #[test]
    fn test_file_system_io_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::file_system_io("Failed to write file", "a.cpp", io);
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.path(), Some(Path::new("a.cpp")));
        assert_eq!(err.to_string(), "a.cpp: Failed to write file: denied");
    }
}
