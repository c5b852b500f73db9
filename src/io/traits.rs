//! I/O trait definitions.
//!
//! Rewriting is a pure text-to-text step; everything that touches the disk
//! goes through [`FileSystem`] so the run orchestration can be exercised
//! against an in-memory implementation.

use crate::core::Result;
use std::path::Path;

/// File system operations used by a modernization run.
///
/// Implementations must be `Send + Sync`: files are processed in parallel.
pub trait FileSystem: Send + Sync {
    /// Read a file's contents as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileSystem` if the file is missing, unreadable or not
    /// valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replace a file's contents.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;
}
