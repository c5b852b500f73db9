//! Production implementation of [`FileSystem`].

use crate::core::Result;
use crate::io::traits::FileSystem;
use std::path::Path;

/// Delegates straight to `std::fs`. Stateless, so freely shared across
/// worker threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        crate::io::read_file(path)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        crate::io::write_file(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("widget.h");
        let fs = RealFileSystem::new();

        fs.write(&path, "int f();\n").unwrap();
        assert!(fs.exists(&path));
        assert!(fs.is_file(&path));
        assert!(!fs.is_dir(&path));
        assert_eq!(fs.read_to_string(&path).unwrap(), "int f();\n");
    }

    #[test]
    fn test_read_errors_carry_the_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.cpp");
        let err = RealFileSystem::new().read_to_string(&path).unwrap_err();
        assert!(matches!(err, Error::FileSystem { .. }));
        assert_eq!(err.path(), Some(path.as_path()));
    }

    #[test]
    fn test_invalid_utf8_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.cpp");
        std::fs::write(&path, [0x69, 0x6e, 0x74, 0x20, 0xff, 0xfe]).unwrap();
        assert!(RealFileSystem::new().read_to_string(&path).is_err());
    }
}
