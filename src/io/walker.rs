use crate::core::{Error, Result};
use glob::Pattern;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSIONS: &[&str] = &["h", "hh", "hpp", "hxx", "cpp", "cc", "cxx"];
pub const DEFAULT_SKIP_DIRS: &[&str] = &["build", ".git", "external", "_deps", "node_modules"];

/// Enumerates the C++ sources under a directory.
pub struct FileWalker {
    root: PathBuf,
    extensions: Vec<String>,
    skip_dirs: Vec<String>,
    ignore_patterns: Vec<String>,
    respect_gitignore: bool,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            ignore_patterns: vec![],
            respect_gitignore: false,
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();
        self
    }

    pub fn with_skip_dirs(mut self, skip_dirs: Vec<String>) -> Self {
        self.skip_dirs = skip_dirs;
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn respect_gitignore(mut self, enabled: bool) -> Self {
        self.respect_gitignore = enabled;
        self
    }

    /// All matching files, sorted.
    ///
    /// # Errors
    ///
    /// Fails on an invalid ignore pattern or when the root cannot be read.
    /// Entries below the root that cannot be read are logged and skipped.
    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let patterns = self
            .ignore_patterns
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        fs::read_dir(&self.root)
            .map_err(|e| Error::file_system_io("Cannot read directory", &self.root, e))?;

        let skip_dirs = self.skip_dirs.clone();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .ignore(self.respect_gitignore)
            .parents(self.respect_gitignore)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                entry.depth() == 0
                    || !is_dir
                    || !skip_dirs
                        .iter()
                        .any(|skip| entry.file_name().to_string_lossy() == skip.as_str())
            })
            .build();

        let entries = walker.map(|entry| entry.map(|e| e.into_path()));
        let mut files: Vec<PathBuf> = readable_paths(entries)
            .filter(|path| path.is_file() && self.should_process(path, &patterns))
            .collect();

        files.sort();
        log::debug!("Found {} source files under {}", files.len(), self.root.display());
        Ok(files)
    }

    fn should_process(&self, path: &Path, patterns: &[Pattern]) -> bool {
        let Some(ext) = path.extension() else {
            return false;
        };
        let ext = ext.to_string_lossy();
        if !self.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
            return false;
        }

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let matched = patterns
            .iter()
            .find(|p| p.matches_path(relative) || p.matches_path(path));
        if let Some(pattern) = matched {
            log::debug!("Ignoring {} (matches {})", path.display(), pattern);
            return false;
        }
        true
    }
}

/// Drops the entries the walk could not read, logging each one.
fn readable_paths(
    entries: impl Iterator<Item = std::result::Result<PathBuf, ignore::Error>>,
) -> impl Iterator<Item = PathBuf> {
    entries.filter_map(|entry| match entry {
        Ok(path) => Some(path),
        Err(err) => {
            log::warn!("Skipping unreadable entry: {}", err);
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "int f();\n").unwrap();
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_walk_filters_extensions_and_skip_dirs() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for file in [
            "src/widget.cpp",
            "src/widget.h",
            "include/api.hpp",
            "README.md",
            "build/generated.cpp",
            "third/_deps/dep.cc",
            ".git/hooks/x.h",
        ] {
            touch(root, file);
        }

        let files = FileWalker::new(root.to_path_buf()).walk().unwrap();
        assert_eq!(
            names(root, &files),
            vec!["include/api.hpp", "src/widget.cpp", "src/widget.h"]
        );
    }

    #[test]
    fn test_ignore_patterns_and_custom_extensions() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for file in ["a.cpp", "gen/moc_a.cpp", "b.ipp", "c.CPP"] {
            touch(root, file);
        }

        let files = FileWalker::new(root.to_path_buf())
            .with_extensions(vec![".cpp".into(), "ipp".into()])
            .with_ignore_patterns(vec!["**/moc_*".into()])
            .walk()
            .unwrap();
        assert_eq!(names(root, &files), vec!["a.cpp", "b.ipp", "c.CPP"]);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = FileWalker::new(dir.path().to_path_buf())
            .with_ignore_patterns(vec!["[".into()])
            .walk();
        assert!(matches!(result, Err(Error::Pattern(_))));
    }

    #[test]
    fn test_root_named_like_a_skip_dir_is_still_walked() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("build");
        touch(&root, "a.h");
        let files = FileWalker::new(root.clone()).walk().unwrap();
        assert_eq!(names(&root, &files), vec!["a.h"]);
    }

    #[test]
    fn test_unreadable_entries_are_skipped() {
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let entries = vec![
            Ok(PathBuf::from("src/a.cpp")),
            Err(ignore::Error::WithPath {
                path: PathBuf::from("src/private"),
                err: Box::new(ignore::Error::Io(denied)),
            }),
            Ok(PathBuf::from("src/b.cpp")),
        ];
        let paths: Vec<PathBuf> = readable_paths(entries.into_iter()).collect();
        assert_eq!(paths, vec![PathBuf::from("src/a.cpp"), PathBuf::from("src/b.cpp")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_does_not_stop_the_walk() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "src/widget.h");
        touch(root, "locked/hidden.h");
        let locked = root.join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let result = FileWalker::new(root.to_path_buf()).walk();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let files = result.unwrap();
        assert!(names(root, &files).contains(&"src/widget.h".to_string()));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = FileWalker::new(dir.path().join("gone")).walk();
        assert!(matches!(result, Err(Error::FileSystem { .. })));
    }
}
