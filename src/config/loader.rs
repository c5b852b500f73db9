use std::fs;
use std::path::{Path, PathBuf};

use super::core::ModernizeConfig;
use crate::core::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".cppmodernize.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    Discovered(PathBuf),
    Explicit(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Defaults => write!(f, "built-in defaults"),
            Self::Discovered(path) | Self::Explicit(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Parse and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<ModernizeConfig> {
    let config = toml::from_str::<ModernizeConfig>(contents)
        .map_err(|e| Error::configuration(format!("Failed to parse {CONFIG_FILE_NAME}: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Load a config file the user named explicitly. Any failure is an error.
pub fn load_config_from_path(path: &Path) -> Result<ModernizeConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::file_system_io("Failed to read config file", path, e))?;
    parse_and_validate_config(&contents).map_err(|e| e.with_context(path.display().to_string()))
}

/// `start` and its parents, nearest first, at most `max_depth` entries
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

fn try_load_config_from_path(config_path: &Path) -> Option<ModernizeConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}: {}. Ignoring it.", config_path.display(), e);
            None
        }
    }
}

fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Search `start` and up to nine parents for `.cppmodernize.toml`.
/// Unreadable or invalid files are skipped with a warning.
pub fn discover_config(start: &Path) -> Option<(PathBuf, ModernizeConfig)> {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path).map(|config| (path, config)))
}

/// Resolve the configuration for a run over `target`.
pub fn load_config(explicit: Option<&Path>, target: &Path) -> Result<(ModernizeConfig, ConfigSource)> {
    if let Some(path) = explicit {
        let config = load_config_from_path(path)?;
        return Ok((config, ConfigSource::Explicit(path.to_path_buf())));
    }

    Ok(match discover_config(target) {
        Some((path, config)) => (config, ConfigSource::Discovered(path)),
        None => {
            log::debug!(
                "No config found after checking {} directories. Using defaults.",
                MAX_TRAVERSAL_DEPTH
            );
            (ModernizeConfig::default(), ConfigSource::Defaults)
        }
    })
}
