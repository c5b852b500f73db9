use crate::core::{Error, Result, RewriteKind};
use crate::io::walker::{DEFAULT_EXTENSIONS, DEFAULT_SKIP_DIRS};
use crate::rewrite::classify::{default_macro_markers, default_signal_sections};
use crate::rewrite::ClassificationPolicy;
use serde::{Deserialize, Serialize};

/// Root of `.cppmodernize.toml`. Every section and field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ModernizeConfig {
    #[serde(default)]
    pub transforms: TransformsConfig,

    #[serde(default)]
    pub trailing_return: TrailingReturnConfig,

    #[serde(default, rename = "override")]
    pub override_specifier: OverrideConfig,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub macros: MacrosConfig,
}

/// Which transforms run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformsConfig {
    #[serde(default = "default_true")]
    pub trailing_return: bool,

    #[serde(default = "default_true")]
    pub nodiscard: bool,

    #[serde(default = "default_true")]
    pub r#override: bool,

    #[serde(default = "default_true")]
    pub default_members: bool,
}

impl Default for TransformsConfig {
    fn default() -> Self {
        Self {
            trailing_return: true,
            nodiscard: true,
            r#override: true,
            default_members: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrailingReturnConfig {
    /// Leave `void` functions in traditional form
    #[serde(default = "default_true")]
    pub suppress_void: bool,

    /// Also convert `Q_INVOKABLE` declarations; older moc versions reject
    /// trailing return types
    #[serde(default = "default_true")]
    pub convert_invokables: bool,
}

impl Default for TrailingReturnConfig {
    fn default() -> Self {
        Self {
            suppress_void: true,
            convert_invokables: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideConfig {
    /// Assume a base class defined in another file declares the virtual
    #[serde(default = "default_true")]
    pub trust_external_bases: bool,
}

impl Default for OverrideConfig {
    fn default() -> Self {
        Self {
            trust_external_bases: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilesConfig {
    /// File extensions to process, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names never descended into
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,

    /// Glob patterns; matching files are left alone
    #[serde(default)]
    pub ignore: Vec<String>,

    #[serde(default)]
    pub respect_gitignore: bool,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            skip_dirs: default_skip_dirs(),
            ignore: Vec::new(),
            respect_gitignore: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MacrosConfig {
    #[serde(default = "default_macro_markers")]
    pub markers: Vec<String>,

    #[serde(default = "default_signal_sections")]
    pub signal_sections: Vec<String>,
}

impl Default for MacrosConfig {
    fn default() -> Self {
        Self {
            markers: default_macro_markers(),
            signal_sections: default_signal_sections(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_skip_dirs() -> Vec<String> {
    DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect()
}

impl ModernizeConfig {
    /// Reject settings that would make a run silently do nothing useful.
    pub fn validate(&self) -> Result<()> {
        if self.files.extensions.is_empty() {
            return Err(Error::configuration("files.extensions must not be empty"));
        }
        if self.files.extensions.iter().any(|e| e.trim().is_empty()) {
            return Err(Error::configuration("files.extensions contains an empty entry"));
        }
        if self.macros.markers.iter().any(|m| m.trim().is_empty()) {
            return Err(Error::configuration("macros.markers contains an empty entry"));
        }
        if self.macros.signal_sections.iter().any(|s| s.trim().is_empty()) {
            return Err(Error::configuration(
                "macros.signal_sections contains an empty entry",
            ));
        }
        for pattern in &self.files.ignore {
            glob::Pattern::new(pattern).map_err(|e| {
                Error::configuration(format!("invalid ignore pattern {pattern:?}: {e}"))
            })?;
        }
        Ok(())
    }

    /// Enabled transforms in pipeline order.
    pub fn enabled_kinds(&self) -> Vec<RewriteKind> {
        RewriteKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                RewriteKind::TrailingReturn => self.transforms.trailing_return,
                RewriteKind::Nodiscard => self.transforms.nodiscard,
                RewriteKind::Override => self.transforms.r#override,
                RewriteKind::DefaultMember => self.transforms.default_members,
            })
            .collect()
    }

    pub fn classification_policy(&self) -> ClassificationPolicy {
        ClassificationPolicy {
            suppress_void: self.trailing_return.suppress_void,
            macro_markers: self.macros.markers.clone(),
            signal_sections: self.macros.signal_sections.clone(),
            convert_invokables: self.trailing_return.convert_invokables,
            trust_external_bases: self.override_specifier.trust_external_bases,
        }
    }
}
