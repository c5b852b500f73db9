pub mod errors;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;
use std::path::PathBuf;

pub use errors::{Error, Result, ResultExt};

/// The modernizations the tool knows how to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteKind {
    TrailingReturn,
    Nodiscard,
    Override,
    DefaultMember,
}

impl RewriteKind {
    /// Pipeline order. Later transforms see the output of earlier ones.
    pub const ALL: [RewriteKind; 4] = [
        RewriteKind::TrailingReturn,
        RewriteKind::Nodiscard,
        RewriteKind::Override,
        RewriteKind::DefaultMember,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::TrailingReturn => "Trailing return types",
            Self::Nodiscard => "[[nodiscard]] added",
            Self::Override => "override added",
            Self::DefaultMember => "= default members",
        }
    }
}

impl std::fmt::Display for RewriteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::TrailingReturn => "trailing-return",
            Self::Nodiscard => "nodiscard",
            Self::Override => "override",
            Self::DefaultMember => "default-members",
        };
        write!(f, "{name}")
    }
}

/// Why a candidate was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// A framework macro (`Q_SIGNAL`, `Q_PROPERTY`, `emit`, ...) is involved
    FrameworkMacro,
    /// Declared inside a `signals:` / `Q_SIGNALS:` section
    SignalSection,
    /// Returns `void` and void suppression is on
    VoidReturn,
    /// Overlaps a comment or a string literal
    CommentOrString,
    /// Part of a preprocessor directive
    Preprocessor,
    /// Looks like a statement, call or variable initialization
    NotADeclaration,
    /// Ends in `= default` or `= delete`
    SpecialMemberTail,
}

impl ExclusionReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FrameworkMacro => "framework_macro",
            Self::SignalSection => "signal_section",
            Self::VoidReturn => "void_return",
            Self::CommentOrString => "comment_or_string",
            Self::Preprocessor => "preprocessor",
            Self::NotADeclaration => "not_a_declaration",
            Self::SpecialMemberTail => "special_member_tail",
        }
    }
}

/// Outcome of classifying one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Convertible,
    AlreadyConverted,
    PureVirtual,
    Excluded(ExclusionReason),
}

impl Classification {
    pub fn is_convertible(&self) -> bool {
        matches!(self, Self::Convertible)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Convertible => "convertible",
            Self::AlreadyConverted => "already_converted",
            Self::PureVirtual => "pure_virtual",
            Self::Excluded(reason) => reason.label(),
        }
    }
}

/// A located span of source text that looks like a function signature.
///
/// All string fields borrow from the source the candidate was matched in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    /// Byte offsets of the whole match within the source
    pub span: Range<usize>,
    /// The matched text (`&source[span]`)
    pub text: &'a str,
    pub indent: &'a str,
    /// Decorator keywords including their trailing whitespace, may be empty
    pub decorators: &'a str,
    /// Return type with pointer/reference marks, surrounding whitespace trimmed
    pub return_type: &'a str,
    /// Function name, possibly class-qualified (`Foo::bar`)
    pub name: &'a str,
    /// Parameter list including the parentheses
    pub params: &'a str,
    /// `const`, `volatile`, `&`, `&&`, `noexcept` in source order
    pub qualifiers: Vec<&'a str>,
    /// `override` / `final` in source order
    pub virt_specifiers: Vec<&'a str>,
    /// Right-hand side of a `= 0` / `= default` / `= delete` tail
    pub tail: Option<&'a str>,
    /// Whitespace between the last signature token and the terminator
    pub gap: &'a str,
    /// `;`, `{` or `:`
    pub terminator: char,
}

impl Candidate<'_> {
    /// Byte offset where the signature proper starts (after indentation).
    pub fn signature_start(&self) -> usize {
        self.span.start + self.indent.len()
    }

    /// Parameter list without the surrounding parentheses.
    pub fn inner_params(&self) -> &str {
        self.params
            .strip_prefix('(')
            .and_then(|p| p.strip_suffix(')'))
            .unwrap_or(self.params)
    }
}

/// Aggregate counters for one text, one file, or a whole run.
///
/// Produced per file and merged by the caller, so parallel runs need no
/// shared mutable state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    pub files_scanned: usize,
    pub files_modified: usize,
    pub files_failed: usize,
    pub rewrites: BTreeMap<RewriteKind, usize>,
    pub skipped: BTreeMap<&'static str, usize>,
}

impl RewriteStats {
    pub fn record_rewrite(&mut self, kind: RewriteKind) {
        *self.rewrites.entry(kind).or_insert(0) += 1;
    }

    pub fn record_skip(&mut self, classification: Classification) {
        *self.skipped.entry(classification.label()).or_insert(0) += 1;
    }

    pub fn rewrites_of(&self, kind: RewriteKind) -> usize {
        self.rewrites.get(&kind).copied().unwrap_or(0)
    }

    pub fn skipped_as(&self, label: &str) -> usize {
        self.skipped.get(label).copied().unwrap_or(0)
    }

    pub fn total_rewrites(&self) -> usize {
        self.rewrites.values().sum()
    }

    pub fn merge(mut self, other: RewriteStats) -> RewriteStats {
        self.files_scanned += other.files_scanned;
        self.files_modified += other.files_modified;
        self.files_failed += other.files_failed;
        for (kind, count) in other.rewrites {
            *self.rewrites.entry(kind).or_insert(0) += count;
        }
        for (label, count) in other.skipped {
            *self.skipped.entry(label).or_insert(0) += count;
        }
        self
    }
}

/// What happened to a single file during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Unchanged,
    /// Content changed; written unless the run is a dry run
    Modified,
    /// Read or write failed; the file was skipped
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
    pub stats: RewriteStats,
}

impl FileOutcome {
    pub fn is_modified(&self) -> bool {
        self.status == FileStatus::Modified
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, FileStatus::Failed(_))
    }
}
