//! Text-to-text C++ modernization.
//!
//! Every transform is a pure function from source text to new source text
//! plus the [`RewriteStats`] it produced. Nothing in this module touches the
//! file system; committing results is the caller's job.

pub mod classify;
pub mod default_members;
pub mod nodiscard;
pub mod override_specifier;
pub mod signature;
pub mod source;

pub use classify::{classify, CandidateContext, ClassificationPolicy};
pub use default_members::DefaultMembers;
pub use nodiscard::Nodiscard;
pub use override_specifier::OverrideSpecifier;
pub use signature::{find_candidates, rewrite_candidate, ClassifiedCandidate, TrailingReturn};
pub use source::{ClassScope, ScopeKind, SourceMap};

use crate::core::{RewriteKind, RewriteStats};
use std::ops::Range;

/// Result of running one transform (or the whole pipeline) over a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub text: String,
    pub stats: RewriteStats,
}

impl TransformOutput {
    pub fn changed(&self, original: &str) -> bool {
        self.text != original
    }
}

/// A single modernization step.
pub trait Transform: Send + Sync {
    fn kind(&self) -> RewriteKind;

    /// Rewrite `text`. Must be idempotent: applying the output again yields
    /// the same text and no new rewrites.
    fn apply(&self, text: &str) -> TransformOutput;
}

/// Replace non-overlapping, ascending `edits` in `text`.
pub(crate) fn splice(text: &str, edits: Vec<(Range<usize>, String)>) -> String {
    if edits.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + edits.len() * 16);
    let mut cursor = 0;
    for (range, replacement) in edits {
        debug_assert!(range.start >= cursor, "edits must be ascending");
        out.push_str(&text[cursor..range.start]);
        out.push_str(&replacement);
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Ordered set of enabled transforms.
pub struct Modernizer {
    transforms: Vec<Box<dyn Transform>>,
}

impl Modernizer {
    pub fn new(transforms: Vec<Box<dyn Transform>>) -> Self {
        Self { transforms }
    }

    /// Build the pipeline for `kinds`, always in [`RewriteKind::ALL`] order.
    pub fn with_kinds(kinds: &[RewriteKind], policy: ClassificationPolicy) -> Self {
        let transforms = RewriteKind::ALL
            .iter()
            .filter(|kind| kinds.contains(kind))
            .map(|kind| -> Box<dyn Transform> {
                match kind {
                    RewriteKind::TrailingReturn => Box::new(TrailingReturn::new(policy.clone())),
                    RewriteKind::Nodiscard => Box::new(Nodiscard::new(policy.clone())),
                    RewriteKind::Override => Box::new(OverrideSpecifier::new(policy.clone())),
                    RewriteKind::DefaultMember => Box::new(DefaultMembers::new()),
                }
            })
            .collect();
        Self::new(transforms)
    }

    pub fn kinds(&self) -> Vec<RewriteKind> {
        self.transforms.iter().map(|t| t.kind()).collect()
    }

    /// Thread `text` through every transform in order.
    pub fn apply(&self, text: &str) -> TransformOutput {
        self.transforms.iter().fold(
            TransformOutput {
                text: text.to_string(),
                stats: RewriteStats::default(),
            },
            |acc, transform| {
                let step = transform.apply(&acc.text);
                TransformOutput {
                    text: step.text,
                    stats: acc.stats.merge(step.stats),
                }
            },
        )
    }
}

impl Default for Modernizer {
    fn default() -> Self {
        Self::with_kinds(&RewriteKind::ALL, ClassificationPolicy::default())
    }
}

impl std::fmt::Debug for Modernizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modernizer")
            .field("transforms", &self.kinds())
            .finish()
    }
}
