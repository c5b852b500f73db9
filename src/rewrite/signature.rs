//! Trailing return type conversion.
//!
//! One line-anchored pattern finds signature-like spans, [`classify`] decides
//! what to do with each, and [`rewrite_candidate`] re-emits the convertible
//! ones:
//!
//! ```text
//! bool isValid(int x) const;           ->  auto isValid(int x) const -> bool;
//! bool Foo::isValid() const {          ->  auto Foo::isValid() const -> bool {
//! int size() const override;           ->  auto size() const -> int override;
//! ```

use crate::core::{Candidate, Classification, RewriteKind, RewriteStats};
use crate::rewrite::classify::{classify, CandidateContext, ClassificationPolicy};
use crate::rewrite::source::SourceMap;
use crate::rewrite::{splice, Transform, TransformOutput};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static SIGNATURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^(?P<indent>[ \t]*)",
        r"(?P<decorators>(?:(?:explicit|virtual|static|inline|constexpr|consteval|friend|Q_INVOKABLE|\[\[nodiscard\]\]|\[\[maybe_unused\]\])[ \t]+)*)",
        r"(?P<ret>(?:(?:const|volatile|unsigned|signed|long|short|typename)[ \t]+)*[A-Za-z_][\w:]*(?:[ \t]*<[^;{}()\n]*>)?(?:[ \t]+const)?)",
        r"(?P<sep>[ \t*&]+)",
        r"(?P<name>(?:[A-Za-z_]\w*::)*[A-Za-z_]\w*)",
        r"[ \t]*(?P<params>\([^()]*\))",
        r"(?P<quals>(?:[ \t]*(?:(?:const|volatile|noexcept|override|final)\b|&&|&))*)",
        r"(?:[ \t]*=[ \t]*(?P<tail>0|default|delete)\b)?",
        r"(?P<gap>[ \t]*(?:\r?\n[ \t]*)?)(?P<term>[;{:])",
    ))
    .expect("signature pattern is valid")
});

static QUALIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"const|volatile|noexcept|override|final|&&|&").expect("qualifier pattern is valid")
});

/// A candidate together with the policy's verdict on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedCandidate<'a> {
    pub candidate: Candidate<'a>,
    pub classification: Classification,
}

/// All signature-like spans in `text`, left to right, never overlapping.
pub fn find_candidates(text: &str) -> impl Iterator<Item = Candidate<'_>> {
    SIGNATURE
        .captures_iter(text)
        .filter_map(move |caps| candidate_from_captures(text, &caps))
}

fn candidate_from_captures<'a>(text: &'a str, caps: &Captures<'a>) -> Option<Candidate<'a>> {
    let whole = caps.get(0)?;
    let ret = caps.name("ret")?;
    let sep = caps.name("sep")?;
    let quals = caps.name("quals").map(|m| m.as_str()).unwrap_or("");

    let (qualifiers, virt_specifiers): (Vec<&str>, Vec<&str>) = QUALIFIER
        .find_iter(quals)
        .map(|m| m.as_str())
        .partition(|q| !matches!(*q, "override" | "final"));

    Some(Candidate {
        span: whole.range(),
        text: whole.as_str(),
        indent: caps.name("indent")?.as_str(),
        decorators: caps.name("decorators").map(|m| m.as_str()).unwrap_or(""),
        // `QObject *parent()` keeps its `*` with the type
        return_type: text[ret.start()..sep.end()].trim(),
        name: caps.name("name")?.as_str(),
        params: caps.name("params")?.as_str(),
        qualifiers,
        virt_specifiers,
        tail: caps.name("tail").map(|m| m.as_str()),
        gap: caps.name("gap").map(|m| m.as_str()).unwrap_or(""),
        terminator: caps.name("term")?.as_str().chars().next()?,
    })
}

/// Re-emit a candidate in trailing return form.
///
/// cv/ref/noexcept qualifiers stay before the arrow; `override`/`final` move
/// after the return type where the grammar requires them.
pub fn rewrite_candidate(candidate: &Candidate<'_>) -> String {
    let mut out = String::with_capacity(candidate.text.len() + 8);
    out.push_str(candidate.indent);
    out.push_str(candidate.decorators);
    out.push_str("auto ");
    out.push_str(candidate.name);
    out.push_str(candidate.params);
    for qualifier in &candidate.qualifiers {
        out.push(' ');
        out.push_str(qualifier);
    }
    out.push_str(" -> ");
    out.push_str(candidate.return_type);
    for specifier in &candidate.virt_specifiers {
        out.push(' ');
        out.push_str(specifier);
    }
    match candidate.terminator {
        ';' => out.push(';'),
        terminator => {
            if candidate.gap.contains('\n') {
                out.push_str(candidate.gap);
            } else {
                out.push(' ');
            }
            out.push(terminator);
        }
    }
    out
}

/// The trailing return type transform.
#[derive(Debug, Clone, Default)]
pub struct TrailingReturn {
    policy: ClassificationPolicy,
}

impl TrailingReturn {
    pub fn new(policy: ClassificationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ClassificationPolicy {
        &self.policy
    }

    /// Classify every candidate in `text` without rewriting anything.
    pub fn analyze<'a>(&self, text: &'a str) -> Vec<ClassifiedCandidate<'a>> {
        let map = SourceMap::new(text);
        self.analyze_with(text, &map)
    }

    fn analyze_with<'a>(&self, text: &'a str, map: &SourceMap<'_>) -> Vec<ClassifiedCandidate<'a>> {
        find_candidates(text)
            .map(|candidate| {
                let context = CandidateContext::of(map, &candidate);
                let classification = classify(&candidate, &context, &self.policy);
                log::debug!(
                    "{:?} at {}..{}: {}",
                    candidate.name,
                    candidate.span.start,
                    candidate.span.end,
                    classification.label()
                );
                ClassifiedCandidate {
                    candidate,
                    classification,
                }
            })
            .collect()
    }
}

impl Transform for TrailingReturn {
    fn kind(&self) -> RewriteKind {
        RewriteKind::TrailingReturn
    }

    fn apply(&self, text: &str) -> TransformOutput {
        let map = SourceMap::new(text);
        let mut stats = RewriteStats::default();
        let mut edits = Vec::new();

        for classified in self.analyze_with(text, &map) {
            if classified.classification.is_convertible() {
                stats.record_rewrite(RewriteKind::TrailingReturn);
                edits.push((
                    classified.candidate.span.clone(),
                    rewrite_candidate(&classified.candidate),
                ));
            } else {
                stats.record_skip(classified.classification);
            }
        }

        TransformOutput {
            text: splice(text, edits),
            stats,
        }
    }
}
