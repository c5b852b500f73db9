//! Empty constructor and destructor bodies become `= default`.
//!
//! ```text
//! Widget() {}              ->  Widget() = default;
//! virtual ~Widget() { }    ->  virtual ~Widget() = default;
//! Widget::~Widget() {}     ->  Widget::~Widget() = default;
//! ```

use crate::core::{RewriteKind, RewriteStats};
use crate::rewrite::classify::is_reserved_or_macro;
use crate::rewrite::source::{ScopeKind, SourceMap};
use crate::rewrite::{splice, Transform, TransformOutput};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static EMPTY_SPECIAL_MEMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^(?P<indent>[ \t]*)",
        r"(?P<decorators>(?:(?:explicit|inline|constexpr|virtual)[ \t]+)*)",
        r"(?:(?P<owner>[A-Za-z_]\w*)[ \t]*::[ \t]*)?",
        r"(?P<tilde>~?)(?P<name>[A-Za-z_]\w*)[ \t]*",
        r"\([ \t]*(?:void[ \t]*)?\)",
        r"\s*\{\s*\}(?:[ \t]*;)?",
    ))
    .expect("special member pattern is valid")
});

#[derive(Debug, Clone, Default)]
pub struct DefaultMembers;

impl DefaultMembers {
    pub fn new() -> Self {
        Self
    }

    fn qualifies(caps: &Captures<'_>, map: &SourceMap<'_>) -> bool {
        let (Some(whole), Some(indent), Some(name)) =
            (caps.get(0), caps.name("indent"), caps.name("name"))
        else {
            return false;
        };
        let name = name.as_str();
        let start = whole.start() + indent.len();
        let span = start..whole.end();
        if map.overlaps_literal(&span) || map.overlaps_preprocessor(&span) {
            return false;
        }
        if is_reserved_or_macro(name) {
            return false;
        }

        match (caps.name("owner"), map.scope_kind(start)) {
            (_, ScopeKind::Block) => false,
            (Some(owner), ScopeKind::Class) => {
                log::trace!("default: qualified {}::{} inside a class body", owner.as_str(), name);
                false
            }
            (Some(owner), _) => owner.as_str() == name,
            (None, ScopeKind::Class) => map
                .enclosing_class(start)
                .is_some_and(|class| class.name == name),
            (None, _) => is_type_name(name),
        }
    }
}

/// `Widget`, `QtWidget`; not `main`, not `WIDGET`.
fn is_type_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase()) && name.chars().any(|c| c.is_ascii_lowercase())
}

fn defaulted(caps: &Captures<'_>) -> String {
    let field = |name: &str| caps.name(name).map_or("", |m| m.as_str());
    let owner = caps
        .name("owner")
        .map(|m| format!("{}::", m.as_str()))
        .unwrap_or_default();
    format!(
        "{}{}{}{}() = default;",
        field("decorators"),
        owner,
        field("tilde"),
        field("name")
    )
}

impl Transform for DefaultMembers {
    fn kind(&self) -> RewriteKind {
        RewriteKind::DefaultMember
    }

    fn apply(&self, text: &str) -> TransformOutput {
        let map = SourceMap::new(text);
        let mut stats = RewriteStats::default();
        let mut edits = Vec::new();

        for caps in EMPTY_SPECIAL_MEMBER.captures_iter(text) {
            if !Self::qualifies(&caps, &map) {
                continue;
            }
            if let (Some(whole), Some(indent)) = (caps.get(0), caps.name("indent")) {
                stats.record_rewrite(RewriteKind::DefaultMember);
                edits.push((whole.start() + indent.len()..whole.end(), defaulted(&caps)));
            }
        }

        TransformOutput {
            text: splice(text, edits),
            stats,
        }
    }
}
