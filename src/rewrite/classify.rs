//! Classification of signature candidates.
//!
//! [`classify`] is a pure function from a matched [`Candidate`], the lexical
//! [`CandidateContext`] around it and a [`ClassificationPolicy`] to a
//! [`Classification`]. It does no I/O and never looks at other candidates.
//!
//! When in doubt the answer is "leave it alone": a missed conversion is
//! acceptable, corrupting valid code is not.

use crate::core::{Candidate, Classification, ExclusionReason};
use crate::rewrite::source::{ScopeKind, SourceMap};
use std::ops::Range;

/// Words that can never be a return type or a function name. Most of these
/// show up when a statement (`return foo(x);`, `else if (x) {`) or a
/// constructor (`explicit Widget(QObject *parent);`) happens to fit the
/// signature pattern.
const RESERVED_WORDS: &[&str] = &[
    "alignas", "alignof", "case", "catch", "class", "co_await", "co_return", "co_yield",
    "const", "consteval", "constexpr", "default", "defined", "delete", "do", "else", "enum",
    "explicit", "extern", "false", "for", "friend", "goto", "if", "inline", "namespace", "new",
    "noexcept", "nullptr", "operator", "private", "protected", "public", "return", "sizeof",
    "static", "static_assert", "struct", "switch", "template", "this", "throw", "true", "try",
    "typedef", "typeid", "union", "using", "virtual", "volatile", "while",
];

/// Builtin types accepted as an unnamed parameter (`void f(int);`).
const BUILTIN_TYPES: &[&str] = &[
    "auto", "bool", "char", "char8_t", "char16_t", "char32_t", "double", "float", "int", "long",
    "short", "signed", "unsigned", "wchar_t",
];

/// Tunable parts of the classification policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationPolicy {
    /// Leave `void` functions in traditional form
    pub suppress_void: bool,
    /// Framework macro markers; a candidate mentioning one is left alone
    pub macro_markers: Vec<String>,
    /// Access labels whose sections hold framework signals
    pub signal_sections: Vec<String>,
    /// Convert declarations decorated with `Q_INVOKABLE`
    pub convert_invokables: bool,
    /// Treat a base class defined in another file as declaring every
    /// virtual of a derived class
    pub trust_external_bases: bool,
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self {
            suppress_void: true,
            macro_markers: default_macro_markers(),
            signal_sections: default_signal_sections(),
            convert_invokables: true,
            trust_external_bases: true,
        }
    }
}

pub fn default_macro_markers() -> Vec<String> {
    [
        "Q_SIGNAL", "Q_SIGNALS", "Q_PROPERTY", "Q_ENUM", "Q_ENUMS", "Q_FLAG", "Q_FLAGS",
        "Q_EMIT", "emit", "signals",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn default_signal_sections() -> Vec<String> {
    vec!["signals".to_string(), "Q_SIGNALS".to_string()]
}

/// Lexical facts about where a candidate sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateContext<'a> {
    pub in_literal: bool,
    pub in_preprocessor: bool,
    pub scope: ScopeKind,
    pub access_label: Option<&'a str>,
    pub previous_line: Option<&'a str>,
}

impl<'a> CandidateContext<'a> {
    pub fn of(map: &'a SourceMap<'a>, candidate: &Candidate<'_>) -> Self {
        Self::at(map, candidate.signature_start()..candidate.span.end)
    }

    /// Context of an arbitrary span, indentation already excluded.
    pub fn at(map: &'a SourceMap<'a>, span: Range<usize>) -> Self {
        Self {
            in_literal: map.overlaps_literal(&span),
            in_preprocessor: map.overlaps_preprocessor(&span),
            scope: map.scope_kind(span.start),
            access_label: map.access_label(span.start),
            previous_line: map.previous_line(span.start),
        }
    }

    /// Context of a candidate at file scope with nothing around it.
    pub fn detached() -> Self {
        Self {
            in_literal: false,
            in_preprocessor: false,
            scope: ScopeKind::File,
            access_label: None,
            previous_line: None,
        }
    }
}

pub fn classify(
    candidate: &Candidate<'_>,
    context: &CandidateContext<'_>,
    policy: &ClassificationPolicy,
) -> Classification {
    if context.in_literal {
        return Classification::Excluded(ExclusionReason::CommentOrString);
    }
    if context.in_preprocessor {
        return Classification::Excluded(ExclusionReason::Preprocessor);
    }
    if !is_declaration(candidate, context) {
        return Classification::Excluded(ExclusionReason::NotADeclaration);
    }
    if is_already_converted(candidate) {
        return Classification::AlreadyConverted;
    }
    match candidate.tail {
        Some("0") => return Classification::PureVirtual,
        Some(_) => return Classification::Excluded(ExclusionReason::SpecialMemberTail),
        None => {}
    }
    if involves_macro(candidate, context, policy) {
        return Classification::Excluded(ExclusionReason::FrameworkMacro);
    }
    if in_signal_section(context, policy) {
        return Classification::Excluded(ExclusionReason::SignalSection);
    }
    if policy.suppress_void && is_void(candidate.return_type) {
        return Classification::Excluded(ExclusionReason::VoidReturn);
    }
    Classification::Convertible
}

/// Exclusions that depend only on where `text` sits, shared by the
/// transforms that insert specifiers rather than re-emit signatures.
pub fn context_exclusion(
    text: &str,
    context: &CandidateContext<'_>,
    policy: &ClassificationPolicy,
) -> Option<ExclusionReason> {
    if context.in_literal {
        return Some(ExclusionReason::CommentOrString);
    }
    if context.in_preprocessor {
        return Some(ExclusionReason::Preprocessor);
    }
    if context.scope == ScopeKind::Block {
        return Some(ExclusionReason::NotADeclaration);
    }
    if mentions_marker(text, context, policy) {
        return Some(ExclusionReason::FrameworkMacro);
    }
    if in_signal_section(context, policy) {
        return Some(ExclusionReason::SignalSection);
    }
    None
}

fn in_signal_section(context: &CandidateContext<'_>, policy: &ClassificationPolicy) -> bool {
    context
        .access_label
        .is_some_and(|label| policy.signal_sections.iter().any(|s| s == label))
}

fn mentions_marker(text: &str, context: &CandidateContext<'_>, policy: &ClassificationPolicy) -> bool {
    policy.macro_markers.iter().any(|marker| {
        contains_word(text, marker)
            || context
                .previous_line
                .is_some_and(|line| is_marker_invocation(line, marker))
    })
}

/// First word of a type, cv-qualifiers skipped: `const QString &` -> `QString`.
pub(crate) fn leading_type_word(return_type: &str) -> &str {
    return_type_base(return_type)
        .split(|c: char| c.is_whitespace() || c == '*' || c == '&' || c == '<')
        .next()
        .unwrap_or("")
}

pub(crate) fn is_reserved_or_macro(word: &str) -> bool {
    is_reserved(word) || word.starts_with("Q_") || is_macro_like(word)
}

fn is_already_converted(candidate: &Candidate<'_>) -> bool {
    let base = return_type_base(candidate.return_type);
    leading_type_word(candidate.return_type) == "auto"
        || base.starts_with("decltype")
        || candidate.text.contains("->")
}

/// Return type with leading cv-qualifiers removed (`const QString &` -> `QString &`).
fn return_type_base(return_type: &str) -> &str {
    let mut rest = return_type.trim();
    loop {
        let stripped = ["const ", "volatile ", "typename "]
            .iter()
            .find_map(|prefix| rest.strip_prefix(prefix));
        match stripped {
            Some(next) => rest = next.trim_start(),
            None => return rest,
        }
    }
}

pub(crate) fn is_void(return_type: &str) -> bool {
    return_type.trim() == "void"
}

fn is_declaration(candidate: &Candidate<'_>, context: &CandidateContext<'_>) -> bool {
    // Inside a function body `Foo bar(x);` is a variable, not a prototype
    if context.scope == ScopeKind::Block {
        return false;
    }
    if is_reserved(leading_type_word(candidate.return_type)) {
        return false;
    }
    let unqualified_name = candidate.name.rsplit("::").next().unwrap_or(candidate.name);
    if is_reserved(unqualified_name) {
        return false;
    }
    looks_like_parameter_list(candidate.inner_params(), context.scope)
}

fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

fn involves_macro(
    candidate: &Candidate<'_>,
    context: &CandidateContext<'_>,
    policy: &ClassificationPolicy,
) -> bool {
    let base = return_type_base(candidate.return_type);
    base.starts_with("Q_")
        || is_macro_like(base)
        || (!policy.convert_invokables && has_framework_decorator(candidate.decorators))
        || mentions_marker(candidate.text, context, policy)
}

/// `Q_INVOKABLE` and friends in front of the return type.
fn has_framework_decorator(decorators: &str) -> bool {
    decorators.split_whitespace().any(|word| word.starts_with("Q_"))
}

/// `SOME_EXPORT_MACRO`: all uppercase with at least one underscore.
fn is_macro_like(word: &str) -> bool {
    let word = word
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .next()
        .unwrap_or("");
    word.contains('_')
        && word.chars().any(|c| c.is_ascii_uppercase())
        && !word.chars().any(|c| c.is_ascii_lowercase())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub(crate) fn contains_word(haystack: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    haystack.match_indices(word).any(|(idx, _)| {
        let before = haystack[..idx].chars().next_back();
        let after = haystack[idx + word.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

/// `Q_SIGNAL` or `Q_PROPERTY(...)` alone on a line; `signals:` is a label,
/// not an invocation.
fn is_marker_invocation(line: &str, marker: &str) -> bool {
    !marker.is_empty()
        && line.strip_prefix(marker).is_some_and(|rest| {
            let rest = rest.trim_start();
            rest.is_empty() || rest.starts_with('(')
        })
}

/// True if the text between the parentheses reads like parameter
/// declarations rather than call arguments or an initializer.
///
/// Outside a class body `QMutex mutex(QMutex::Recursive);` defines an
/// object, so a parameter there must be more than one bare non-builtin word.
pub(crate) fn looks_like_parameter_list(inner: &str, scope: ScopeKind) -> bool {
    let inner = inner.trim();
    if inner.is_empty() || inner == "void" {
        return true;
    }
    if inner.contains(['"', '\'']) {
        return false;
    }
    split_top_level(inner, ',')
        .iter()
        .all(|param| looks_like_parameter(param, scope))
}

fn looks_like_parameter(param: &str, scope: ScopeKind) -> bool {
    let param = param.trim();
    if param == "..." {
        return true;
    }
    // Default arguments may contain anything
    let declaration = split_top_level(param, '=')[0].trim();
    if declaration.is_empty() {
        return false;
    }
    if declaration.starts_with(|c: char| {
        c.is_ascii_digit() || matches!(c, '-' | '+' | '!' | '&' | '*' | '~' | '{' | '[')
    }) {
        return false;
    }
    if declaration.contains(['+', '-', '/', '%', '|', '^', '!', '?', '.', ';', '{', '}']) {
        return false;
    }

    let without_templates = strip_template_args(declaration);
    let words: Vec<&str> = without_templates
        .split(|c: char| c.is_whitespace() || c == '*' || c == '&')
        .filter(|w| !w.is_empty())
        .collect();

    match words.as_slice() {
        [] => false,
        [single] => {
            declaration.contains(['*', '&', '<'])
                || BUILTIN_TYPES.contains(single)
                || (scope == ScopeKind::Class && is_type_like(single))
        }
        [first, ..] => {
            !is_reserved(first) || matches!(*first, "const" | "volatile" | "struct" | "class" | "enum")
        }
    }
}

/// A lone identifier that reads as a type: `size_t`, `QString`, `ns::Widget`.
fn is_type_like(word: &str) -> bool {
    if word.ends_with("_t") {
        return true;
    }
    let last = word.rsplit("::").next().unwrap_or(word);
    last.starts_with(|c: char| c.is_ascii_uppercase()) && last.chars().any(|c| c.is_ascii_lowercase())
}

fn strip_template_args(text: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Split on `separator` outside of `<>`, `()`, `[]` and `{}` nesting.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth -= 1,
            _ if c == separator && depth <= 0 => {
                parts.push(&text[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
