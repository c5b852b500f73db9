//! Lexical context for C++ source text.
//!
//! A [`SourceMap`] is computed once per text and answers the questions the
//! transforms need to stay conservative:
//!
//! - does a span overlap a comment or string literal?
//! - is an offset inside a preprocessor directive (continuation lines included)?
//! - which class body, if any, directly encloses an offset, and does that
//!   class have a base-class clause?
//! - which access label (`public:`, `signals:`, ...) governs an offset?
//!
//! Nothing here parses C++. Comments, literals and directives are found with a
//! byte scanner, class heads and access labels with regexes over a masked copy
//! of the text where those regions are blanked out.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static CLASS_HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:class|struct)\s+(?:[A-Z_][A-Z0-9_]*\s+)*([A-Za-z_]\w*)\s*(?:final\s*)?(?::\s*([^{};]*?))?\s*$",
    )
    .expect("class head pattern is valid")
});

static NAMESPACE_HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:namespace(?:\s+[\w:]+)?|extern)\s*$").expect("namespace head pattern is valid")
});

static ACCESS_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*((?:public|protected|private)(?:[ \t]+(?:slots|Q_SLOTS))?|signals|Q_SIGNALS)[ \t]*:([^:]|$)",
    )
    .expect("access label pattern is valid")
});

/// A class or struct body found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassScope {
    pub name: String,
    /// Unqualified base class names, template arguments dropped
    pub bases: Vec<String>,
}

impl ClassScope {
    pub fn has_bases(&self) -> bool {
        !self.bases.is_empty()
    }
}

/// What kind of brace scope directly encloses an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Not inside any braces
    File,
    /// `namespace x { }` or `extern "C" { }`
    Namespace,
    /// A class, struct or union body
    Class,
    /// Anything else: function bodies, initializers, enum bodies
    Block,
}

#[derive(Debug, Clone)]
struct BraceScope {
    /// Offset of the `{` through the offset of the matching `}`
    body: Range<usize>,
    kind: ScopeKind,
    class: Option<ClassScope>,
}

#[derive(Debug, Clone)]
struct AccessLabel {
    offset: usize,
    scope: Option<usize>,
    label: String,
}

#[derive(Debug, Clone)]
pub struct SourceMap<'a> {
    text: &'a str,
    masked: String,
    literals: Vec<Range<usize>>,
    preprocessor: Vec<Range<usize>>,
    scopes: Vec<BraceScope>,
    labels: Vec<AccessLabel>,
}

impl<'a> SourceMap<'a> {
    pub fn new(text: &'a str) -> Self {
        let (literals, preprocessor) = scan_regions(text);
        let masked = mask(text, &literals, &preprocessor);
        let scopes = scan_scopes(&masked);
        let mut map = Self {
            text,
            masked,
            literals,
            preprocessor,
            scopes,
            labels: Vec::new(),
        };
        map.labels = map.scan_labels();
        map
    }

    /// Copy of the text with comments, literals and directives blanked out.
    /// Byte offsets and line breaks are preserved.
    pub fn masked(&self) -> &str {
        &self.masked
    }

    /// True if `span` overlaps a comment, string or character literal.
    pub fn overlaps_literal(&self, span: &Range<usize>) -> bool {
        overlaps(&self.literals, span)
    }

    /// True if `span` overlaps a preprocessor directive.
    pub fn overlaps_preprocessor(&self, span: &Range<usize>) -> bool {
        overlaps(&self.preprocessor, span)
    }

    /// The class whose body directly encloses `offset`. Returns `None` when
    /// the innermost brace scope is not a class (a function body, a
    /// namespace) or when there is no enclosing scope.
    pub fn enclosing_class(&self, offset: usize) -> Option<&ClassScope> {
        self.innermost_scope(offset)
            .and_then(|idx| self.scopes[idx].class.as_ref())
    }

    /// Masked body text of the first class or struct called `name`.
    pub fn class_body(&self, name: &str) -> Option<&str> {
        self.scopes
            .iter()
            .find(|s| s.class.as_ref().is_some_and(|c| c.name == name))
            .map(|s| &self.masked[s.body.start + 1..s.body.end])
    }

    /// Kind of the innermost brace scope containing `offset`.
    pub fn scope_kind(&self, offset: usize) -> ScopeKind {
        self.innermost_scope(offset)
            .map(|idx| self.scopes[idx].kind)
            .unwrap_or(ScopeKind::File)
    }

    /// The access label governing `offset` inside its directly enclosing
    /// class, with internal whitespace collapsed (`public slots`).
    pub fn access_label(&self, offset: usize) -> Option<&str> {
        let scope = self.innermost_scope(offset)?;
        self.scopes[scope].class.as_ref()?;
        let end = self.labels.partition_point(|l| l.offset < offset);
        self.labels[..end]
            .iter()
            .rev()
            .find(|l| l.scope == Some(scope))
            .map(|l| l.label.as_str())
    }

    /// The nearest non-blank line that ends before the line containing
    /// `offset`, trimmed.
    pub fn previous_line(&self, offset: usize) -> Option<&'a str> {
        let line_start = self.text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
        self.text[..line_start]
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
    }

    fn innermost_scope(&self, offset: usize) -> Option<usize> {
        self.scopes
            .iter()
            .enumerate()
            .filter(|(_, s)| s.body.start < offset && offset <= s.body.end)
            .max_by_key(|(_, s)| s.body.start)
            .map(|(idx, _)| idx)
    }

    fn scan_labels(&self) -> Vec<AccessLabel> {
        ACCESS_LABEL
            .captures_iter(&self.masked)
            .filter_map(|caps| {
                let m = caps.get(1)?;
                let label = m.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
                Some(AccessLabel {
                    offset: m.start(),
                    scope: self.innermost_scope(m.start()),
                    label,
                })
            })
            .collect()
    }
}

fn overlaps(regions: &[Range<usize>], span: &Range<usize>) -> bool {
    let idx = regions.partition_point(|r| r.end <= span.start);
    regions.get(idx).is_some_and(|r| r.start < span.end)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Find comments, string/char literals and preprocessor directives.
/// Both returned lists are sorted and non-overlapping.
fn scan_regions(text: &str) -> (Vec<Range<usize>>, Vec<Range<usize>>) {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut literals = Vec::new();
    let mut preprocessor = Vec::new();
    let mut at_line_start = true;
    let mut i = 0;

    while i < len {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match b {
            b'/' if next == Some(b'/') => {
                let end = find_byte(bytes, i, b'\n').unwrap_or(len);
                literals.push(i..end);
                i = end;
                continue;
            }
            b'/' if next == Some(b'*') => {
                let end = text[i + 2..]
                    .find("*/")
                    .map(|p| i + 2 + p + 2)
                    .unwrap_or(len);
                literals.push(i..end);
                i = end;
                at_line_start = false;
                continue;
            }
            b'"' => {
                let end = if i > 0 && bytes[i - 1] == b'R' {
                    raw_string_end(text, i)
                } else {
                    quoted_end(bytes, i, b'"')
                };
                literals.push(i..end);
                i = end;
                at_line_start = false;
                continue;
            }
            // A quote after a digit is a digit separator (1'000'000)
            b'\'' if !(i > 0 && bytes[i - 1].is_ascii_hexdigit() && starts_number(bytes, i)) => {
                let end = quoted_end(bytes, i, b'\'');
                literals.push(i..end);
                i = end;
                at_line_start = false;
                continue;
            }
            b'#' if at_line_start => {
                let end = directive_end(bytes, i);
                preprocessor.push(i..end);
                i = end;
                continue;
            }
            b'\n' => at_line_start = true,
            b' ' | b'\t' | b'\r' => {}
            _ => at_line_start = false,
        }
        i += 1;
    }

    (literals, preprocessor)
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == needle).map(|p| from + p)
}

/// True if the token ending right before `quote` starts with a digit.
fn starts_number(bytes: &[u8], quote: usize) -> bool {
    let start = bytes[..quote]
        .iter()
        .rposition(|&b| !(is_ident_byte(b) || b == b'\''))
        .map(|p| p + 1)
        .unwrap_or(0);
    bytes.get(start).is_some_and(|b| b.is_ascii_digit())
}

/// End (exclusive) of a quoted literal opened at `open`. Unterminated
/// literals stop at the end of the line.
fn quoted_end(bytes: &[u8], open: usize, quote: u8) -> usize {
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// End (exclusive) of a raw string literal `R"delim( ... )delim"` whose
/// opening quote is at `open`.
fn raw_string_end(text: &str, open: usize) -> usize {
    let rest = &text[open + 1..];
    let Some(paren) = rest.find('(') else {
        return quoted_end(text.as_bytes(), open, b'"');
    };
    let delimiter = &rest[..paren];
    if delimiter.len() > 16 || delimiter.contains(|c: char| c.is_whitespace() || c == ')') {
        return quoted_end(text.as_bytes(), open, b'"');
    }
    let closing = format!("){delimiter}\"");
    rest[paren..]
        .find(&closing)
        .map(|p| open + 1 + paren + p + closing.len())
        .unwrap_or(text.len())
}

/// End (exclusive) of a directive starting at `hash`, following `\`
/// line continuations. The final newline is not included.
fn directive_end(bytes: &[u8], hash: usize) -> usize {
    let mut i = hash;
    loop {
        let Some(nl) = find_byte(bytes, i, b'\n') else {
            return bytes.len();
        };
        let mut j = nl;
        if j > 0 && bytes[j - 1] == b'\r' {
            j -= 1;
        }
        if j > 0 && bytes[j - 1] == b'\\' {
            i = nl + 1;
        } else {
            return nl;
        }
    }
}

fn mask(text: &str, literals: &[Range<usize>], preprocessor: &[Range<usize>]) -> String {
    let mut bytes = text.as_bytes().to_vec();
    for range in literals.iter().chain(preprocessor) {
        for b in &mut bytes[range.clone()] {
            if *b != b'\n' {
                *b = b' ';
            }
        }
    }
    // Regions start and end on ASCII delimiters, so blanking whole regions
    // never splits a multi-byte character.
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// `public Base, protected ns::Mixin<T>` -> `["Base", "Mixin"]`
fn base_names(clause: &str) -> Vec<String> {
    let mut depth = 0usize;
    let mut flat = String::with_capacity(clause.len());
    for c in clause.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => flat.push(c),
            _ => {}
        }
    }
    flat.split(',')
        .filter_map(|part| part.split_whitespace().last())
        .map(|name| name.rsplit("::").next().unwrap_or(name).to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

fn scan_scopes(masked: &str) -> Vec<BraceScope> {
    let bytes = masked.as_bytes();
    let mut scopes: Vec<BraceScope> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();
    let mut segment_start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'{' => {
                let head = &masked[segment_start..i];
                let class = CLASS_HEAD.captures(head).map(|caps| ClassScope {
                    name: caps[1].to_string(),
                    bases: caps.get(2).map(|m| base_names(m.as_str())).unwrap_or_default(),
                });
                let kind = if class.is_some() {
                    ScopeKind::Class
                } else if NAMESPACE_HEAD.is_match(head) {
                    ScopeKind::Namespace
                } else {
                    ScopeKind::Block
                };
                stack.push(scopes.len());
                scopes.push(BraceScope {
                    body: i..masked.len(),
                    kind,
                    class,
                });
                segment_start = i + 1;
            }
            b'}' => {
                if let Some(idx) = stack.pop() {
                    scopes[idx].body.end = i;
                }
                segment_start = i + 1;
            }
            b';' => segment_start = i + 1,
            _ => {}
        }
    }

    scopes
}
