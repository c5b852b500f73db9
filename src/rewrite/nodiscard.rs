//! `[[nodiscard]]` for const getters.
//!
//! A declaration qualifies when its name reads as a query (`getX`, `isX`,
//! `hasX`), it is `const`, it returns something other than `void` and it is
//! a plain declaration ending in `;`. Both the traditional and the trailing
//! return form are recognized, so the transform can run after
//! [`TrailingReturn`](crate::rewrite::TrailingReturn).

use crate::core::{RewriteKind, RewriteStats};
use crate::rewrite::classify::{
    context_exclusion, contains_word, is_reserved_or_macro, is_void, leading_type_word,
    looks_like_parameter_list, CandidateContext, ClassificationPolicy,
};
use crate::rewrite::source::SourceMap;
use crate::rewrite::{splice, Transform, TransformOutput};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const ATTRIBUTE: &str = "[[nodiscard]] ";

static GETTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^(?P<indent>[ \t]*)",
        r"(?P<decorators>(?:(?:virtual|inline|constexpr)[ \t]+)*)",
        r"(?P<ret>[A-Za-z_][^;{}()=\n]*?)[ \t*&]+",
        r"(?P<name>(?:get|is|has)(?:[A-Z_]\w*)?)[ \t]*",
        r"\((?P<params>[^()]*)\)",
        r"(?P<after>[^;{}()\n]*);",
    ))
    .expect("getter pattern is valid")
});

#[derive(Debug, Clone, Default)]
pub struct Nodiscard {
    policy: ClassificationPolicy,
}

impl Nodiscard {
    pub fn new(policy: ClassificationPolicy) -> Self {
        Self { policy }
    }

    fn qualifies(&self, caps: &Captures<'_>, map: &SourceMap<'_>) -> bool {
        let (Some(whole), Some(indent)) = (caps.get(0), caps.name("indent")) else {
            return false;
        };
        let ret = caps.name("ret").map_or("", |m| m.as_str());
        let after = caps.name("after").map_or("", |m| m.as_str());
        let params = caps.name("params").map_or("", |m| m.as_str());

        let context = CandidateContext::at(map, whole.start() + indent.len()..whole.end());
        if let Some(reason) = context_exclusion(whole.as_str(), &context, &self.policy) {
            log::trace!("nodiscard: {:?} skipped ({})", whole.as_str().trim(), reason.label());
            return false;
        }
        if is_reserved_or_macro(leading_type_word(ret))
            || !looks_like_parameter_list(params, context.scope)
        {
            return false;
        }
        // `= 0`, `= default`, `= delete`
        if after.contains('=') {
            return false;
        }

        let (qualifiers, trailing) = match after.split_once("->") {
            Some((qualifiers, trailing)) => (qualifiers, Some(trailing)),
            None => (after, None),
        };
        if !contains_word(qualifiers, "const") {
            return false;
        }
        let returned = match trailing {
            Some(trailing) => strip_virt_specifiers(trailing),
            None => ret,
        };
        !is_void(returned)
    }
}

fn strip_virt_specifiers(trailing: &str) -> &str {
    let mut rest = trailing.trim();
    while let Some(stripped) = rest
        .strip_suffix("override")
        .or_else(|| rest.strip_suffix("final"))
    {
        rest = stripped.trim_end();
    }
    rest
}

impl Transform for Nodiscard {
    fn kind(&self) -> RewriteKind {
        RewriteKind::Nodiscard
    }

    fn apply(&self, text: &str) -> TransformOutput {
        let map = SourceMap::new(text);
        let mut stats = RewriteStats::default();
        let mut edits = Vec::new();

        for caps in GETTER.captures_iter(text) {
            if !self.qualifies(&caps, &map) {
                continue;
            }
            if let Some(decorators) = caps.name("decorators") {
                let at = decorators.start();
                stats.record_rewrite(RewriteKind::Nodiscard);
                edits.push((at..at, ATTRIBUTE.to_string()));
            }
        }

        TransformOutput {
            text: splice(text, edits),
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn mark(text: &str) -> String {
        Nodiscard::default().apply(text).text
    }

    #[test]
    fn test_traditional_getters() {
        assert_eq!(
            mark("    bool isEnabled() const;\n"),
            "    [[nodiscard]] bool isEnabled() const;\n"
        );
        assert_eq!(
            mark("    const QString &getName() const;\n"),
            "    [[nodiscard]] const QString &getName() const;\n"
        );
        assert_eq!(
            mark("    bool has_value() const noexcept;\n"),
            "    [[nodiscard]] bool has_value() const noexcept;\n"
        );
    }

    #[test]
    fn test_trailing_form_getters() {
        assert_eq!(
            mark("    auto isEnabled() const -> bool;\n"),
            "    [[nodiscard]] auto isEnabled() const -> bool;\n"
        );
        assert_eq!(
            mark("    virtual auto hasChildren() const -> bool override;\n"),
            "    [[nodiscard]] virtual auto hasChildren() const -> bool override;\n"
        );
    }

    #[test]
    fn test_non_getters_are_untouched() {
        let text = indoc! {"
            class Store {
            public:
                bool isOpen();
                int count() const;
                bool issue() const;
                void getInto(Buffer &out) const;
                auto getNothing() const -> void;
                virtual bool isReady() const = 0;
                [[nodiscard]] bool isDone() const;
                Q_INVOKABLE bool isVisible() const;
                bool hasItems() const
                {
                    return m_items;
                }
            };
        "};
        assert_eq!(mark(text), text);
    }

    #[test]
    fn test_excluded_contexts() {
        let text = indoc! {"
            // bool isOld() const;
            #define GETTER bool isMacro() const;
            class Emitter : public QObject {
                Q_OBJECT
            signals:
                bool isSignal() const;
            };
            void run() {
                bool isLocal() const;
            }
        "};
        assert_eq!(mark(text), text);
    }

    #[test]
    fn test_counts_and_idempotence() {
        let text = "bool isA() const;\nint getB() const;\n";
        let output = Nodiscard::default().apply(text);
        assert_eq!(output.stats.rewrites_of(RewriteKind::Nodiscard), 2);
        let again = Nodiscard::default().apply(&output.text);
        assert_eq!(again.text, output.text);
        assert_eq!(again.stats.total_rewrites(), 0);
    }

    #[test]
    fn test_strip_virt_specifiers() {
        assert_eq!(strip_virt_specifiers(" bool override"), "bool");
        assert_eq!(strip_virt_specifiers(" void final"), "void");
        assert_eq!(strip_virt_specifiers(" QString"), "QString");
    }
}
