//! `override` for virtual member declarations in derived classes.
//!
//! Only declarations that end in `;` inside a class with a base clause are
//! considered. When every base class is defined in the same text and none
//! of them declares a function of that name, the declaration introduces a
//! new virtual and is left alone.
//!
//! A base defined in another file cannot be inspected. By default it is
//! assumed to declare the function, which is a known false positive: a
//! brand-new virtual in a class deriving from such a base gets `override`
//! and no longer compiles. With
//! [`trust_external_bases`](ClassificationPolicy::trust_external_bases)
//! off, such classes are left alone.

use crate::core::{RewriteKind, RewriteStats};
use crate::rewrite::classify::{
    context_exclusion, contains_word, is_reserved_or_macro, leading_type_word,
    looks_like_parameter_list, CandidateContext, ClassificationPolicy,
};
use crate::rewrite::source::{ScopeKind, SourceMap};
use crate::rewrite::{splice, Transform, TransformOutput};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static VIRTUAL_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^(?P<indent>[ \t]*)",
        r"(?:\[\[nodiscard\]\][ \t]+)?virtual[ \t]+(?P<ret>[^;{}()\n]*?)\b(?P<name>[A-Za-z_]\w*)[ \t]*",
        r"\((?P<params>[^()]*)\)",
        r"(?P<after>[^;{}()\n]*?)[ \t]*;",
    ))
    .expect("virtual declaration pattern is valid")
});

#[derive(Debug, Clone, Default)]
pub struct OverrideSpecifier {
    policy: ClassificationPolicy,
}

impl OverrideSpecifier {
    pub fn new(policy: ClassificationPolicy) -> Self {
        Self { policy }
    }

    fn qualifies(&self, caps: &Captures<'_>, map: &SourceMap<'_>) -> bool {
        let (Some(whole), Some(indent), Some(name)) =
            (caps.get(0), caps.name("indent"), caps.name("name"))
        else {
            return false;
        };
        let ret = caps.name("ret").map_or("", |m| m.as_str()).trim();
        let after = caps.name("after").map_or("", |m| m.as_str());
        let params = caps.name("params").map_or("", |m| m.as_str());

        let start = whole.start() + indent.len();
        let context = CandidateContext::at(map, start..whole.end());
        if let Some(reason) = context_exclusion(whole.as_str(), &context, &self.policy) {
            log::trace!("override: {:?} skipped ({})", name.as_str(), reason.label());
            return false;
        }
        if context.scope != ScopeKind::Class {
            return false;
        }
        let Some(class) = map.enclosing_class(start) else {
            return false;
        };
        if !class.has_bases() {
            return false;
        }

        // Destructors and anything without a return type
        if ret.is_empty() || ret.ends_with('~') {
            return false;
        }
        if is_reserved_or_macro(leading_type_word(ret))
            || !looks_like_parameter_list(params, context.scope)
        {
            return false;
        }
        if after.contains('=') || contains_word(after, "override") || contains_word(after, "final")
        {
            return false;
        }

        let known_bases: Vec<&str> = class
            .bases
            .iter()
            .filter_map(|base| map.class_body(base))
            .collect();
        if known_bases.len() < class.bases.len() && !self.policy.trust_external_bases {
            log::debug!(
                "override: {} skipped, {} has a base defined elsewhere",
                name.as_str(),
                class.name
            );
            return false;
        }
        if known_bases.len() == class.bases.len()
            && !known_bases
                .iter()
                .any(|body| declares_function(body, name.as_str()))
        {
            log::debug!(
                "override: {} is not declared by any base of {}",
                name.as_str(),
                class.name
            );
            return false;
        }
        true
    }
}

/// True if `body` mentions `name` as a word directly followed by `(`.
fn declares_function(body: &str, name: &str) -> bool {
    body.match_indices(name).any(|(idx, _)| {
        let before_ok = !body[..idx]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        let rest = &body[idx + name.len()..];
        before_ok && rest.trim_start().starts_with('(')
    })
}

impl Transform for OverrideSpecifier {
    fn kind(&self) -> RewriteKind {
        RewriteKind::Override
    }

    fn apply(&self, text: &str) -> TransformOutput {
        let map = SourceMap::new(text);
        let mut stats = RewriteStats::default();
        let mut edits = Vec::new();

        for caps in VIRTUAL_DECLARATION.captures_iter(text) {
            if !self.qualifies(&caps, &map) {
                continue;
            }
            if let Some(after) = caps.name("after") {
                stats.record_rewrite(RewriteKind::Override);
                edits.push((after.end()..after.end(), " override".to_string()));
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
        OverrideSpecifier::default().apply(text).text
    }

    #[test]
    fn test_adds_override_in_derived_class() {
        let text = indoc! {"
            class View : public QAbstractItemView {
            public:
                virtual int rowCount(const QModelIndex &parent) const;
                virtual auto columnCount() const -> int;
                virtual QVariant data(int role) const ;
            };
        "};
        let expected = indoc! {"
            class View : public QAbstractItemView {
            public:
                virtual int rowCount(const QModelIndex &parent) const override;
                virtual auto columnCount() const -> int override;
                virtual QVariant data(int role) const override ;
            };
        "};
        assert_eq!(mark(text), expected);
    }

    #[test]
    fn test_leaves_ineligible_declarations_alone() {
        let text = indoc! {"
            class Plain {
            public:
                virtual int size() const;
            };
            class Derived : public External {
            public:
                virtual ~Derived();
                virtual int a() const override;
                virtual int b() const final;
                virtual int c() const = 0;
                virtual Derived &operator=(const Derived &) = default;
                // virtual int d() const;
                int e() const;
            signals:
                virtual void changed();
            };
            virtual int notInClass();
        "};
        assert_eq!(mark(text), text);
    }

    #[test]
    fn test_known_bases_must_declare_the_function() {
        let text = indoc! {"
            class Shape {
            public:
                virtual double area() const = 0;
            };
            class Circle : public Shape {
            public:
                virtual double area() const;
                virtual double radius() const;
            };
        "};
        let output = OverrideSpecifier::default().apply(text);
        assert!(output.text.contains("virtual double area() const override;"));
        assert!(output.text.contains("virtual double radius() const;"));
        assert_eq!(output.stats.rewrites_of(RewriteKind::Override), 1);
    }

    #[test]
    fn test_external_bases_can_be_distrusted() {
        let text = indoc! {"
            class Shape {
            public:
                virtual double area() const = 0;
            };
            class Circle : public Shape {
            public:
                virtual double area() const;
            };
            class Canvas : public QWidget {
            public:
                virtual bool isDirty() const;
            };
        "};
        let cautious = OverrideSpecifier::new(ClassificationPolicy {
            trust_external_bases: false,
            ..Default::default()
        });
        let output = cautious.apply(text);
        assert!(output.text.contains("virtual double area() const override;"));
        assert!(output.text.contains("virtual bool isDirty() const;"));
        assert_eq!(output.stats.rewrites_of(RewriteKind::Override), 1);

        let trusting = mark(text);
        assert!(trusting.contains("virtual bool isDirty() const override;"));
    }

    #[test]
    fn test_sees_past_nodiscard() {
        let text = "class V : public Base {\n    [[nodiscard]] virtual bool isOpen() const;\n};\n";
        assert_eq!(
            mark(text),
            "class V : public Base {\n    [[nodiscard]] virtual bool isOpen() const override;\n};\n"
        );
    }

    #[test]
    fn test_is_idempotent() {
        let text = "struct Impl : Base {\n    virtual bool run();\n};\n";
        let once = mark(text);
        assert_eq!(once, "struct Impl : Base {\n    virtual bool run() override;\n};\n");
        assert_eq!(mark(&once), once);
    }

    #[test]
    fn test_declares_function() {
        assert!(declares_function("virtual int size() const;", "size"));
        assert!(declares_function("int size ();", "size"));
        assert!(!declares_function("int resize();", "size"));
        assert!(!declares_function("int size;", "size"));
    }
}
