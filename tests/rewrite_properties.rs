//! Property-based tests for the rewrite pipeline
//!
//! These tests verify invariants that should hold for all inputs:
//! - Every transform, and the whole pipeline, is idempotent
//! - Pure virtual declarations come out byte-identical
//! - void declarations are never converted under the default policy
//! - Anything inside a comment is left alone

use cppmodernize::{Modernizer, RewriteKind, Transform, TrailingReturn};
use proptest::prelude::*;

/// Words that would turn a generated declaration into something else
const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "consteval", "constexpr", "defined", "final", "namespace", "nullptr",
    "typeid", "auto", "bool", "break", "case", "catch", "char", "class", "const", "continue", "default",
    "delete", "do", "double", "else", "emit", "enum", "explicit", "extern", "false", "float", "for",
    "friend", "goto", "if", "inline", "int", "long", "new", "noexcept", "operator", "override",
    "private", "protected", "public", "return", "short", "signals", "signed", "sizeof", "static",
    "struct", "switch", "template", "this", "throw", "true", "try", "typedef", "typename",
    "union", "unsigned", "using", "virtual", "void", "volatile", "while",
];

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,10}".prop_filter("not a keyword", |s| !CPP_KEYWORDS.contains(&s.as_str()))
}

fn return_type() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "int",
        "bool",
        "void",
        "QString",
        "const QString &",
        "QObject *",
        "std::vector<int>",
        "unsigned long",
        "double",
    ])
    .prop_map(str::to_string)
}

fn parameters() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "",
        "int x",
        "const QString &name",
        "QObject *parent = nullptr",
        "int a, bool b",
    ])
    .prop_map(str::to_string)
}

/// One member declaration line, possibly virtual, const or pure.
fn declaration() -> impl Strategy<Value = String> {
    (
        any::<bool>(),
        return_type(),
        identifier(),
        parameters(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(is_virtual, ret, name, params, is_const, is_pure)| {
            let mut line = String::from("    ");
            if is_virtual {
                line.push_str("virtual ");
            }
            line.push_str(&ret);
            if !ret.ends_with(['*', '&']) {
                line.push(' ');
            }
            line.push_str(&name);
            line.push('(');
            line.push_str(&params);
            line.push(')');
            if is_const {
                line.push_str(" const");
            }
            if is_virtual && is_pure {
                line.push_str(" = 0");
            }
            line.push(';');
            line
        })
}

fn class_text(lines: &[String]) -> String {
    format!(
        "class Generated : public Base {{\npublic:\n{}\n}};\n",
        lines.join("\n")
    )
}

proptest! {
    #[test]
    fn prop_pipeline_is_idempotent(lines in prop::collection::vec(declaration(), 1..12)) {
        let text = class_text(&lines);
        let modernizer = Modernizer::default();
        let once = modernizer.apply(&text);
        let twice = modernizer.apply(&once.text);
        prop_assert_eq!(&twice.text, &once.text);
        prop_assert_eq!(twice.stats.total_rewrites(), 0);
    }

    #[test]
    fn prop_each_transform_is_idempotent(
        lines in prop::collection::vec(declaration(), 1..12),
        kind in prop::sample::select(RewriteKind::ALL.to_vec())
    ) {
        let text = class_text(&lines);
        let modernizer = Modernizer::with_kinds(&[kind], Default::default());
        let once = modernizer.apply(&text);
        prop_assert_eq!(modernizer.apply(&once.text).text, once.text);
    }

    #[test]
    fn prop_pure_virtuals_are_preserved(lines in prop::collection::vec(declaration(), 1..12)) {
        let text = class_text(&lines);
        let output = Modernizer::default().apply(&text);
        for line in lines.iter().filter(|l| l.contains("= 0")) {
            prop_assert!(
                output.text.lines().any(|out| out == line.as_str()),
                "pure virtual changed: {}",
                line
            );
        }
    }

    #[test]
    fn prop_void_is_never_converted(name in identifier(), params in parameters()) {
        let text = format!("void {}({});\n", name, params);
        prop_assert_eq!(TrailingReturn::default().apply(&text).text, text);
    }

    #[test]
    fn prop_comments_are_left_alone(lines in prop::collection::vec(declaration(), 1..6)) {
        let commented: Vec<String> = lines.iter().map(|l| format!("// {}", l.trim())).collect();
        let block = format!("/*\n{}\n*/\n", lines.join("\n"));
        for text in [commented.join("\n"), block] {
            prop_assert_eq!(Modernizer::default().apply(&text).text, text);
        }
    }

    #[test]
    fn prop_conversion_keeps_the_pieces(
        ret in return_type().prop_filter("non-void", |r| r != "void"),
        name in identifier(),
        params in parameters()
    ) {
        let separator = if ret.ends_with(['*', '&']) { "" } else { " " };
        let text = format!("{}{}{}({}) const;", ret, separator, name, params);
        let output = TrailingReturn::default().apply(&text).text;
        prop_assert_eq!(output, format!("auto {}({}) const -> {};", name, params, ret));
    }
}
