//! Whole-file fixtures run through the full pipeline.
//!
//! Each fixture is realistic Qt-style C++; the expected text is the exact
//! output, so any unintended change shows up as a diff.

use cppmodernize::{ClassificationPolicy, Modernizer, RewriteKind, Transform, TrailingReturn};
use indoc::indoc;
use pretty_assertions::assert_eq;

const DOCUMENT_H: &str = indoc! {"
    #pragma once

    #include <QObject>
    #include <QString>

    namespace app {

    class Document : public AbstractDocument
    {
        Q_OBJECT
        Q_PROPERTY(QString title READ title WRITE setTitle NOTIFY titleChanged)

    public:
        explicit Document(QObject *parent = nullptr);
        ~Document() {}

        QString title() const;
        void setTitle(const QString &title);
        bool isModified() const;
        int pageCount() const;
        virtual bool save(const QString &path);
        virtual void render() = 0;

    signals:
        void titleChanged();
        int pagesChanged(int count);

    private:
        QString m_title;
        bool m_modified = false;
    };

    } // namespace app
"};

const DOCUMENT_H_EXPECTED: &str = indoc! {"
    #pragma once

    #include <QObject>
    #include <QString>

    namespace app {

    class Document : public AbstractDocument
    {
        Q_OBJECT
        Q_PROPERTY(QString title READ title WRITE setTitle NOTIFY titleChanged)

    public:
        explicit Document(QObject *parent = nullptr);
        ~Document() = default;

        auto title() const -> QString;
        void setTitle(const QString &title);
        [[nodiscard]] auto isModified() const -> bool;
        auto pageCount() const -> int;
        virtual auto save(const QString &path) -> bool override;
        virtual void render() = 0;

    signals:
        void titleChanged();
        int pagesChanged(int count);

    private:
        QString m_title;
        bool m_modified = false;
    };

    } // namespace app
"};

const DOCUMENT_CPP: &str = indoc! {r#"
    #include "document.h"

    namespace app {

    Document::Document(QObject *parent)
        : AbstractDocument(parent)
    {
    }

    QString Document::title() const
    {
        return m_title;
    }

    void Document::setTitle(const QString &title)
    {
        if (m_title == title)
            return;
        m_title = title;
        emit titleChanged();
    }

    bool Document::isModified() const { return m_modified; }

    int Document::pageCount() const
    {
        const QString label("pages");
        QSize size(Width, Height);
        return static_cast<int>(m_pages.size());
    }

    } // namespace app
"#};

const DOCUMENT_CPP_EXPECTED: &str = indoc! {r#"
    #include "document.h"

    namespace app {

    Document::Document(QObject *parent)
        : AbstractDocument(parent)
    {
    }

    auto Document::title() const -> QString
    {
        return m_title;
    }

    void Document::setTitle(const QString &title)
    {
        if (m_title == title)
            return;
        m_title = title;
        emit titleChanged();
    }

    auto Document::isModified() const -> bool { return m_modified; }

    auto Document::pageCount() const -> int
    {
        const QString label("pages");
        QSize size(Width, Height);
        return static_cast<int>(m_pages.size());
    }

    } // namespace app
"#};

/// Nothing in here may change.
const ADVERSARIAL: &str = indoc! {r#"
    // bool commented(int x) const;
    /* int blockCommented(); */
    const char *sample = "int inString();";
    #define DECLARE_GETTER(T, name) T name() const;
    #define MULTI(x) \
        int continued(x);

    static QMutex mutex(QMutex::Recursive);
    const QSize kDefault(DefaultWidth, DefaultHeight);
    namespace {
    const QSize kMinimum(MinWidth, MinHeight);
    Qt::Alignment kAlign(Qt::AlignCenter);
    }

    auto &instance();
    auto *lookup();
    const auto &reference() const;

    class Widget : public QWidget {
        Q_OBJECT
    public:
        virtual void paint() = 0;
        virtual int depth() const = 0;
        auto name() -> int;
        Widget &operator=(const Widget &) = delete;
        Widget(const Widget &) = default;
        Q_INVOKABLE void refresh();
        Q_SIGNAL void clicked();
    signals:
        int valueChanged(int value);
        void resized();
    };

    void run()
    {
        QString s(other);
        int n(5);
        return foo(x);
    }
"#};

#[test]
fn test_header_fixture() {
    let output = Modernizer::default().apply(DOCUMENT_H);
    assert_eq!(output.text, DOCUMENT_H_EXPECTED);
    assert_eq!(output.stats.rewrites_of(RewriteKind::TrailingReturn), 4);
    assert_eq!(output.stats.rewrites_of(RewriteKind::Nodiscard), 1);
    assert_eq!(output.stats.rewrites_of(RewriteKind::Override), 1);
    assert_eq!(output.stats.rewrites_of(RewriteKind::DefaultMember), 1);
}

#[test]
fn test_source_fixture() {
    let output = Modernizer::default().apply(DOCUMENT_CPP);
    assert_eq!(output.text, DOCUMENT_CPP_EXPECTED);
    assert_eq!(output.stats.total_rewrites(), 3);
}

#[test]
fn test_adversarial_fixture_is_untouched() {
    let output = Modernizer::default().apply(ADVERSARIAL);
    assert_eq!(output.text, ADVERSARIAL);
    assert_eq!(output.stats.total_rewrites(), 0);
    assert!(output.stats.skipped_as("pure_virtual") >= 2);
    assert!(output.stats.skipped_as("signal_section") >= 1);
    assert!(output.stats.skipped_as("not_a_declaration") >= 4);
    assert!(output.stats.skipped_as("already_converted") >= 3);
}

#[test]
fn test_fixtures_are_fixed_points() {
    for expected in [DOCUMENT_H_EXPECTED, DOCUMENT_CPP_EXPECTED] {
        let output = Modernizer::default().apply(expected);
        assert_eq!(output.text, expected);
        assert_eq!(output.stats.total_rewrites(), 0);
    }
}

#[test]
fn test_void_conversion_when_enabled() {
    let policy = ClassificationPolicy {
        suppress_void: false,
        ..Default::default()
    };
    let output = TrailingReturn::new(policy).apply("    void reset();\n    virtual void paint() = 0;\n");
    assert_eq!(
        output.text,
        "    auto reset() -> void;\n    virtual void paint() = 0;\n"
    );
}
