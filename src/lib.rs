//! hilite - grammar-driven syntax highlighting
//!
//! Given a declarative description of a language's lexical structure (a
//! [`mode::Mode`] tree), hilite tokenizes source text into nested,
//! classified HTML markup, auto-detects which registered grammar best
//! matches unknown text, and can reconcile its output against markup
//! already present in the input.
//!
//! ```
//! use hilite::LanguageRegistry;
//!
//! let registry = LanguageRegistry::new();
//! let result = registry.highlight("json", "{\"a\":1}", false).unwrap();
//! assert!(result.markup.contains("hljs-number"));
//! ```

mod compile;
mod detect;
mod error;
mod html;
mod languages;
mod merge;
pub mod mode;
mod registry;
mod tokenize;

pub use error::{HighlightError, Result};
pub use html::escape;
pub use merge::merge_markup;
pub use registry::{LanguageRegistry, Options};
pub use tokenize::{HighlightResult, Resume};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{Keywords, Mode, ModeRef, SubLanguage};

    /// Strip span tags and undo escaping; highlighting must be purely
    /// additive annotation.
    fn strip(markup: &str) -> String {
        let tag = regex::Regex::new("</?span[^>]*>").unwrap();
        tag.replace_all(markup, "")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&")
    }

    #[test]
    fn test_stripping_tags_reproduces_input() {
        let registry = LanguageRegistry::new();
        let samples = [
            ("json", "{\"key\": [1, 2.5, true], \"other\": null}"),
            ("xml", "<a href=\"x\">y & z</a>"),
            ("css", "a { color: red; }"),
            ("javascript", "function f(a) { return a < 1; }"),
            ("markdown", "# title\n\nsome *emphasis* here"),
            ("python", "def f(x):\n    return x"),
            ("http", "HTTP/1.1 200 OK\nContent-Type: text/plain\n\nhello"),
        ];
        for (language, text) in samples {
            let result = registry.highlight(language, text, false).unwrap();
            assert_eq!(strip(&result.markup), text, "language {language}");
        }
    }

    #[test]
    fn test_non_strict_never_fails() {
        let registry = LanguageRegistry::new();
        // Text that is illegal for json at the top level
        let result = registry.highlight("json", "true", false).unwrap();
        assert_eq!(result.relevance, 0);
        assert_eq!(result.markup, "true");
        assert!(result.language.is_none());
    }

    #[test]
    fn test_strict_surfaces_illegal_lexeme() {
        let registry = LanguageRegistry::new();
        let err = registry.highlight("json", "true", true).unwrap_err();
        match err {
            HighlightError::IllegalLexeme { lexeme, .. } => assert_eq!(lexeme, "t"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resume_across_lines() {
        let mut registry = LanguageRegistry::empty();
        registry.register(
            "c-ish",
            Mode {
                contains: vec![ModeRef::inline(mode::c_block_comment_mode())],
                ..Mode::default()
            },
        );

        let first = registry.highlight("c-ish", "int /* note", false).unwrap();
        assert_eq!(
            first.markup,
            "int <span class=\"hljs-comment\">/* note</span>"
        );

        let second = registry
            .highlight_from("c-ish", "done */ x", false, first.resume.as_ref())
            .unwrap();
        assert_eq!(
            second.markup,
            "<span class=\"hljs-comment\">done */</span> x"
        );

        // Without the resume the same line is plain text
        let fresh = registry.highlight("c-ish", "done */ x", false).unwrap();
        assert_eq!(fresh.markup, "done */ x");
    }

    #[test]
    fn test_continuous_sub_language_state() {
        let mut registry = LanguageRegistry::empty();
        registry.register(
            "mini",
            Mode {
                contains: vec![ModeRef::inline(mode::c_block_comment_mode())],
                ..Mode::default()
            },
        );
        let region = |continuous| Mode {
            begin: Some("\\[".to_string()),
            end: Some("\\]".to_string()),
            exclude_begin: true,
            exclude_end: true,
            sub_language: Some(SubLanguage::Named("mini".to_string())),
            continuous,
            ..Mode::default()
        };
        registry.register(
            "host",
            Mode {
                contains: vec![ModeRef::inline(region(true))],
                ..Mode::default()
            },
        );
        registry.register(
            "host-fresh",
            Mode {
                contains: vec![ModeRef::inline(region(false))],
                ..Mode::default()
            },
        );

        // One comment spanning two embedded regions: the second region
        // resumes inside the comment only in continuous mode.
        let text = "[/* a][ b */]";
        let continuous = registry.highlight("host", text, false).unwrap();
        let halves: Vec<_> = continuous
            .markup
            .match_indices("hljs-comment")
            .collect();
        assert_eq!(halves.len(), 2);

        let fresh = registry.highlight("host-fresh", text, false).unwrap();
        let halves: Vec<_> = fresh.markup.match_indices("hljs-comment").collect();
        assert_eq!(halves.len(), 1);
    }

    #[test]
    fn test_sub_language_wrapped_in_language_span() {
        let mut registry = LanguageRegistry::empty();
        registry.register(
            "mini",
            Mode {
                keywords: Some(Keywords::plain("go")),
                ..Mode::default()
            },
        );
        registry.register(
            "host",
            Mode {
                contains: vec![ModeRef::inline(Mode {
                    begin: Some("%".to_string()),
                    end: Some("%".to_string()),
                    exclude_begin: true,
                    exclude_end: true,
                    sub_language: Some(SubLanguage::Named("mini".to_string())),
                    ..Mode::default()
                })],
                ..Mode::default()
            },
        );
        let result = registry.highlight("host", "%go%", false).unwrap();
        assert_eq!(
            result.markup,
            "%<span class=\"mini\"><span class=\"hljs-keyword\">go</span></span>%"
        );
        // The hosting mode's default weight lets the nested score through
        assert_eq!(result.relevance, 2);
    }

    #[test]
    fn test_unregistered_sub_language_escapes() {
        let mut registry = LanguageRegistry::empty();
        registry.register(
            "host",
            Mode {
                contains: vec![ModeRef::inline(Mode {
                    begin: Some("%".to_string()),
                    end: Some("%".to_string()),
                    exclude_begin: true,
                    exclude_end: true,
                    sub_language: Some(SubLanguage::Named("missing".to_string())),
                    ..Mode::default()
                })],
                ..Mode::default()
            },
        );
        let result = registry.highlight("host", "%a < b%", false).unwrap();
        assert_eq!(result.markup, "%a &lt; b%");
    }

    #[test]
    fn test_highlight_then_merge() {
        let registry = LanguageRegistry::new();
        let plain = "{\"a\":1}";
        let generated = registry.highlight("json", plain, false).unwrap();
        let merged = merge_markup("{\"<b>a</b>\":1}", &generated.markup, plain);
        // The original <b> survives, and the text is still intact
        assert!(merged.contains("<b>"));
        assert!(merged.contains("</b>"));
        assert_eq!(strip(&merged).replace("<b>", "").replace("</b>", ""), plain);
    }
}
