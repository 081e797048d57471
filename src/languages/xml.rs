//! XML language definition, covering HTML and friends
//!
//! Exercises most of the engine: shared tag internals, keyword-titled
//! style/script tags whose `starts` continuations delegate to CSS or
//! auto-detection, and a continuous PHP sub-language region.

use crate::mode::{comment, Keywords, Mode, ModeRef, SubLanguage};

const TAG_IDENT: &str = "[A-Za-z0-9._:-]+";

fn php_region() -> Mode {
    Mode {
        begin: Some("<\\?php\\b".to_string()),
        end: Some("\\?>".to_string()),
        sub_language: Some(SubLanguage::Named("php".to_string())),
        continuous: true,
        ..Mode::default()
    }
}

/// Attribute soup shared by every kind of tag; lives until the owning
/// tag's end.
fn tag_internals() -> Mode {
    Mode {
        ends_with_parent: true,
        illegal: Some("<".to_string()),
        relevance: Some(0),
        contains: vec![
            ModeRef::named("php"),
            ModeRef::inline(Mode {
                class_name: Some("attribute".to_string()),
                begin: Some(TAG_IDENT.to_string()),
                relevance: Some(0),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                begin: Some("=".to_string()),
                relevance: Some(0),
                contains: vec![ModeRef::inline(Mode {
                    class_name: Some("value".to_string()),
                    contains: vec![ModeRef::named("php")],
                    variants: vec![
                        Mode {
                            begin: Some("\"".to_string()),
                            end: Some("\"".to_string()),
                            ..Mode::default()
                        },
                        Mode {
                            begin: Some("'".to_string()),
                            end: Some("'".to_string()),
                            ..Mode::default()
                        },
                        Mode {
                            begin: Some("[^\\s/>]+".to_string()),
                            ..Mode::default()
                        },
                    ],
                    ..Mode::default()
                })],
                ..Mode::default()
            }),
        ],
        ..Mode::default()
    }
}

/// Create the XML language definition
pub fn xml_language() -> Mode {
    Mode {
        case_insensitive: true,
        aliases: ["html", "xhtml", "rss", "atom", "xsl", "plist"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        definitions: vec![
            ("php".to_string(), php_region()),
            ("tag-internals".to_string(), tag_internals()),
        ],
        contains: vec![
            ModeRef::inline(Mode {
                class_name: Some("doctype".to_string()),
                begin: Some("<!DOCTYPE".to_string()),
                end: Some(">".to_string()),
                relevance: Some(10),
                contains: vec![ModeRef::inline(Mode {
                    begin: Some("\\[".to_string()),
                    end: Some("\\]".to_string()),
                    ..Mode::default()
                })],
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                relevance: Some(10),
                ..comment("<!--", "-->")
            }),
            ModeRef::inline(Mode {
                class_name: Some("cdata".to_string()),
                begin: Some("<!\\[CDATA\\[".to_string()),
                end: Some("\\]\\]>".to_string()),
                relevance: Some(10),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("tag".to_string()),
                begin: Some("<style\\b".to_string()),
                end: Some(">".to_string()),
                keywords: Some(Keywords::grouped(&[("title", "style")])),
                contains: vec![ModeRef::named("tag-internals")],
                starts: Some(ModeRef::inline(Mode {
                    end: Some("</style>".to_string()),
                    return_end: true,
                    sub_language: Some(SubLanguage::Named("css".to_string())),
                    ..Mode::default()
                })),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("tag".to_string()),
                begin: Some("<script\\b".to_string()),
                end: Some(">".to_string()),
                keywords: Some(Keywords::grouped(&[("title", "script")])),
                contains: vec![ModeRef::named("tag-internals")],
                starts: Some(ModeRef::inline(Mode {
                    end: Some("</script>".to_string()),
                    return_end: true,
                    sub_language: Some(SubLanguage::Auto),
                    ..Mode::default()
                })),
                ..Mode::default()
            }),
            ModeRef::named("php"),
            ModeRef::inline(Mode {
                class_name: Some("pi".to_string()),
                begin: Some("<\\?\\w+".to_string()),
                end: Some("\\?>".to_string()),
                relevance: Some(10),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("tag".to_string()),
                begin: Some("</?".to_string()),
                end: Some("/?>".to_string()),
                contains: vec![
                    ModeRef::inline(Mode {
                        class_name: Some("title".to_string()),
                        begin: Some("[^ /><\\n\\t]+".to_string()),
                        relevance: Some(0),
                        ..Mode::default()
                    }),
                    ModeRef::named("tag-internals"),
                ],
                ..Mode::default()
            }),
        ],
        ..Mode::default()
    }
}

#[cfg(test)]
mod tests {
    use crate::LanguageRegistry;

    #[test]
    fn test_simple_element() {
        let registry = LanguageRegistry::new();
        let result = registry
            .highlight("xml", "<a href=\"x\">y</a>", false)
            .unwrap();
        assert_eq!(
            result.markup,
            "<span class=\"hljs-tag\">&lt;<span class=\"hljs-title\">a</span> \
             <span class=\"hljs-attribute\">href</span>=\
             <span class=\"hljs-value\">\"x\"</span>&gt;</span>y\
             <span class=\"hljs-tag\">&lt;/<span class=\"hljs-title\">a</span>&gt;</span>"
        );
    }

    #[test]
    fn test_alias_matches_canonical() {
        let registry = LanguageRegistry::new();
        let via_xml = registry.highlight("xml", "<b>x</b>", false).unwrap();
        let via_html = registry.highlight("html", "<b>x</b>", false).unwrap();
        assert_eq!(via_xml.markup, via_html.markup);
        assert_eq!(via_html.language.as_deref(), Some("xml"));
    }

    #[test]
    fn test_comment_and_doctype_relevance() {
        let registry = LanguageRegistry::new();
        let result = registry
            .highlight("xml", "<!DOCTYPE html><!-- note -->", false)
            .unwrap();
        assert!(result.markup.contains("hljs-doctype"));
        assert!(result.markup.contains("hljs-comment"));
        assert!(result.relevance >= 20);
    }

    #[test]
    fn test_style_tag_delegates_to_css() {
        let registry = LanguageRegistry::new();
        let result = registry
            .highlight("xml", "<style>b{color:red}</style>", false)
            .unwrap();
        assert!(result.markup.contains("<span class=\"css\">"));
        assert!(result.markup.contains("hljs-attribute"));
    }

    #[test]
    fn test_case_insensitive_tags() {
        let registry = LanguageRegistry::new();
        let result = registry.highlight("xml", "<BR>", false).unwrap();
        assert!(result.markup.contains("hljs-tag"));
    }
}
