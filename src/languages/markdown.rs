//! Markdown language definition

use crate::mode::{Mode, ModeRef, SubLanguage};

/// Create the Markdown language definition
pub fn markdown_language() -> Mode {
    Mode {
        aliases: vec!["md".to_string(), "mkdown".to_string(), "mkd".to_string()],
        contains: vec![
            ModeRef::inline(Mode {
                class_name: Some("header".to_string()),
                variants: vec![
                    Mode {
                        begin: Some("^#{1,6}".to_string()),
                        end: Some("$".to_string()),
                        ..Mode::default()
                    },
                    Mode {
                        begin: Some("^.+?\\n[=-]{2,}$".to_string()),
                        ..Mode::default()
                    },
                ],
                ..Mode::default()
            }),
            // Inline HTML passes through the xml grammar
            ModeRef::inline(Mode {
                begin: Some("<".to_string()),
                end: Some(">".to_string()),
                sub_language: Some(SubLanguage::Named("xml".to_string())),
                relevance: Some(0),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("bullet".to_string()),
                begin: Some("^([*+-]|(\\d+\\.))\\s+".to_string()),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("strong".to_string()),
                begin: Some("[*_]{2}.+?[*_]{2}".to_string()),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("emphasis".to_string()),
                variants: vec![
                    Mode {
                        begin: Some("\\*.+?\\*".to_string()),
                        ..Mode::default()
                    },
                    Mode {
                        begin: Some("_.+?_".to_string()),
                        relevance: Some(0),
                        ..Mode::default()
                    },
                ],
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("blockquote".to_string()),
                begin: Some("^>\\s+".to_string()),
                end: Some("$".to_string()),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("code".to_string()),
                variants: vec![
                    Mode {
                        begin: Some("`.+?`".to_string()),
                        ..Mode::default()
                    },
                    Mode {
                        begin: Some("^( {4}|\\t)".to_string()),
                        end: Some("$".to_string()),
                        relevance: Some(0),
                        ..Mode::default()
                    },
                ],
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("horizontal_rule".to_string()),
                begin: Some("^[-\\*]{3,}".to_string()),
                end: Some("$".to_string()),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                begin: Some("\\[.+?\\][\\(\\[].*?[\\)\\]]".to_string()),
                return_begin: true,
                relevance: Some(10),
                contains: vec![
                    ModeRef::inline(Mode {
                        class_name: Some("link_label".to_string()),
                        begin: Some("\\[".to_string()),
                        end: Some("\\]".to_string()),
                        exclude_begin: true,
                        return_end: true,
                        relevance: Some(0),
                        ..Mode::default()
                    }),
                    ModeRef::inline(Mode {
                        class_name: Some("link_url".to_string()),
                        begin: Some("\\]\\(".to_string()),
                        end: Some("\\)".to_string()),
                        exclude_begin: true,
                        exclude_end: true,
                        ..Mode::default()
                    }),
                    ModeRef::inline(Mode {
                        class_name: Some("link_reference".to_string()),
                        begin: Some("\\]\\[".to_string()),
                        end: Some("\\]".to_string()),
                        exclude_begin: true,
                        exclude_end: true,
                        ..Mode::default()
                    }),
                ],
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                begin: Some("^\\[.+\\]:".to_string()),
                return_begin: true,
                contains: vec![ModeRef::inline(Mode {
                    class_name: Some("link_reference".to_string()),
                    begin: Some("\\[".to_string()),
                    end: Some("\\]:".to_string()),
                    exclude_begin: true,
                    exclude_end: true,
                    starts: Some(ModeRef::inline(Mode {
                        class_name: Some("link_url".to_string()),
                        end: Some("$".to_string()),
                        ..Mode::default()
                    })),
                    ..Mode::default()
                })],
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
    fn test_headers_and_emphasis() {
        let registry = LanguageRegistry::new();
        let result = registry
            .highlight("markdown", "# Title\n\nplain *em* and **strong**", false)
            .unwrap();
        assert!(result.markup.contains("hljs-header"));
        assert!(result.markup.contains("hljs-emphasis"));
        assert!(result.markup.contains("hljs-strong"));
    }

    #[test]
    fn test_bullets_and_code() {
        let registry = LanguageRegistry::new();
        let result = registry
            .highlight("markdown", "- item with `code` inside", false)
            .unwrap();
        assert!(result.markup.contains("hljs-bullet"));
        assert!(result.markup.contains("hljs-code"));
    }

    #[test]
    fn test_link() {
        let registry = LanguageRegistry::new();
        let result = registry
            .highlight("markdown", "see [label](http://x) now", false)
            .unwrap();
        assert!(result.markup.contains("hljs-link_label"));
        assert!(result.markup.contains("hljs-link_url"));
        assert!(result.relevance >= 10);
    }
}
