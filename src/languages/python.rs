//! Python language definition

use crate::mode::{
    apos_string_mode, backslash_escape, hash_comment_mode, quote_string_mode,
    underscore_title_mode, Keywords, Mode, ModeRef, BINARY_NUMBER_RE, C_NUMBER_RE,
};

fn prompt_mode() -> Mode {
    Mode {
        class_name: Some("prompt".to_string()),
        begin: Some("^(>>>|\\.\\.\\.) ".to_string()),
        ..Mode::default()
    }
}

fn string_modes() -> Mode {
    Mode {
        class_name: Some("string".to_string()),
        contains: vec![ModeRef::inline(backslash_escape())],
        variants: vec![
            Mode {
                begin: Some("(u|b)?r?'''".to_string()),
                end: Some("'''".to_string()),
                contains: vec![ModeRef::inline(prompt_mode())],
                relevance: Some(10),
                ..Mode::default()
            },
            Mode {
                begin: Some("(u|b)?r?\"\"\"".to_string()),
                end: Some("\"\"\"".to_string()),
                contains: vec![ModeRef::inline(prompt_mode())],
                relevance: Some(10),
                ..Mode::default()
            },
            Mode {
                begin: Some("(u|r|ur)'".to_string()),
                end: Some("'".to_string()),
                relevance: Some(10),
                ..Mode::default()
            },
            Mode {
                begin: Some("(u|r|ur)\"".to_string()),
                end: Some("\"".to_string()),
                relevance: Some(10),
                ..Mode::default()
            },
            Mode {
                begin: Some("(b|br)'".to_string()),
                end: Some("'".to_string()),
                ..Mode::default()
            },
            Mode {
                begin: Some("(b|br)\"".to_string()),
                end: Some("\"".to_string()),
                ..Mode::default()
            },
            apos_string_mode(),
            quote_string_mode(),
        ],
        ..Mode::default()
    }
}

fn number_modes() -> Mode {
    Mode {
        class_name: Some("number".to_string()),
        relevance: Some(0),
        variants: vec![
            Mode {
                begin: Some(format!("{}[lLjJ]?", BINARY_NUMBER_RE)),
                ..Mode::default()
            },
            Mode {
                begin: Some("\\b(0o[0-7]+)[lLjJ]?".to_string()),
                ..Mode::default()
            },
            Mode {
                begin: Some(format!("{}[lLjJ]?", C_NUMBER_RE)),
                ..Mode::default()
            },
        ],
        ..Mode::default()
    }
}

fn params_mode() -> Mode {
    Mode {
        class_name: Some("params".to_string()),
        begin: Some("\\(".to_string()),
        end: Some("\\)".to_string()),
        contains: vec![
            ModeRef::SelfRef,
            ModeRef::inline(prompt_mode()),
            ModeRef::inline(number_modes()),
            ModeRef::inline(string_modes()),
        ],
        ..Mode::default()
    }
}

/// Create the Python language definition
pub fn python_language() -> Mode {
    Mode {
        aliases: vec!["py".to_string(), "gyp".to_string()],
        keywords: Some(Keywords::grouped(&[
            (
                "keyword",
                "and elif is global as in if from raise for except finally print import pass \
                 return exec else break not with class assert yield try while continue del or \
                 def lambda nonlocal|10 None True False",
            ),
            ("built_in", "Ellipsis NotImplemented"),
        ])),
        illegal: Some("(</|->|\\?)".to_string()),
        contains: vec![
            ModeRef::inline(prompt_mode()),
            ModeRef::inline(number_modes()),
            ModeRef::inline(string_modes()),
            ModeRef::inline(hash_comment_mode()),
            ModeRef::inline(Mode {
                end: Some(":".to_string()),
                illegal: Some("[${=;\\n,]".to_string()),
                contains: vec![
                    ModeRef::inline(underscore_title_mode()),
                    ModeRef::inline(params_mode()),
                ],
                variants: vec![
                    Mode {
                        class_name: Some("function".to_string()),
                        begin_keywords: Some("def".to_string()),
                        relevance: Some(10),
                        ..Mode::default()
                    },
                    Mode {
                        class_name: Some("class".to_string()),
                        begin_keywords: Some("class".to_string()),
                        ..Mode::default()
                    },
                ],
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("decorator".to_string()),
                begin: Some("@".to_string()),
                end: Some("$".to_string()),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                begin: Some("\\b(print|exec)\\(".to_string()),
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
    fn test_function_definition() {
        let registry = LanguageRegistry::new();
        let result = registry
            .highlight("python", "def greet(name):\n    return name", false)
            .unwrap();
        assert!(result.markup.contains("hljs-function"));
        assert!(result
            .markup
            .contains("<span class=\"hljs-title\">greet</span>"));
        assert!(result.markup.contains("hljs-params"));
        assert!(result.relevance >= 10);
    }

    #[test]
    fn test_strings_and_comments() {
        let registry = LanguageRegistry::new();
        let result = registry
            .highlight("python", "x = u'text'  # the note", false)
            .unwrap();
        assert!(result.markup.contains("hljs-string"));
        assert!(result.markup.contains("hljs-comment"));
    }

    #[test]
    fn test_decorator() {
        let registry = LanguageRegistry::new();
        let result = registry
            .highlight("python", "@wraps\ndef f():\n    pass", false)
            .unwrap();
        assert!(result.markup.contains("hljs-decorator"));
    }

    #[test]
    fn test_illegal_arrow_falls_back() {
        let registry = LanguageRegistry::new();
        let result = registry.highlight("python", "int f() -> 3;", false).unwrap();
        assert_eq!(result.relevance, 0);
    }
}
