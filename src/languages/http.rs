//! HTTP message language definition
//!
//! Headers are structural; the message body after the blank line is
//! handed to auto-detection.

use crate::mode::{Mode, ModeRef, SubLanguage};

/// Create the HTTP language definition
pub fn http_language() -> Mode {
    Mode {
        aliases: vec!["https".to_string()],
        illegal: Some("\\S".to_string()),
        contains: vec![
            ModeRef::inline(Mode {
                class_name: Some("status".to_string()),
                begin: Some("^HTTP/[0-9.]+".to_string()),
                end: Some("$".to_string()),
                contains: vec![ModeRef::inline(Mode {
                    class_name: Some("number".to_string()),
                    begin: Some("\\b\\d{3}\\b".to_string()),
                    ..Mode::default()
                })],
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("request".to_string()),
                begin: Some("^[A-Z]+ (.*?) HTTP/[0-9.]+$".to_string()),
                end: Some("$".to_string()),
                return_begin: true,
                contains: vec![ModeRef::inline(Mode {
                    class_name: Some("string".to_string()),
                    begin: Some(" ".to_string()),
                    end: Some(" ".to_string()),
                    exclude_begin: true,
                    exclude_end: true,
                    ..Mode::default()
                })],
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("attribute".to_string()),
                begin: Some("^\\w".to_string()),
                end: Some(": ".to_string()),
                exclude_end: true,
                illegal: Some("\\n|\\s|=".to_string()),
                starts: Some(ModeRef::inline(Mode {
                    class_name: Some("string".to_string()),
                    end: Some("$".to_string()),
                    ..Mode::default()
                })),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                begin: Some("\\n\\n".to_string()),
                starts: Some(ModeRef::inline(Mode {
                    ends_with_parent: true,
                    sub_language: Some(SubLanguage::Auto),
                    ..Mode::default()
                })),
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
    fn test_response_with_headers() {
        let registry = LanguageRegistry::new();
        let text = "HTTP/1.1 404 Not Found\nContent-Type: text/html\n";
        let result = registry.highlight("http", text, false).unwrap();
        assert!(result.markup.contains("hljs-status"));
        assert!(result.markup.contains("<span class=\"hljs-number\">404</span>"));
        assert!(result
            .markup
            .contains("<span class=\"hljs-attribute\">Content-Type</span>"));
    }

    #[test]
    fn test_request_line() {
        let registry = LanguageRegistry::new();
        let result = registry
            .highlight("http", "GET /index.html HTTP/1.0\n", false)
            .unwrap();
        assert!(result.markup.contains("hljs-request"));
        assert!(result
            .markup
            .contains("<span class=\"hljs-string\">/index.html</span>"));
    }

    #[test]
    fn test_body_auto_detected() {
        let registry = LanguageRegistry::new();
        let text = "HTTP/1.1 200 OK\nContent-Type: application/json\n\n{\"a\":1}";
        let result = registry.highlight("http", text, false).unwrap();
        assert!(result.markup.contains("<span class=\"json\">"));
        assert!(result.markup.contains("hljs-attribute"));
    }
}
