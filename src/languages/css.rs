//! CSS language definition

use crate::mode::{
    apos_string_mode, c_block_comment_mode, css_number_mode, quote_string_mode, Keywords, Mode,
    ModeRef,
};

const CSS_IDENT: &str = "[a-zA-Z-][a-zA-Z0-9_-]*";

/// Function-call head: the name is classified, the paren is re-emitted
/// outside the span.
fn function_mode() -> Mode {
    Mode {
        class_name: Some("function".to_string()),
        begin: Some(format!("{}\\(", CSS_IDENT)),
        end: Some("\\(".to_string()),
        return_begin: true,
        exclude_end: true,
        ..Mode::default()
    }
}

/// One `property: value` declaration. Shared between top level and rule
/// blocks, so it compiles once and keeps its own end.
fn rule_mode() -> Mode {
    Mode {
        class_name: Some("rule".to_string()),
        begin: Some("[A-Z_.\\-]+\\s*:".to_string()),
        end: Some(";".to_string()),
        return_begin: true,
        ends_with_parent: true,
        contains: vec![ModeRef::inline(Mode {
            class_name: Some("attribute".to_string()),
            begin: Some("\\S".to_string()),
            end: Some(":".to_string()),
            exclude_end: true,
            starts: Some(ModeRef::inline(Mode {
                class_name: Some("value".to_string()),
                ends_with_parent: true,
                exclude_end: true,
                contains: vec![
                    ModeRef::inline(function_mode()),
                    ModeRef::inline(css_number_mode()),
                    ModeRef::inline(quote_string_mode()),
                    ModeRef::inline(apos_string_mode()),
                    ModeRef::inline(c_block_comment_mode()),
                    ModeRef::inline(Mode {
                        class_name: Some("hexcolor".to_string()),
                        begin: Some("#[0-9A-Fa-f]+".to_string()),
                        ..Mode::default()
                    }),
                    ModeRef::inline(Mode {
                        class_name: Some("important".to_string()),
                        begin: Some("!important".to_string()),
                        ..Mode::default()
                    }),
                ],
                ..Mode::default()
            })),
            ..Mode::default()
        })],
        ..Mode::default()
    }
}

/// Create the CSS language definition
pub fn css_language() -> Mode {
    Mode {
        case_insensitive: true,
        illegal: Some("[=/|']".to_string()),
        definitions: vec![("rule".to_string(), rule_mode())],
        contains: vec![
            ModeRef::inline(c_block_comment_mode()),
            ModeRef::named("rule"),
            ModeRef::inline(Mode {
                class_name: Some("id".to_string()),
                begin: Some("#[A-Za-z0-9_-]+".to_string()),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("class".to_string()),
                begin: Some("\\.[A-Za-z0-9_-]+".to_string()),
                relevance: Some(0),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("attr_selector".to_string()),
                begin: Some("\\[".to_string()),
                end: Some("\\]".to_string()),
                illegal: Some("$".to_string()),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("pseudo".to_string()),
                begin: Some(":(:)?[a-zA-Z0-9_\\-+()\"']+".to_string()),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("at_rule".to_string()),
                begin: Some("@(font-face|page)".to_string()),
                lexemes: Some("[a-z-]+".to_string()),
                keywords: Some(Keywords::plain("font-face page")),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("at_rule".to_string()),
                begin: Some("@".to_string()),
                end: Some("[{;]".to_string()),
                contains: vec![
                    ModeRef::inline(Mode {
                        class_name: Some("keyword".to_string()),
                        begin: Some("\\S+".to_string()),
                        ..Mode::default()
                    }),
                    ModeRef::inline(Mode {
                        begin: Some("\\s".to_string()),
                        ends_with_parent: true,
                        exclude_end: true,
                        relevance: Some(0),
                        contains: vec![
                            ModeRef::inline(function_mode()),
                            ModeRef::inline(apos_string_mode()),
                            ModeRef::inline(quote_string_mode()),
                            ModeRef::inline(css_number_mode()),
                        ],
                        ..Mode::default()
                    }),
                ],
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("tag".to_string()),
                begin: Some(CSS_IDENT.to_string()),
                relevance: Some(0),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("rules".to_string()),
                begin: Some("\\{".to_string()),
                end: Some("\\}".to_string()),
                illegal: Some("\\S".to_string()),
                relevance: Some(0),
                contains: vec![
                    ModeRef::inline(c_block_comment_mode()),
                    ModeRef::named("rule"),
                ],
                ..Mode::default()
            }),
        ],
        ..Mode::default()
    }
}
