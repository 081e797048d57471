//! JavaScript language definition

use crate::mode::{
    apos_string_mode, backslash_escape, c_block_comment_mode, c_line_comment_mode,
    quote_string_mode, regexp_mode, title_mode, underscore_title_mode, Keywords, Mode, ModeRef,
    SubLanguage, RE_STARTERS_RE,
};

const JS_IDENT: &str = "[A-Za-z$_][0-9A-Za-z$_]*";

fn keywords() -> Keywords {
    Keywords::grouped(&[
        (
            "keyword",
            "in of if for while finally var new function do return void else break catch \
             instanceof with throw case default try this switch continue typeof delete let \
             yield const export super debugger as await",
        ),
        ("literal", "true false null undefined NaN Infinity"),
        (
            "built_in",
            "eval isFinite isNaN parseFloat parseInt decodeURI decodeURIComponent encodeURI \
             encodeURIComponent escape unescape Object Function Boolean Error EvalError \
             InternalError RangeError ReferenceError StopIteration SyntaxError TypeError \
             URIError Number Math Date String RegExp Array Float32Array Float64Array \
             Int16Array Int32Array Int8Array Uint16Array Uint32Array Uint8Array \
             Uint8ClampedArray ArrayBuffer DataView JSON Intl arguments require module \
             console window document Symbol Set Map WeakSet WeakMap Proxy Reflect Promise",
        ),
    ])
}

/// Create the JavaScript language definition
pub fn javascript_language() -> Mode {
    Mode {
        aliases: vec!["js".to_string()],
        keywords: Some(keywords()),
        contains: vec![
            ModeRef::inline(Mode {
                class_name: Some("pi".to_string()),
                relevance: Some(10),
                variants: vec![
                    Mode {
                        begin: Some("^\\s*('|\")use strict('|\")".to_string()),
                        ..Mode::default()
                    },
                    Mode {
                        begin: Some("^\\s*('|\")use asm('|\")".to_string()),
                        ..Mode::default()
                    },
                ],
                ..Mode::default()
            }),
            ModeRef::inline(apos_string_mode()),
            ModeRef::inline(quote_string_mode()),
            ModeRef::inline(Mode {
                class_name: Some("string".to_string()),
                begin: Some("`".to_string()),
                end: Some("`".to_string()),
                contains: vec![
                    ModeRef::inline(backslash_escape()),
                    ModeRef::inline(Mode {
                        class_name: Some("subst".to_string()),
                        begin: Some("\\$\\{".to_string()),
                        end: Some("\\}".to_string()),
                        ..Mode::default()
                    }),
                ],
                ..Mode::default()
            }),
            ModeRef::inline(c_line_comment_mode()),
            ModeRef::inline(c_block_comment_mode()),
            ModeRef::inline(Mode {
                class_name: Some("number".to_string()),
                begin: Some(
                    "\\b(0[xXbBoO][a-fA-F0-9]+|(\\d+(\\.\\d*)?|\\.\\d+)([eE][-+]?\\d+)?)"
                        .to_string(),
                ),
                relevance: Some(0),
                ..Mode::default()
            }),
            // After an operator or a returning keyword a slash starts a
            // regexp literal, and a bare "<" can open embedded markup.
            ModeRef::inline(Mode {
                begin: Some(format!(
                    "({}|\\b(case|return|throw)\\b)\\s*",
                    RE_STARTERS_RE
                )),
                keywords: Some(Keywords::plain("return throw case")),
                relevance: Some(0),
                contains: vec![
                    ModeRef::inline(c_line_comment_mode()),
                    ModeRef::inline(c_block_comment_mode()),
                    ModeRef::inline(regexp_mode()),
                    ModeRef::inline(Mode {
                        begin: Some("<".to_string()),
                        end: Some(">\\s*[);\\]]".to_string()),
                        relevance: Some(0),
                        sub_language: Some(SubLanguage::Named("xml".to_string())),
                        ..Mode::default()
                    }),
                ],
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("function".to_string()),
                begin_keywords: Some("function".to_string()),
                end: Some("\\{".to_string()),
                exclude_end: true,
                illegal: Some("\\[|%".to_string()),
                contains: vec![
                    ModeRef::inline(Mode {
                        begin: Some(JS_IDENT.to_string()),
                        ..title_mode()
                    }),
                    ModeRef::inline(Mode {
                        class_name: Some("params".to_string()),
                        begin: Some("\\(".to_string()),
                        end: Some("\\)".to_string()),
                        illegal: Some("[\"'(]".to_string()),
                        contains: vec![
                            ModeRef::inline(c_line_comment_mode()),
                            ModeRef::inline(c_block_comment_mode()),
                        ],
                        ..Mode::default()
                    }),
                ],
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                begin: Some("\\$[(.]".to_string()),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                begin: Some(format!("\\.{}", crate::mode::IDENT_RE)),
                relevance: Some(0),
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                begin_keywords: Some("import".to_string()),
                end: Some("[;$]".to_string()),
                keywords: Some(Keywords::plain("import from as")),
                contains: vec![
                    ModeRef::inline(apos_string_mode()),
                    ModeRef::inline(quote_string_mode()),
                ],
                ..Mode::default()
            }),
            ModeRef::inline(Mode {
                class_name: Some("class".to_string()),
                begin_keywords: Some("class".to_string()),
                end: Some("[{;=]".to_string()),
                exclude_end: true,
                illegal: Some("[:\"\\[\\]]".to_string()),
                contains: vec![
                    ModeRef::inline(Mode {
                        begin_keywords: Some("extends".to_string()),
                        ..Mode::default()
                    }),
                    ModeRef::inline(underscore_title_mode()),
                ],
                ..Mode::default()
            }),
        ],
        ..Mode::default()
    }
}
