//! JSON language definition
//!
//! The value/object/array recursion is expressed through named
//! definitions on the grammar root.

use crate::mode::{backslash_escape, c_number_mode, quote_string_mode, Keywords, Mode, ModeRef};

fn literals() -> Keywords {
    Keywords::grouped(&[("literal", "true false null")])
}

/// A value continues until the next comma or the enclosing delimiter.
fn value_mode() -> Mode {
    Mode {
        class_name: Some("value".to_string()),
        end: Some(",".to_string()),
        ends_with_parent: true,
        exclude_end: true,
        keywords: Some(literals()),
        contains: vec![
            ModeRef::inline(quote_string_mode()),
            ModeRef::inline(c_number_mode()),
            ModeRef::named("object"),
            ModeRef::named("array"),
        ],
        ..Mode::default()
    }
}

fn object_mode() -> Mode {
    Mode {
        begin: Some("\\{".to_string()),
        end: Some("\\}".to_string()),
        illegal: Some("\\S".to_string()),
        contains: vec![ModeRef::inline(Mode {
            class_name: Some("attribute".to_string()),
            begin: Some("\\s*\"".to_string()),
            end: Some("\"\\s*:\\s*".to_string()),
            exclude_begin: true,
            exclude_end: true,
            illegal: Some("\\n".to_string()),
            contains: vec![ModeRef::inline(backslash_escape())],
            starts: Some(ModeRef::named("value")),
            ..Mode::default()
        })],
        ..Mode::default()
    }
}

fn array_mode() -> Mode {
    let mut element = value_mode();
    element.class_name = None;
    Mode {
        begin: Some("\\[".to_string()),
        end: Some("\\]".to_string()),
        illegal: Some("\\S".to_string()),
        contains: vec![ModeRef::inline(element)],
        ..Mode::default()
    }
}

/// Create the JSON language definition
pub fn json_language() -> Mode {
    Mode {
        keywords: Some(literals()),
        illegal: Some("\\S".to_string()),
        definitions: vec![
            ("value".to_string(), value_mode()),
            ("object".to_string(), object_mode()),
            ("array".to_string(), array_mode()),
        ],
        contains: vec![
            ModeRef::inline(quote_string_mode()),
            ModeRef::inline(c_number_mode()),
            ModeRef::named("object"),
            ModeRef::named("array"),
        ],
        ..Mode::default()
    }
}
