//! Built-in language definitions
//!
//! Declarative grammar data consumed by the engine; each module builds
//! one [`Mode`](crate::mode::Mode) tree from the shared primitives in
//! [`crate::mode`].

mod css;
mod http;
mod javascript;
mod json;
mod markdown;
mod python;
mod xml;

use crate::mode::Mode;

/// Every built-in grammar, in registration order.
pub fn all() -> Vec<(&'static str, Mode)> {
    vec![
        ("xml", xml::xml_language()),
        ("css", css::css_language()),
        ("javascript", javascript::javascript_language()),
        ("json", json::json_language()),
        ("markdown", markdown::markdown_language()),
        ("python", python::python_language()),
        ("http", http::http_language()),
    ]
}

#[cfg(test)]
mod tests {
    use crate::LanguageRegistry;

    #[test]
    fn test_all_builtins_compile_and_run() {
        let registry = LanguageRegistry::new();
        for (name, _) in super::all() {
            let result = registry.highlight(name, "x", false);
            assert!(result.is_ok(), "grammar {name} failed: {result:?}");
        }
    }
}
