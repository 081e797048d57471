//! Language registry
//!
//! Maps identifiers and aliases to grammar definitions, compiles each
//! grammar at most once, and exposes the public highlighting entry
//! points. Registration order is preserved because auto-detection
//! tie-breaks on it.

use std::cell::OnceCell;
use std::collections::HashMap;

use crate::compile::{self, CompiledGrammar};
use crate::detect;
use crate::error::{HighlightError, Result};
use crate::languages;
use crate::mode::Mode;
use crate::tokenize::{HighlightResult, Resume, Tokenizer};

/// Engine options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Prefix prepended to classification categories in span class names
    pub class_prefix: String,
    /// Default candidate restriction for auto-detection; `None` tries
    /// every registered grammar
    pub languages: Option<Vec<String>>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            class_prefix: "hljs-".to_string(),
            languages: None,
        }
    }
}

struct LanguageEntry {
    definition: Mode,
    /// Built on first use, then reused; initialize-once per entry. The
    /// cell keeps this type single-threaded by design.
    compiled: OnceCell<CompiledGrammar>,
}

/// Registry of grammars and the main highlighting facade.
pub struct LanguageRegistry {
    languages: HashMap<String, LanguageEntry>,
    aliases: HashMap<String, String>,
    order: Vec<String>,
    options: Options,
}

impl LanguageRegistry {
    /// Registry pre-loaded with the built-in languages.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (name, definition) in languages::all() {
            registry.register(name, definition);
        }
        registry
    }

    /// Registry with no languages registered.
    pub fn empty() -> Self {
        LanguageRegistry {
            languages: HashMap::new(),
            aliases: HashMap::new(),
            order: Vec::new(),
            options: Options::default(),
        }
    }

    /// Register a grammar under an identifier. Re-registration replaces
    /// the prior grammar; aliases come from the grammar root.
    pub fn register(&mut self, name: &str, definition: Mode) {
        for alias in &definition.aliases {
            self.aliases.insert(alias.clone(), name.to_string());
        }
        if !self.languages.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.languages.insert(
            name.to_string(),
            LanguageEntry {
                definition,
                compiled: OnceCell::new(),
            },
        );
    }

    /// Resolve an identifier or alias to its grammar definition.
    pub fn resolve(&self, name: &str) -> Result<&Mode> {
        self.entry(name)
            .map(|(_, entry)| &entry.definition)
            .ok_or_else(|| HighlightError::UnknownLanguage(name.to_string()))
    }

    /// Does the identifier (or an alias) resolve at all?
    pub fn is_registered(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Canonical names, sorted.
    pub fn list_languages(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.languages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Highlight `text` as `name`. Strict mode surfaces an illegal lexeme
    /// as an error; non-strict converts it to the escaped fallback.
    pub fn highlight(&self, name: &str, text: &str, strict: bool) -> Result<HighlightResult> {
        self.run_highlight(name, text, strict, None)
    }

    /// Highlight resuming from a previous call's continuation state, for
    /// line-oriented callers.
    pub fn highlight_from(
        &self,
        name: &str,
        text: &str,
        strict: bool,
        resume: Option<&Resume>,
    ) -> Result<HighlightResult> {
        self.run_highlight(name, text, strict, resume)
    }

    /// Pick the best-matching grammar for `text`. `restrict` overrides
    /// the configured candidate set.
    pub fn highlight_auto(&self, text: &str, restrict: Option<&[&str]>) -> HighlightResult {
        self.run_auto(text, restrict)
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    pub(crate) fn registration_order(&self) -> &[String] {
        &self.order
    }

    pub(crate) fn run_highlight(
        &self,
        name: &str,
        text: &str,
        strict: bool,
        resume: Option<&Resume>,
    ) -> Result<HighlightResult> {
        let (canonical, grammar) = self.compiled(name)?;
        let tokenizer = Tokenizer::new(self, grammar, canonical, resume);
        match tokenizer.run(text) {
            Err(HighlightError::IllegalLexeme { .. }) if !strict => {
                Ok(HighlightResult::plain(text))
            }
            other => other,
        }
    }

    pub(crate) fn run_auto(&self, text: &str, restrict: Option<&[&str]>) -> HighlightResult {
        match restrict {
            Some(subset) => detect::auto_detect(self, text, Some(subset)),
            None => match &self.options.languages {
                Some(configured) => {
                    let subset: Vec<&str> = configured.iter().map(String::as_str).collect();
                    detect::auto_detect(self, text, Some(&subset))
                }
                None => detect::auto_detect(self, text, None),
            },
        }
    }

    fn entry(&self, name: &str) -> Option<(&str, &LanguageEntry)> {
        if let Some((key, entry)) = self.languages.get_key_value(name) {
            return Some((key.as_str(), entry));
        }
        let canonical = self.aliases.get(name)?;
        self.languages
            .get_key_value(canonical)
            .map(|(key, entry)| (key.as_str(), entry))
    }

    /// Compiled grammar for an identifier, building it on first use.
    fn compiled(&self, name: &str) -> Result<(&str, &CompiledGrammar)> {
        let (canonical, entry) = self
            .entry(name)
            .ok_or_else(|| HighlightError::UnknownLanguage(name.to_string()))?;
        if let Some(grammar) = entry.compiled.get() {
            return Ok((canonical, grammar));
        }
        let grammar = compile::compile(canonical, &entry.definition)?;
        Ok((canonical, entry.compiled.get_or_init(|| grammar)))
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{Keywords, Mode, ModeRef};

    fn toy_grammar() -> Mode {
        Mode {
            aliases: vec!["plaything".to_string()],
            keywords: Some(Keywords::plain("if else while")),
            contains: vec![ModeRef::inline(crate::mode::c_number_mode())],
            ..Mode::default()
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = LanguageRegistry::empty();
        registry.register("toy", toy_grammar());

        assert!(registry.is_registered("toy"));
        assert!(registry.is_registered("plaything"));
        assert!(!registry.is_registered("other"));
        assert!(registry.resolve("plaything").is_ok());
        assert!(matches!(
            registry.resolve("other"),
            Err(HighlightError::UnknownLanguage(_))
        ));
    }

    #[test]
    fn test_unknown_language_is_fatal_for_highlight() {
        let registry = LanguageRegistry::empty();
        assert!(matches!(
            registry.highlight("toy", "if x", false),
            Err(HighlightError::UnknownLanguage(_))
        ));
    }

    #[test]
    fn test_highlight_keywords_and_numbers() {
        let mut registry = LanguageRegistry::empty();
        registry.register("toy", toy_grammar());

        let result = registry.highlight("toy", "if x > 1", false).unwrap();
        assert_eq!(result.language.as_deref(), Some("toy"));
        assert_eq!(
            result.markup,
            "<span class=\"hljs-keyword\">if</span> x &gt; <span class=\"hljs-number\">1</span>"
        );
        assert_eq!(result.relevance, 1);
    }

    #[test]
    fn test_alias_result_matches_canonical() {
        let mut registry = LanguageRegistry::empty();
        registry.register("toy", toy_grammar());

        let direct = registry.highlight("toy", "while 1", false).unwrap();
        let aliased = registry.highlight("plaything", "while 1", false).unwrap();
        assert_eq!(direct.markup, aliased.markup);
        assert_eq!(direct.language, aliased.language);
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = LanguageRegistry::empty();
        registry.register("toy", toy_grammar());
        let before = registry.highlight("toy", "if", false).unwrap();
        assert!(before.markup.contains("hljs-keyword"));

        registry.register(
            "toy",
            Mode {
                keywords: Some(Keywords::plain("unless")),
                ..Mode::default()
            },
        );
        let after = registry.highlight("toy", "if", false).unwrap();
        assert!(!after.markup.contains("hljs-keyword"));
        // The replaced grammar keeps its registration slot
        assert_eq!(registry.registration_order().to_vec(), vec!["toy".to_string()]);
    }

    #[test]
    fn test_class_prefix_option() {
        let mut registry = LanguageRegistry::empty();
        registry.register("toy", toy_grammar());
        registry.set_options(Options {
            class_prefix: "code-".to_string(),
            languages: None,
        });
        let result = registry.highlight("toy", "if", false).unwrap();
        assert_eq!(result.markup, "<span class=\"code-keyword\">if</span>");
    }

    #[test]
    fn test_configured_auto_detect_restriction() {
        let mut registry = LanguageRegistry::empty();
        registry.register(
            "loud",
            Mode {
                keywords: Some(Keywords::plain("shout|10")),
                ..Mode::default()
            },
        );
        registry.register(
            "quiet",
            Mode {
                keywords: Some(Keywords::plain("shout")),
                ..Mode::default()
            },
        );
        registry.set_options(Options {
            class_prefix: "hljs-".to_string(),
            languages: Some(vec!["quiet".to_string()]),
        });
        let result = registry.highlight_auto("shout", None);
        assert_eq!(result.language.as_deref(), Some("quiet"));
        // An explicit restriction overrides the configured one
        let result = registry.highlight_auto("shout", Some(&["loud"]));
        assert_eq!(result.language.as_deref(), Some("loud"));
    }

    #[test]
    fn test_list_languages_sorted() {
        let mut registry = LanguageRegistry::empty();
        registry.register("zig", Mode::default());
        registry.register("ada", Mode::default());
        assert_eq!(registry.list_languages(), vec!["ada", "zig"]);
    }

    #[test]
    fn test_builtin_registry() {
        let registry = LanguageRegistry::new();
        for name in ["xml", "css", "javascript", "json", "markdown", "python", "http"] {
            assert!(registry.is_registered(name), "missing builtin: {name}");
        }
        assert!(registry.is_registered("html"));
        assert!(registry.is_registered("js"));
        assert!(registry.is_registered("py"));
    }
}
