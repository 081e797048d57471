//! Declarative grammar modes
//!
//! A grammar is a tree of [`Mode`] values describing how to recognize and
//! classify lexical regions. Modes are plain data; the compiler in
//! [`crate::compile`] turns a tree into the executable automaton the
//! tokenizer runs. This module also provides the shared pattern sources
//! and mode templates that grammar definitions build from.

/// Keyword specification for a mode.
///
/// Either a flat word list (every word classifies as `keyword`) or a list
/// of category groups. A word may carry an explicit relevance weight with
/// `word|weight` syntax; the default weight is 1.
#[derive(Debug, Clone)]
pub enum Keywords {
    /// Space-separated words, all in the `keyword` category
    Plain(String),
    /// (category, space-separated words) groups
    Grouped(Vec<(String, String)>),
}

impl Keywords {
    /// Flat keyword list
    pub fn plain(words: &str) -> Self {
        Keywords::Plain(words.to_string())
    }

    /// Category groups, e.g. `[("keyword", "if else"), ("literal", "true false")]`
    pub fn grouped(groups: &[(&str, &str)]) -> Self {
        Keywords::Grouped(
            groups
                .iter()
                .map(|(c, w)| (c.to_string(), w.to_string()))
                .collect(),
        )
    }
}

/// Target of a sub-language delegation.
#[derive(Debug, Clone)]
pub enum SubLanguage {
    /// A specific registered language
    Named(String),
    /// Auto-detect the embedded region against the whole registry
    Auto,
}

/// Reference from a mode to a child (or continuation) mode.
///
/// Grammars with recursive structure (a JSON value contains objects which
/// contain values) cannot be written as a finite tree of owned nodes, so a
/// child is either owned inline, a reference to a named definition on the
/// grammar root (compiled once and shared), or a reference to the
/// containing mode itself.
#[derive(Debug, Clone)]
pub enum ModeRef {
    /// Owned subtree
    Inline(Box<Mode>),
    /// Named definition from the grammar root's `definitions`
    Ref(String),
    /// The containing mode itself
    SelfRef,
}

impl ModeRef {
    /// Wrap an owned mode
    pub fn inline(mode: Mode) -> Self {
        ModeRef::Inline(Box::new(mode))
    }

    /// Reference a named definition
    pub fn named(name: &str) -> Self {
        ModeRef::Ref(name.to_string())
    }
}

/// A declarative grammar node.
///
/// All pattern fields hold regex source text; the compiler builds the
/// actual regexes with the grammar's case-insensitivity applied. Unset
/// begin/end patterns compile to a zero-width sentinel that matches at
/// every position, so every mode has a usable boundary.
#[derive(Debug, Clone, Default)]
pub struct Mode {
    /// Class name emitted for this mode's span; `None` produces no span
    pub class_name: Option<String>,
    /// Pattern opening this mode
    pub begin: Option<String>,
    /// Pattern closing this mode
    pub end: Option<String>,
    /// Space-separated keywords whose appearance opens this mode; also
    /// doubles as the keyword table when `keywords` is unset
    pub begin_keywords: Option<String>,
    /// Keyword classification table for buffered text
    pub keywords: Option<Keywords>,
    /// Custom lexeme pattern for keyword scanning (default `\b\w+\b`)
    pub lexemes: Option<String>,
    /// Pattern that must never occur while this mode is active
    pub illegal: Option<String>,
    /// Relevance weight; defaults to 1, 0 marks a purely structural mode
    pub relevance: Option<u32>,
    /// Ordered child modes
    pub contains: Vec<ModeRef>,
    /// Mode entered immediately after this one closes
    pub starts: Option<ModeRef>,
    /// Pattern variants; each merges over this node and expands into one
    /// sibling in its place
    pub variants: Vec<Mode>,
    /// Delegate this mode's text to another grammar instead of keyword
    /// classification
    pub sub_language: Option<SubLanguage>,
    /// Persist the sub-language's parse state across occurrences within
    /// one top-level call
    pub continuous: bool,
    /// This mode closes when an ancestor's end pattern matches
    pub ends_with_parent: bool,
    /// A match of this mode's end also closes its parent
    pub ends_parent: bool,
    /// Re-scan the begin text as body text instead of consuming it
    pub return_begin: bool,
    /// Emit the begin text outside this mode's span
    pub exclude_begin: bool,
    /// Leave the end text for the parent to re-scan
    pub return_end: bool,
    /// Emit the end text outside this mode's span
    pub exclude_end: bool,
    /// Case-insensitive matching for every pattern (grammar root only)
    pub case_insensitive: bool,
    /// Alternate identifiers (grammar root only)
    pub aliases: Vec<String>,
    /// Named shared subtrees for `ModeRef::Ref` (grammar root only)
    pub definitions: Vec<(String, Mode)>,
}

impl Mode {
    /// Merge `over` onto `base`: set fields of the override win. Used for
    /// variant expansion and for deriving modes from templates.
    pub fn inherit(base: &Mode, over: Mode) -> Mode {
        Mode {
            class_name: over.class_name.or_else(|| base.class_name.clone()),
            begin: over.begin.or_else(|| base.begin.clone()),
            end: over.end.or_else(|| base.end.clone()),
            begin_keywords: over
                .begin_keywords
                .or_else(|| base.begin_keywords.clone()),
            keywords: over.keywords.or_else(|| base.keywords.clone()),
            lexemes: over.lexemes.or_else(|| base.lexemes.clone()),
            illegal: over.illegal.or_else(|| base.illegal.clone()),
            relevance: over.relevance.or(base.relevance),
            contains: if over.contains.is_empty() {
                base.contains.clone()
            } else {
                over.contains
            },
            starts: over.starts.or_else(|| base.starts.clone()),
            variants: over.variants,
            sub_language: over.sub_language.or_else(|| base.sub_language.clone()),
            continuous: over.continuous || base.continuous,
            ends_with_parent: over.ends_with_parent || base.ends_with_parent,
            ends_parent: over.ends_parent || base.ends_parent,
            return_begin: over.return_begin || base.return_begin,
            exclude_begin: over.exclude_begin || base.exclude_begin,
            return_end: over.return_end || base.return_end,
            exclude_end: over.exclude_end || base.exclude_end,
            case_insensitive: over.case_insensitive || base.case_insensitive,
            aliases: if over.aliases.is_empty() {
                base.aliases.clone()
            } else {
                over.aliases
            },
            definitions: if over.definitions.is_empty() {
                base.definitions.clone()
            } else {
                over.definitions
            },
        }
    }
}

// Shared pattern sources, available to every grammar definition.

/// Identifier: a letter followed by word characters
pub const IDENT_RE: &str = "[a-zA-Z]\\w*";
/// Identifier that may start with an underscore
pub const UNDERSCORE_IDENT_RE: &str = "[a-zA-Z_]\\w*";
/// Simple decimal number
pub const NUMBER_RE: &str = "\\b\\d+(\\.\\d+)?";
/// C-family number: hex, decimal, float, exponent
pub const C_NUMBER_RE: &str =
    "\\b(0[xX][a-fA-F0-9]+|(\\d+(\\.\\d*)?|\\.\\d+)([eE][-+]?\\d+)?)";
/// Binary number
pub const BINARY_NUMBER_RE: &str = "\\b(0b[01]+)";
/// Operators and punctuation after which a regexp literal can start
pub const RE_STARTERS_RE: &str = "!|!=|!==|%|%=|&|&&|&=|\\*|\\*=|\\+|\\+=|,|-|-=|/=|/|:|;|<<|<<=|<=|<|===|==|=|>>>=|>>=|>=|>>>|>>|>|\\?|\\[|\\{|\\(|\\^|\\^=|\\||\\|=|\\|\\||~";

/// Backslash followed by anything, relevance-free
pub fn backslash_escape() -> Mode {
    Mode {
        begin: Some("\\\\[\\s\\S]".to_string()),
        relevance: Some(0),
        ..Mode::default()
    }
}

/// Single-quoted string with backslash escapes
pub fn apos_string_mode() -> Mode {
    Mode {
        class_name: Some("string".to_string()),
        begin: Some("'".to_string()),
        end: Some("'".to_string()),
        illegal: Some("\\n".to_string()),
        contains: vec![ModeRef::inline(backslash_escape())],
        ..Mode::default()
    }
}

/// Double-quoted string with backslash escapes
pub fn quote_string_mode() -> Mode {
    Mode {
        class_name: Some("string".to_string()),
        begin: Some("\"".to_string()),
        end: Some("\"".to_string()),
        illegal: Some("\\n".to_string()),
        contains: vec![ModeRef::inline(backslash_escape())],
        ..Mode::default()
    }
}

/// Common English words; their presence inside comments raises relevance
pub fn phrasal_words_mode() -> Mode {
    Mode {
        begin: Some(
            "\\b(a|an|the|are|I|I'm|isn't|don't|doesn't|won't|but|just|should|pretty|simply|enough|gonna|going|wtf|so|such)\\b"
                .to_string(),
        ),
        ..Mode::default()
    }
}

/// Comment template between two delimiters, seeded with the phrasal-words
/// child so prose-heavy comments score relevance
pub fn comment(begin: &str, end: &str) -> Mode {
    Mode {
        class_name: Some("comment".to_string()),
        begin: Some(begin.to_string()),
        end: Some(end.to_string()),
        contains: vec![ModeRef::inline(phrasal_words_mode())],
        ..Mode::default()
    }
}

/// `// …` to end of line
pub fn c_line_comment_mode() -> Mode {
    comment("//", "$")
}

/// `/* … */`
pub fn c_block_comment_mode() -> Mode {
    comment("/\\*", "\\*/")
}

/// `# …` to end of line
pub fn hash_comment_mode() -> Mode {
    comment("#", "$")
}

/// Decimal number span
pub fn number_mode() -> Mode {
    Mode {
        class_name: Some("number".to_string()),
        begin: Some(NUMBER_RE.to_string()),
        relevance: Some(0),
        ..Mode::default()
    }
}

/// C-family number span
pub fn c_number_mode() -> Mode {
    Mode {
        class_name: Some("number".to_string()),
        begin: Some(C_NUMBER_RE.to_string()),
        relevance: Some(0),
        ..Mode::default()
    }
}

/// Binary number span
pub fn binary_number_mode() -> Mode {
    Mode {
        class_name: Some("number".to_string()),
        begin: Some(BINARY_NUMBER_RE.to_string()),
        relevance: Some(0),
        ..Mode::default()
    }
}

/// CSS number with optional unit suffix
pub fn css_number_mode() -> Mode {
    Mode {
        class_name: Some("number".to_string()),
        begin: Some(format!(
            "{}(%|em|ex|ch|rem|vw|vh|vmin|vmax|cm|mm|in|pt|pc|px|deg|grad|rad|turn|s|ms|Hz|kHz|dpi|dpcm|dppx)?",
            NUMBER_RE
        )),
        relevance: Some(0),
        ..Mode::default()
    }
}

/// Regexp literal between slashes
pub fn regexp_mode() -> Mode {
    Mode {
        class_name: Some("regexp".to_string()),
        begin: Some("/".to_string()),
        end: Some("/[gimuy]*".to_string()),
        illegal: Some("\\n".to_string()),
        contains: vec![
            ModeRef::inline(backslash_escape()),
            ModeRef::inline(Mode {
                begin: Some("\\[".to_string()),
                end: Some("\\]".to_string()),
                relevance: Some(0),
                contains: vec![ModeRef::inline(backslash_escape())],
                ..Mode::default()
            }),
        ],
        ..Mode::default()
    }
}

/// Title span over a plain identifier
pub fn title_mode() -> Mode {
    Mode {
        class_name: Some("title".to_string()),
        begin: Some(IDENT_RE.to_string()),
        relevance: Some(0),
        ..Mode::default()
    }
}

/// Title span over an underscore-friendly identifier
pub fn underscore_title_mode() -> Mode {
    Mode {
        class_name: Some("title".to_string()),
        begin: Some(UNDERSCORE_IDENT_RE.to_string()),
        relevance: Some(0),
        ..Mode::default()
    }
}
