//! Grammar compilation
//!
//! Turns a declarative [`Mode`] tree into a flat table of executable
//! [`CompiledMode`] automata addressed by index. Children compile before
//! their parent's terminator is assembled, because the terminator is the
//! union of every child's begin pattern, the mode's own end text, and its
//! illegal text. Named definitions compile once per grammar and are shared
//! by index, which is how recursive grammars (JSON values inside objects
//! inside values) become finite.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use crate::error::{HighlightError, Result};
use crate::mode::{Keywords, Mode, ModeRef, SubLanguage};

/// Zero-width sentinel used for unset begin/end patterns; matches at every
/// position, so no mode can stall the scan
const SENTINEL: &str = "\\B|\\b";

/// Default lexeme tokenizer for keyword classification
const DEFAULT_LEXEMES: &str = "\\b\\w+\\b";

/// The executable automaton derived from one [`Mode`].
#[derive(Debug)]
pub struct CompiledMode {
    /// Class name for this mode's span
    pub class_name: Option<String>,
    /// Derived begin pattern (sentinel when undeclared)
    pub begin: Regex,
    /// End pattern; `None` for the root and for pure ends-with-parent modes
    pub end: Option<Regex>,
    /// Illegal pattern, if declared
    pub illegal: Option<Regex>,
    /// Union of child begins, own end text and illegal text; `None` is the
    /// matcher that never succeeds
    pub terminators: Option<Regex>,
    /// Lexeme tokenizer for keyword classification
    pub lexemes: Regex,
    /// word -> (category, weight)
    pub keywords: HashMap<String, (String, u32)>,
    /// Child mode indices, in declaration order
    pub contains: Vec<usize>,
    /// Mode entered right after this one closes
    pub starts: Option<usize>,
    /// Relevance weight (default 1)
    pub relevance: u32,
    /// Delegation target instead of keyword classification
    pub sub_language: Option<SubLanguage>,
    /// Persist sub-language state across occurrences
    pub continuous: bool,
    pub ends_with_parent: bool,
    pub ends_parent: bool,
    pub return_begin: bool,
    pub exclude_begin: bool,
    pub return_end: bool,
    pub exclude_end: bool,
}

/// A fully compiled grammar: mode table with the root at index 0.
#[derive(Debug)]
pub struct CompiledGrammar {
    pub modes: Vec<CompiledMode>,
    pub case_insensitive: bool,
}

/// Per-node data needed by other nodes before this node finishes
/// compiling: a parent's terminator wants its children's begin sources,
/// and an ends-with-parent child wants its parent's terminator-end text.
struct Header {
    begin_source: String,
    terminator_end: String,
    has_begin_keywords: bool,
}

struct Compiler<'a> {
    language: &'a str,
    root: &'a Mode,
    case_insensitive: bool,
    headers: Vec<Header>,
    built: Vec<Option<CompiledMode>>,
    named: HashMap<String, usize>,
}

/// Compile a grammar root into its mode table.
pub fn compile(language: &str, root: &Mode) -> Result<CompiledGrammar> {
    let mut compiler = Compiler {
        language,
        root,
        case_insensitive: root.case_insensitive,
        headers: Vec::new(),
        built: Vec::new(),
        named: HashMap::new(),
    };
    compiler.compile_mode(root, None)?;
    Ok(CompiledGrammar {
        modes: compiler
            .built
            .into_iter()
            .map(|m| m.expect("every allocated mode is built"))
            .collect(),
        case_insensitive: root.case_insensitive,
    })
}

impl<'a> Compiler<'a> {
    fn regex(&self, source: &str) -> Result<Regex> {
        RegexBuilder::new(source)
            .multi_line(true)
            .case_insensitive(self.case_insensitive)
            .build()
            .map_err(|e| HighlightError::Grammar {
                language: self.language.to_string(),
                source: e,
            })
    }

    fn compile_mode(&mut self, mode: &Mode, parent: Option<usize>) -> Result<usize> {
        let idx = self.headers.len();

        // Begin: explicit keywords win over an explicit pattern, then the
        // sentinel. The root never begins, but a sentinel keeps the field
        // uniform.
        let (begin_source, has_begin_keywords) = match (&mode.begin_keywords, parent) {
            (Some(words), Some(_)) => (
                format!(
                    "\\b({})\\b",
                    words.split_whitespace().collect::<Vec<_>>().join("|")
                ),
                true,
            ),
            _ => (
                mode.begin
                    .clone()
                    .filter(|_| parent.is_some())
                    .unwrap_or_else(|| SENTINEL.to_string()),
                false,
            ),
        };

        // End: explicit, or the sentinel unless the mode ends with its
        // parent. The terminator-end text additionally unions the parent's
        // when ends-with-parent, so the combined scan still stops there.
        let end_source = if parent.is_none() {
            None
        } else if mode.end.is_some() {
            mode.end.clone()
        } else if !mode.ends_with_parent {
            Some(SENTINEL.to_string())
        } else {
            None
        };
        let mut terminator_end = end_source.clone().unwrap_or_default();
        if mode.ends_with_parent {
            if let Some(p) = parent {
                let parent_end = &self.headers[p].terminator_end;
                if !parent_end.is_empty() {
                    if !terminator_end.is_empty() {
                        terminator_end.push('|');
                    }
                    terminator_end.push_str(parent_end);
                }
            }
        }

        self.headers.push(Header {
            begin_source: begin_source.clone(),
            terminator_end: terminator_end.clone(),
            has_begin_keywords,
        });
        self.built.push(None);

        let begin = self.regex(&begin_source)?;
        let end = end_source.as_deref().map(|s| self.regex(s)).transpose()?;
        let illegal = mode.illegal.as_deref().map(|s| self.regex(s)).transpose()?;
        let lexemes = self.regex(mode.lexemes.as_deref().unwrap_or(DEFAULT_LEXEMES))?;
        let keywords = self.build_keywords(mode);

        // Children before terminator; variants expand in place.
        let mut contains = Vec::new();
        for child in &mode.contains {
            match child {
                ModeRef::SelfRef => contains.push(idx),
                ModeRef::Ref(name) => contains.push(self.compile_ref(name, idx)?),
                ModeRef::Inline(m) => {
                    if m.variants.is_empty() {
                        contains.push(self.compile_mode(m, Some(idx))?);
                    } else {
                        for variant in &m.variants {
                            let expanded = Mode::inherit(m, variant.clone());
                            contains.push(self.compile_mode(&expanded, Some(idx))?);
                        }
                    }
                }
            }
        }

        // A continuation mode is a sibling, not a child: it compiles with
        // the declaring mode's parent.
        let starts = match &mode.starts {
            None => None,
            Some(ModeRef::SelfRef) => Some(idx),
            Some(ModeRef::Ref(name)) => Some(self.compile_ref(name, parent.unwrap_or(idx))?),
            Some(ModeRef::Inline(m)) => Some(self.compile_mode(m, parent)?),
        };

        let mut parts: Vec<String> = Vec::new();
        for &child in &contains {
            let header = &self.headers[child];
            if header.has_begin_keywords {
                parts.push(format!("\\.?({})\\.?", header.begin_source));
            } else {
                parts.push(header.begin_source.clone());
            }
        }
        if !terminator_end.is_empty() {
            parts.push(terminator_end);
        }
        if let Some(ill) = &mode.illegal {
            parts.push(ill.clone());
        }
        let terminators = if parts.is_empty() {
            None
        } else {
            Some(self.regex(&parts.join("|"))?)
        };

        self.built[idx] = Some(CompiledMode {
            class_name: mode.class_name.clone(),
            begin,
            end,
            illegal,
            terminators,
            lexemes,
            keywords,
            contains,
            starts,
            relevance: mode.relevance.unwrap_or(1),
            sub_language: mode.sub_language.clone(),
            continuous: mode.continuous,
            ends_with_parent: mode.ends_with_parent,
            ends_parent: mode.ends_parent,
            return_begin: mode.return_begin,
            exclude_begin: mode.exclude_begin,
            return_end: mode.return_end,
            exclude_end: mode.exclude_end,
        });
        Ok(idx)
    }

    /// Resolve a named definition, compiling it on first use. The name is
    /// claimed before recursing so cyclic references resolve to the index
    /// being built. The first referencing parent fixes inherited state.
    fn compile_ref(&mut self, name: &str, parent: usize) -> Result<usize> {
        if let Some(&idx) = self.named.get(name) {
            return Ok(idx);
        }
        let definition = self
            .root
            .definitions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m.clone())
            .unwrap_or_else(|| {
                panic!(
                    "grammar {:?}: unresolved mode reference {:?}",
                    self.language, name
                )
            });
        let idx = self.headers.len();
        self.named.insert(name.to_string(), idx);
        let built = self.compile_mode(&definition, Some(parent))?;
        debug_assert_eq!(built, idx);
        Ok(built)
    }

    /// Normalize the keyword specification into word -> (category, weight).
    /// Begin-keywords double as the table when no spec is present.
    fn build_keywords(&self, mode: &Mode) -> HashMap<String, (String, u32)> {
        let spec = match (&mode.keywords, &mode.begin_keywords) {
            (Some(spec), _) => spec.clone(),
            (None, Some(words)) => Keywords::Plain(words.clone()),
            (None, None) => return HashMap::new(),
        };
        let groups: Vec<(String, String)> = match spec {
            Keywords::Plain(words) => vec![("keyword".to_string(), words)],
            Keywords::Grouped(groups) => groups,
        };
        let mut table = HashMap::new();
        for (category, words) in groups {
            for word in words.split_whitespace() {
                let (word, weight) = match word.split_once('|') {
                    Some((w, n)) => (w, n.parse().unwrap_or(1)),
                    None => (word, 1),
                };
                let key = if self.case_insensitive {
                    word.to_lowercase()
                } else {
                    word.to_string()
                };
                table.insert(key, (category.clone(), weight));
            }
        }
        table
    }
}
