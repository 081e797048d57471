//! The scanning engine
//!
//! Walks text against a compiled grammar in a single forward pass. At each
//! step the top mode's terminator regex finds the next relevant boundary
//! (a child's begin, the mode's end, or illegal text); buffered text
//! between boundaries goes through keyword classification or sub-language
//! delegation. There is no backtracking over consumed text.

use std::collections::HashMap;

use regex::Regex;

use crate::compile::CompiledGrammar;
use crate::error::{HighlightError, Result};
use crate::html::{escape, open_span, span, CLOSE_SPAN};
use crate::mode::SubLanguage;
use crate::registry::LanguageRegistry;

/// Opaque continuation state: the mode stack left standing at the end of a
/// pass. Feed it back through [`LanguageRegistry::highlight_from`] to
/// resume a multi-line construct where the previous call stopped. Only
/// valid for the language that produced it.
#[derive(Debug, Clone)]
pub struct Resume {
    pub(crate) language: String,
    pub(crate) stack: Vec<usize>,
}

/// Result of one highlighting pass.
#[derive(Debug, Clone)]
pub struct HighlightResult {
    /// Detected (or requested) canonical language identifier, if any
    pub language: Option<String>,
    /// Accumulated relevance score
    pub relevance: u32,
    /// HTML-safe markup; stripping every tag reproduces the input
    pub markup: String,
    /// Continuation state for line-oriented callers; absent on the
    /// escaped fallback paths
    pub resume: Option<Resume>,
    /// Runner-up candidate from auto-detection
    pub second_best: Option<Box<HighlightResult>>,
}

impl HighlightResult {
    /// The relevance-0, fully escaped fallback.
    pub(crate) fn plain(text: &str) -> Self {
        HighlightResult {
            language: None,
            relevance: 0,
            markup: escape(text),
            resume: None,
            second_best: None,
        }
    }
}

/// Anchored test: does the pattern match at the very start of the lexeme?
fn starts_with(re: &Regex, lexeme: &str) -> bool {
    re.find(lexeme).is_some_and(|m| m.start() == 0)
}

pub(crate) struct Tokenizer<'a> {
    registry: &'a LanguageRegistry,
    grammar: &'a CompiledGrammar,
    language: &'a str,
    class_prefix: &'a str,
    /// Compiled-mode indices; the entry below an entry is its activating
    /// parent. Never empty: the root sits at the bottom throughout.
    stack: Vec<usize>,
    buffer: String,
    result: String,
    relevance: u32,
    /// Per-call resume tokens for continuous sub-language modes
    continuations: HashMap<String, Resume>,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(
        registry: &'a LanguageRegistry,
        grammar: &'a CompiledGrammar,
        language: &'a str,
        resume: Option<&Resume>,
    ) -> Self {
        let stack = match resume {
            Some(r)
                if r.language == language
                    && !r.stack.is_empty()
                    && r.stack.iter().all(|&i| i < grammar.modes.len()) =>
            {
                r.stack.clone()
            }
            _ => vec![0],
        };
        Tokenizer {
            registry,
            grammar,
            language,
            class_prefix: registry.options().class_prefix.as_str(),
            stack,
            buffer: String::new(),
            result: String::new(),
            relevance: 0,
            continuations: HashMap::new(),
        }
    }

    /// Scan `text` to completion. An illegal lexeme surfaces as an error
    /// here; strictness policy is applied by the caller.
    pub(crate) fn run(mut self, text: &str) -> Result<HighlightResult> {
        let grammar = self.grammar;

        // A resumed stack re-opens the spans it left open.
        let resumed = self.stack.clone();
        for &idx in &resumed[1..] {
            if let Some(class) = &grammar.modes[idx].class_name {
                self.result.push_str(&open_span(self.class_prefix, class));
            }
        }

        let mut index = 0;
        loop {
            let top = &grammar.modes[*self.stack.last().expect("stack never empty")];
            let Some(terminators) = top.terminators.as_ref() else {
                break;
            };
            let Some(m) = terminators.find_at(text, index) else {
                break;
            };
            let consumed = self.process_lexeme(&text[index..m.start()], Some(m.as_str()))?;
            index = m.start() + consumed;
            while index < text.len() && !text.is_char_boundary(index) {
                index += 1;
            }
        }
        self.process_lexeme(&text[index..], None)?;

        // Force-close whatever is still open; the stack itself survives as
        // the continuation state.
        let mut closing = String::new();
        for &idx in self.stack[1..].iter().rev() {
            if grammar.modes[idx].class_name.is_some() {
                closing.push_str(CLOSE_SPAN);
            }
        }
        self.result.push_str(&closing);

        Ok(HighlightResult {
            language: Some(self.language.to_string()),
            relevance: self.relevance,
            markup: self.result,
            resume: Some(Resume {
                language: self.language.to_string(),
                stack: self.stack,
            }),
            second_best: None,
        })
    }

    fn top(&self) -> usize {
        *self.stack.last().expect("stack never empty")
    }

    /// First child whose begin pattern matches the start of the lexeme.
    fn sub_mode(&self, lexeme: &str) -> Option<usize> {
        let top = &self.grammar.modes[self.top()];
        top.contains
            .iter()
            .copied()
            .find(|&child| starts_with(&self.grammar.modes[child].begin, lexeme))
    }

    /// Stack position closed by this lexeme, if any. Walks upward through
    /// ends-with-parent modes; an ends-parent match hoists the closure
    /// further up.
    fn end_of_mode(&self, lexeme: &str) -> Option<usize> {
        let mut pos = self.stack.len() - 1;
        loop {
            let mode = &self.grammar.modes[self.stack[pos]];
            if let Some(end) = &mode.end {
                if starts_with(end, lexeme) {
                    let mut hoisted = pos;
                    while self.grammar.modes[self.stack[hoisted]].ends_parent && hoisted > 0 {
                        hoisted -= 1;
                    }
                    return Some(hoisted);
                }
            }
            if mode.ends_with_parent && pos > 0 {
                pos -= 1;
                continue;
            }
            return None;
        }
    }

    /// Handle one terminator match (or, with `None`, the input's end).
    /// Returns how many bytes of the lexeme the cursor consumes.
    fn process_lexeme(&mut self, buffer_add: &str, lexeme: Option<&str>) -> Result<usize> {
        let grammar = self.grammar;
        self.buffer.push_str(buffer_add);

        let Some(lexeme) = lexeme else {
            let flushed = self.process_buffer()?;
            self.result.push_str(&flushed);
            return Ok(0);
        };

        if let Some(child) = self.sub_mode(lexeme) {
            let flushed = self.process_buffer()?;
            self.result.push_str(&flushed);
            self.start_mode(child, lexeme);
            return Ok(if grammar.modes[child].return_begin {
                0
            } else {
                lexeme.len()
            });
        }

        if let Some(end_pos) = self.end_of_mode(lexeme) {
            let origin = self.top();
            let closed = self.stack[end_pos];
            if !grammar.modes[origin].return_end && !grammar.modes[origin].exclude_end {
                self.buffer.push_str(lexeme);
            }
            let flushed = self.process_buffer()?;
            self.result.push_str(&flushed);
            while self.stack.len() > end_pos {
                let popped = self.stack.pop().expect("stack never empty");
                if grammar.modes[popped].class_name.is_some() {
                    self.result.push_str(CLOSE_SPAN);
                }
                self.relevance += grammar.modes[popped].relevance;
            }
            if grammar.modes[origin].exclude_end {
                self.result.push_str(&escape(lexeme));
            }
            self.buffer.clear();
            if let Some(starts) = grammar.modes[closed].starts {
                self.start_mode(starts, "");
            }
            return Ok(if grammar.modes[origin].return_end {
                0
            } else {
                lexeme.len()
            });
        }

        let top = &grammar.modes[self.top()];
        if let Some(illegal) = &top.illegal {
            if starts_with(illegal, lexeme) {
                return Err(HighlightError::IllegalLexeme {
                    lexeme: lexeme.to_string(),
                    mode: top
                        .class_name
                        .clone()
                        .unwrap_or_else(|| "<unnamed>".to_string()),
                });
            }
        }

        self.buffer.push_str(lexeme);
        Ok(lexeme.len().max(1))
    }

    /// Open a mode's span and seed its buffer from the begin lexeme,
    /// honoring return-begin and exclude-begin.
    fn start_mode(&mut self, mode_idx: usize, lexeme: &str) {
        let grammar = self.grammar;
        let mode = &grammar.modes[mode_idx];
        let markup = mode
            .class_name
            .as_deref()
            .map(|class| open_span(self.class_prefix, class))
            .unwrap_or_default();
        if mode.return_begin {
            self.result.push_str(&markup);
            self.buffer.clear();
        } else if mode.exclude_begin {
            self.result.push_str(&escape(lexeme));
            self.result.push_str(&markup);
            self.buffer.clear();
        } else {
            self.result.push_str(&markup);
            self.buffer.clear();
            self.buffer.push_str(lexeme);
        }
        self.stack.push(mode_idx);
    }

    /// Flush the accumulated buffer through keyword classification or
    /// sub-language delegation, per the top mode.
    fn process_buffer(&mut self) -> Result<String> {
        if self.grammar.modes[self.top()].sub_language.is_some() {
            self.process_sub_language()
        } else {
            Ok(self.process_keywords())
        }
    }

    fn process_keywords(&mut self) -> String {
        let grammar = self.grammar;
        let top = &grammar.modes[self.top()];
        let buffer = std::mem::take(&mut self.buffer);
        if top.keywords.is_empty() {
            return escape(&buffer);
        }
        let mut out = String::new();
        let mut last = 0;
        for m in top.lexemes.find_iter(&buffer) {
            out.push_str(&escape(&buffer[last..m.start()]));
            let key = if grammar.case_insensitive {
                m.as_str().to_lowercase()
            } else {
                m.as_str().to_string()
            };
            if let Some((category, weight)) = top.keywords.get(&key) {
                self.relevance += weight;
                out.push_str(&span(self.class_prefix, category, &escape(m.as_str())));
            } else {
                out.push_str(&escape(m.as_str()));
            }
            last = m.end();
        }
        out.push_str(&escape(&buffer[last..]));
        out
    }

    fn process_sub_language(&mut self) -> Result<String> {
        let grammar = self.grammar;
        let top = &grammar.modes[self.top()];
        let buffer = std::mem::take(&mut self.buffer);
        let sub = top
            .sub_language
            .clone()
            .expect("caller checked sub_language");

        let nested = match &sub {
            SubLanguage::Named(name) => {
                if !self.registry.is_registered(name) {
                    return Ok(escape(&buffer));
                }
                let resume = if top.continuous {
                    self.continuations.get(name.as_str()).cloned()
                } else {
                    None
                };
                self.registry
                    .run_highlight(name, &buffer, false, resume.as_ref())?
            }
            SubLanguage::Auto => self.registry.run_auto(&buffer, None),
        };

        // Structural hosts (relevance 0) keep embedded scores out of
        // detection.
        if top.relevance > 0 {
            self.relevance += nested.relevance;
        }
        if top.continuous {
            if let (SubLanguage::Named(name), Some(resume)) = (&sub, &nested.resume) {
                self.continuations.insert(name.clone(), resume.clone());
            }
        }
        Ok(match &nested.language {
            Some(language) => span("", language, &nested.markup),
            None => nested.markup,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::HighlightError;
    use crate::mode::{Mode, ModeRef};
    use crate::registry::LanguageRegistry;

    fn registry_with(grammar: Mode) -> LanguageRegistry {
        let mut registry = LanguageRegistry::empty();
        registry.register("toy", grammar);
        registry
    }

    #[test]
    fn test_return_begin_rescans_begin_text() {
        let registry = registry_with(Mode {
            contains: vec![ModeRef::inline(Mode {
                class_name: Some("wrap".to_string()),
                begin: Some("@".to_string()),
                return_begin: true,
                contains: vec![ModeRef::inline(Mode {
                    class_name: Some("sym".to_string()),
                    begin: Some("@\\w+".to_string()),
                    ..Mode::default()
                })],
                ..Mode::default()
            })],
            ..Mode::default()
        });
        let result = registry.highlight("toy", "@ab", false).unwrap();
        assert_eq!(
            result.markup,
            "<span class=\"wrap\"><span class=\"sym\">@ab</span></span>"
        );
    }

    #[test]
    fn test_exclude_begin_and_end_emit_outside_span() {
        let registry = registry_with(Mode {
            contains: vec![ModeRef::inline(Mode {
                class_name: Some("q".to_string()),
                begin: Some("<<".to_string()),
                end: Some(">>".to_string()),
                exclude_begin: true,
                exclude_end: true,
                ..Mode::default()
            })],
            ..Mode::default()
        });
        let result = registry.highlight("toy", "a<<b>>c", false).unwrap();
        assert_eq!(
            result.markup,
            "a&lt;&lt;<span class=\"q\">b</span>&gt;&gt;c"
        );
    }

    #[test]
    fn test_ends_parent_closes_transitively() {
        let registry = registry_with(Mode {
            contains: vec![ModeRef::inline(Mode {
                class_name: Some("outer".to_string()),
                begin: Some("\\(".to_string()),
                end: Some("\\)".to_string()),
                contains: vec![ModeRef::inline(Mode {
                    class_name: Some("inner".to_string()),
                    begin: Some("!".to_string()),
                    end: Some(";".to_string()),
                    ends_parent: true,
                    ..Mode::default()
                })],
                ..Mode::default()
            })],
            ..Mode::default()
        });
        let result = registry.highlight("toy", "(x!y;z)", false).unwrap();
        assert_eq!(
            result.markup,
            "<span class=\"outer\">(x<span class=\"inner\">!y;</span></span>z)"
        );
    }

    #[test]
    fn test_illegal_error_names_owning_mode() {
        let registry = registry_with(Mode {
            contains: vec![ModeRef::inline(Mode {
                class_name: Some("str".to_string()),
                begin: Some("\"".to_string()),
                end: Some("\"".to_string()),
                illegal: Some("\\n".to_string()),
                ..Mode::default()
            })],
            ..Mode::default()
        });
        let err = registry.highlight("toy", "\"a\nb\"", true).unwrap_err();
        match err {
            HighlightError::IllegalLexeme { lexeme, mode } => {
                assert_eq!(lexeme, "\n");
                assert_eq!(mode, "str");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_forced_closure_at_input_end() {
        let registry = registry_with(Mode {
            contains: vec![ModeRef::inline(Mode {
                class_name: Some("str".to_string()),
                begin: Some("\"".to_string()),
                end: Some("\"".to_string()),
                ..Mode::default()
            })],
            ..Mode::default()
        });
        let result = registry.highlight("toy", "\"unterminated", false).unwrap();
        assert_eq!(
            result.markup,
            "<span class=\"str\">\"unterminated</span>"
        );
        // The continuation stack still holds the open mode
        assert_eq!(result.resume.as_ref().unwrap().stack.len(), 2);
    }
}
