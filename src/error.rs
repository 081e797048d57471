//! Error types for hilite

use thiserror::Error;

/// Result type alias for hilite operations
pub type Result<T> = std::result::Result<T, HighlightError>;

/// Highlighting error types
#[derive(Error, Debug)]
pub enum HighlightError {
    /// The requested identifier resolves to no registered grammar,
    /// directly or through an alias.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    /// Scanned text matched a mode's declared illegal pattern. Only
    /// surfaced on strict highlighting; the non-strict paths convert it
    /// into a relevance-0 escaped result.
    #[error("illegal lexeme {lexeme:?} for mode {mode:?}")]
    IllegalLexeme {
        /// The offending text
        lexeme: String,
        /// Class name of the mode that owned the scan, or "<unnamed>"
        mode: String,
    },

    /// A grammar declared a pattern the regex engine rejects.
    #[error("grammar {language:?}: {source}")]
    Grammar {
        /// Language whose grammar failed to compile
        language: String,
        #[source]
        source: regex::Error,
    },
}
