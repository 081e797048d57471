//! Language auto-detection
//!
//! Runs the tokenizer over every candidate grammar in non-strict mode and
//! picks the highest relevance. Candidates are tried in registration
//! order and ties keep the earlier candidate, so a fixed registry and
//! input always produce the same winner.

use crate::registry::LanguageRegistry;
use crate::tokenize::HighlightResult;

/// Rank `text` against the candidate grammars. `restrict` limits the
/// field; unknown names in it are skipped. The runner-up is kept in
/// `second_best` whenever a winner exists.
pub(crate) fn auto_detect(
    registry: &LanguageRegistry,
    text: &str,
    restrict: Option<&[&str]>,
) -> HighlightResult {
    let order: Vec<String>;
    let candidates: Vec<&str> = match restrict {
        Some(subset) => subset.to_vec(),
        None => {
            order = registry.registration_order().to_vec();
            order.iter().map(String::as_str).collect()
        }
    };

    let mut best = HighlightResult::plain(text);
    let mut second = best.clone();
    for name in candidates {
        if !registry.is_registered(name) {
            continue;
        }
        // Illegal lexemes were already converted to relevance 0 inside the
        // non-strict run; a grammar that fails to compile drops out here.
        let Ok(candidate) = registry.run_highlight(name, text, false, None) else {
            continue;
        };
        if candidate.relevance > second.relevance {
            second = candidate.clone();
        }
        if candidate.relevance > best.relevance {
            second = std::mem::replace(&mut best, candidate);
        }
    }
    if best.language.is_some() {
        best.second_best = Some(Box::new(second));
    }
    best
}
