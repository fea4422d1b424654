//! Product-card location heuristics

use std::collections::HashSet;

use crate::backend::DomElement;

/// Locates candidate product cards by a union of structural heuristics.
///
/// No single site keeps its markup consistent across page templates, so every
/// configured pattern is applied independently and the results are unioned to
/// maximize recall. The union is deduplicated by element identity, so a card
/// matched by two patterns is counted once, and first-seen order is preserved
/// for determinism.
pub struct CardLocator {
    patterns: Vec<String>,
}

impl CardLocator {
    pub fn new(patterns: &[String]) -> Self {
        Self {
            patterns: patterns.to_vec(),
        }
    }

    /// All distinct card candidates under `root`.
    ///
    /// An empty result is a valid outcome, not an error; the caller decides
    /// whether to fall back or stop.
    pub fn locate<E: DomElement>(&self, root: &E) -> Vec<E> {
        let mut seen = HashSet::new();
        let mut cards = Vec::new();

        for pattern in &self.patterns {
            for element in root.select_all(pattern) {
                if seen.insert(element.identity()) {
                    cards.push(element);
                }
            }
        }

        cards
    }
}
