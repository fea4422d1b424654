//! Price text normalization
//!
//! Category pages hand back price strings in every shape the template
//! designers could think of: `"129,90 грн"`, `"1 299.00 ₴"`, `"від 42 грн"`.
//! Normalization turns those into a bounded numeric value or rejects them.
//! A rejected price is `None`, never a guessed number.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// First contiguous `integer[.fraction]` token after cleanup.
static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("numeric token pattern is valid"));

/// Per-site price interpretation rules.
///
/// The plausibility bounds are a heuristic guard against unit-price artifacts
/// ("per 100g" comparison tables) and erroneous digit concatenations, not a
/// domain rule. Tune them per site and category.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PriceRules {
    /// Currency symbols and unit words stripped before parsing, matched
    /// case-insensitively.
    pub strip_tokens: Vec<String>,
    /// Lowest price considered plausible.
    pub min_plausible: f64,
    /// Highest price considered plausible.
    pub max_plausible: f64,
}

impl Default for PriceRules {
    fn default() -> Self {
        Self {
            strip_tokens: vec!["₴".to_string(), "грн".to_string(), "uah".to_string()],
            min_plausible: 0.5,
            max_plausible: 10_000.0,
        }
    }
}

impl PriceRules {
    /// Normalize free-form price text into a bounded numeric value.
    ///
    /// Steps, in order: empty input short-circuits to `None`; currency tokens
    /// are stripped; the decimal comma becomes a decimal point; whitespace
    /// (including non-breaking spaces used as thousands separators) is
    /// removed; the first contiguous numeric token is parsed; values outside
    /// the plausibility bounds are rejected.
    pub fn normalize(&self, text: Option<&str>) -> Option<f64> {
        let raw = text?.trim();
        if raw.is_empty() {
            return None;
        }

        let mut cleaned = raw.to_string();
        for token in &self.strip_tokens {
            if let Ok(pattern) = Regex::new(&format!("(?i){}", regex::escape(token))) {
                cleaned = pattern.replace_all(&cleaned, "").into_owned();
            }
        }
        let cleaned: String = cleaned
            .replace(',', ".")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let token = NUMERIC_TOKEN.find(&cleaned)?;
        let value: f64 = token.as_str().parse().ok()?;

        (self.min_plausible..=self.max_plausible)
            .contains(&value)
            .then_some(value)
    }
}
