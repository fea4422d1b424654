//! Per-site scraping configuration
//!
//! Selector fallback chains, price rules, timeouts and throttle windows all
//! vary per site, so they live together in a JSON-loadable profile. A partial
//! config file only overrides the fields it names; everything else keeps the
//! built-in defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::price::PriceRules;

/// Errors that can occur while loading or validating a site profile.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for a site profile.
    #[error("failed to parse config file '{path}'")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured category URL does not parse.
    #[error("invalid base URL '{url}'")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Ordered selector fallback chains, one per extracted field.
///
/// Order encodes preference: chains are walked front to back and the first
/// pattern that matches settles the field (or, for `cards`, every pattern
/// contributes to the deduplicated union).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorChains {
    /// Card-container patterns probed for presence before extraction, each
    /// with its own short timeout. Coarser than `cards`: a grid wrapper
    /// appearing is enough to call the page ready.
    pub containers: Vec<String>,
    /// Structural patterns that identify product cards on a category page.
    pub cards: Vec<String>,
    /// Product title, within card scope.
    pub title: Vec<String>,
    /// Product link; the first href-bearing match is the card's mandatory key.
    pub link: Vec<String>,
    /// Raw price text, within card scope.
    pub price: Vec<String>,
    /// Product image element.
    pub image: Vec<String>,
    /// Image source attributes: the explicit one first, lazy-load fallbacks
    /// after it.
    pub image_attrs: Vec<String>,
}

impl Default for SelectorChains {
    fn default() -> Self {
        Self {
            containers: vec![
                "[class*='products-list']".to_string(),
                "[class*='catalog-grid']".to_string(),
                "div[class*='product-card']".to_string(),
            ],
            cards: vec![
                "div[class*='product-card']".to_string(),
                "[data-testid='product-tile']".to_string(),
                "article[class*='product']".to_string(),
                "li[class*='product']".to_string(),
            ],
            title: vec![
                "[class*='product-card__title']".to_string(),
                "[class*='product-card__name']".to_string(),
                "[data-testid='product-title']".to_string(),
                "h3".to_string(),
                "h2".to_string(),
            ],
            link: vec!["a[href]".to_string()],
            price: vec![
                "[class*='product-card__price']".to_string(),
                "[data-testid='price']".to_string(),
                "span[class*='price']".to_string(),
            ],
            image: vec!["img".to_string()],
            image_attrs: vec![
                "src".to_string(),
                "data-src".to_string(),
                "data-lazy-src".to_string(),
            ],
        }
    }
}

/// One site's scraping profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Human-readable site name carried into every record.
    pub site: String,
    /// Category label carried into every record.
    pub category: String,
    /// Bare category page URL; later pages get a `page` query parameter.
    pub base_url: String,
    /// Currency symbol attached to normalized listings.
    pub currency: String,
    /// User agent presented by the browsing backend.
    pub user_agent: String,
    /// Upper bound on pages visited in one run.
    pub max_pages: u32,
    pub selectors: SelectorChains,
    pub price: PriceRules,
    /// Inter-page delay window in milliseconds; the actual pause is drawn
    /// uniformly from this range.
    pub delay_ms: (u64, u64),
    /// Navigation / readiness timeout in seconds. Long: protects against a
    /// hung network, not a slow template.
    pub navigation_timeout_secs: u64,
    /// Per-pattern card-container presence timeout in seconds.
    pub selector_timeout_secs: u64,
    /// Grace period in seconds when no known container pattern appears.
    pub grace_period_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: "Fora.ua".to_string(),
            category: "Молочні продукти та яйця".to_string(),
            base_url: "https://fora.ua/category/molochni-produkty-ta-iaitsia-2656".to_string(),
            currency: "₴".to_string(),
            user_agent: "shelfwatch/0.1 (+https://github.com/shelfwatch/shelfwatch)".to_string(),
            max_pages: 5,
            selectors: SelectorChains::default(),
            price: PriceRules::default(),
            delay_ms: (800, 2500),
            navigation_timeout_secs: 120,
            selector_timeout_secs: 5,
            grace_period_secs: 3,
        }
    }
}

impl SiteConfig {
    /// Load a profile from a JSON file, filling unnamed fields with defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn selector_timeout(&self) -> Duration {
        Duration::from_secs(self.selector_timeout_secs)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }
}
