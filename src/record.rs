//! Session records and the run context
//!
//! One run of the Pagination Driver is a session: every listing it produces
//! carries the same `session_id` and `scraped_at`, both minted from the run's
//! start instant. Runs never deduplicate against each other; price-change
//! detection across sessions is a downstream concern.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::extract::RawItem;
use crate::price::PriceRules;

/// Constants shared by every page of one run.
///
/// Threaded explicitly through the Page Scraper and Pagination Driver rather
/// than held as ambient state; a new context (and therefore a new session id)
/// is minted per run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub site: String,
    pub category: String,
    pub currency: String,
    pub session_id: String,
    pub scraped_at: DateTime<Utc>,
}

impl RunContext {
    /// Begin a new session; the id and timestamp derive from the same
    /// instant.
    pub fn begin(
        site: impl Into<String>,
        category: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        let started = Utc::now();
        Self {
            site: site.into(),
            category: category.into(),
            currency: currency.into(),
            session_id: started.format("%Y%m%d_%H%M%S%f").to_string(),
            scraped_at: started,
        }
    }
}

/// The durable listing record.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedListing {
    pub site_name: String,
    pub category: String,
    pub product_name: Option<String>,
    /// `None` or within the configured plausibility bounds, never a guess.
    pub price: Option<f64>,
    pub currency: String,
    pub image_url: Option<String>,
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    pub session_id: String,
}

impl NormalizedListing {
    /// Normalize one raw item under the session's run context.
    pub fn from_raw(raw: RawItem, rules: &PriceRules, ctx: &RunContext) -> Self {
        Self {
            site_name: ctx.site.clone(),
            category: ctx.category.clone(),
            product_name: raw.product_name,
            price: rules.normalize(raw.price_text.as_deref()),
            currency: ctx.currency.clone(),
            image_url: raw.image_url.map(|u| u.to_string()),
            url: raw.url.to_string(),
            scraped_at: ctx.scraped_at,
            session_id: ctx.session_id.clone(),
        }
    }
}

/// One failed page. Recorded in the session, never silently dropped.
#[derive(Debug, Clone, Serialize)]
pub struct PageFailure {
    /// 1-based page index.
    pub page: u32,
    pub url: String,
    pub error: String,
}

/// Aggregated output of one run; written once by the session writer, then
/// immutable.
#[derive(Debug, Serialize)]
pub struct ScrapeSession {
    pub site: String,
    pub category: String,
    pub session_id: String,
    pub scraped_at: DateTime<Utc>,
    pub max_pages: u32,
    pub items: Vec<NormalizedListing>,
    pub fails: Vec<PageFailure>,
}

impl ScrapeSession {
    /// Empty session carrying the run constants; the driver appends to it.
    pub fn new(ctx: &RunContext, max_pages: u32) -> Self {
        Self {
            site: ctx.site.clone(),
            category: ctx.category.clone(),
            session_id: ctx.session_id.clone(),
            scraped_at: ctx.scraped_at,
            max_pages,
            items: Vec::new(),
            fails: Vec::new(),
        }
    }
}
