//! Error types for the scraping engine
//!
//! Only page- and run-level problems are errors here. Everything below page
//! granularity is absorbed where it happens: a selector that matches nothing
//! is an absent field, an implausible price is a `None` price, and a card
//! without a resolvable link is dropped without a trace.

use std::time::Duration;

/// Failures surfaced by the browsing backend or the session writer.
///
/// A `ScrapeError` returned from a page scrape becomes a `PageFailure` entry
/// in the session and the run continues; only browsing-session acquisition
/// and release turn one of these into a run-level failure.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// Navigation to a page URL failed or never reached readiness.
    #[error("navigation to '{url}' failed: {reason}")]
    Navigation { url: String, reason: String },

    /// An operation exceeded its timeout budget.
    #[error("'{operation}' timed out after {timeout:?}")]
    Timeout {
        operation: String,
        timeout: Duration,
    },

    /// The browsing backend failed to evaluate the document.
    #[error("backend error: {0}")]
    Backend(String),

    /// A document snapshot was requested before any page was loaded.
    #[error("no document loaded")]
    MissingDocument,

    /// The aggregated session could not be persisted.
    #[error("failed to write session artifact to '{path}'")]
    SessionWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
