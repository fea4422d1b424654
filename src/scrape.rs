//! Page scraping and sequential pagination
//!
//! One run walks a category's pages strictly in order: single browsing
//! session, one page at a time, with a randomized pause between pages. The
//! only asynchrony is I/O suspension during navigation and readiness waits.
//! Per-page failures are recorded and the loop moves on; the run always
//! finishes with whatever it managed to aggregate.
//!
//! # Example
//!
//! ```ignore
//! use shelfwatch::{HttpBrowser, PaginationDriver, RunContext, SiteConfig};
//!
//! let config = SiteConfig::default();
//! let ctx = RunContext::begin(&config.site, &config.category, &config.currency);
//! let driver = PaginationDriver::new(&config)?;
//!
//! let mut browser = HttpBrowser::new(&config.user_agent)?;
//! let session = driver.run(&mut browser, &ctx).await;
//! println!("{} items, {} failed pages", session.items.len(), session.fails.len());
//! ```

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::browser::Browser;
use crate::config::{ConfigError, SiteConfig};
use crate::error::ScrapeError;
use crate::extract::{FieldExtractor, RawItem};
use crate::locate::CardLocator;
use crate::record::{NormalizedListing, PageFailure, RunContext, ScrapeSession};

/// Observer trait for receiving the progress events of one scraping run.
///
/// Implement this to report progress, collect custom metrics, or feed a
/// monitoring pipeline without touching the driver itself.
///
/// # Example
///
/// ```ignore
/// use shelfwatch::ScrapeObserver;
///
/// struct PrintlnObserver;
///
/// #[async_trait::async_trait]
/// impl ScrapeObserver for PrintlnObserver {
///     async fn on_page_scraped(&self, page: u32, url: &str, items: usize) {
///         println!("page {page}: {items} items ({url})");
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait ScrapeObserver: Send + Sync {
    /// Called before a page is navigated to.
    async fn on_page_started(&self, _page: u32, _url: &str) {}

    /// Called when a page has been scraped successfully.
    async fn on_page_scraped(&self, _page: u32, _url: &str, _items: usize) {}

    /// Called when a page fails; the run continues afterwards.
    async fn on_page_failed(&self, _failure: &PageFailure) {}

    /// Called for every normalized listing appended to the session.
    async fn on_item(&self, _listing: &NormalizedListing) {}

    /// Called once when the loop is exhausted and the session is sealed.
    async fn on_run_complete(&self, _session: &ScrapeSession) {}
}

/// Registry fanning events out to every registered observer.
pub struct ObserverRegistry {
    observers: Vec<Arc<dyn ScrapeObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Register an observer to receive run events.
    pub fn register(&mut self, observer: Arc<dyn ScrapeObserver>) {
        self.observers.push(observer);
    }

    pub async fn notify_page_started(&self, page: u32, url: &str) {
        for observer in &self.observers {
            observer.on_page_started(page, url).await;
        }
    }

    pub async fn notify_page_scraped(&self, page: u32, url: &str, items: usize) {
        for observer in &self.observers {
            observer.on_page_scraped(page, url, items).await;
        }
    }

    pub async fn notify_page_failed(&self, failure: &PageFailure) {
        for observer in &self.observers {
            observer.on_page_failed(failure).await;
        }
    }

    pub async fn notify_item(&self, listing: &NormalizedListing) {
        for observer in &self.observers {
            observer.on_item(listing).await;
        }
    }

    pub async fn notify_run_complete(&self, session: &ScrapeSession) {
        for observer in &self.observers {
            observer.on_run_complete(session).await;
        }
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Scrapes one category page into raw items.
pub struct PageScraper<'c> {
    config: &'c SiteConfig,
    locator: CardLocator,
}

impl<'c> PageScraper<'c> {
    pub fn new(config: &'c SiteConfig) -> Self {
        Self {
            locator: CardLocator::new(&config.selectors.cards),
            config,
        }
    }

    /// Load `url` and extract every resolvable product card on it.
    ///
    /// Navigation and document errors propagate to the caller as page-level
    /// failures, not run-level ones. An empty vector is a valid result.
    pub async fn scrape_page<B: Browser>(
        &self,
        browser: &mut B,
        url: &Url,
    ) -> Result<Vec<RawItem>, ScrapeError> {
        browser.navigate(url, self.config.navigation_timeout()).await?;

        // Probe the known container patterns in order, first hit wins. A page
        // matching none of them may still carry cards under markup we have
        // not seen, so wait out a grace period instead of failing the page.
        let mut container_seen = false;
        for pattern in &self.config.selectors.containers {
            if browser
                .wait_for_selector(pattern, self.config.selector_timeout())
                .await?
            {
                container_seen = true;
                break;
            }
        }
        if !container_seen {
            debug!(url = %url, "no known card container; waiting out the grace period");
            sleep(self.config.grace_period()).await;
        }

        let html = browser.document().await?;
        let document = scraper::Html::parse_document(&html);
        let root = document.root_element();

        let extractor = FieldExtractor::new(&self.config.selectors);
        let items: Vec<RawItem> = self
            .locator
            .locate(&root)
            .iter()
            .filter_map(|card| extractor.extract(card, url))
            .collect();

        debug!(url = %url, items = items.len(), "page extracted");
        Ok(items)
    }
}

/// Drives the page loop for one run.
///
/// For each page index up to the configured bound, the driver builds the page
/// URL, invokes the page scraper, and either normalizes and appends the items
/// or records a `PageFailure`. No page failure is fatal to the run. When the
/// loop is exhausted the aggregated session is handed back for the session
/// writer to persist.
pub struct PaginationDriver<'c> {
    config: &'c SiteConfig,
    base: Url,
    observers: ObserverRegistry,
}

impl<'c> PaginationDriver<'c> {
    pub fn new(config: &'c SiteConfig) -> Result<Self, ConfigError> {
        let base = Url::parse(&config.base_url).map_err(|source| ConfigError::BaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        Ok(Self {
            config,
            base,
            observers: ObserverRegistry::new(),
        })
    }

    /// Register an observer to receive run events.
    pub fn observe_with(mut self, observer: Arc<dyn ScrapeObserver>) -> Self {
        self.observers.register(observer);
        self
    }

    /// URL for a 1-based page index: page 1 is the bare category URL, later
    /// pages carry a `page` query parameter.
    pub fn page_url(&self, page: u32) -> Url {
        let mut url = self.base.clone();
        if page > 1 {
            url.query_pairs_mut()
                .append_pair("page", &page.to_string());
        }
        url
    }

    /// Run the full pagination loop and aggregate a session.
    ///
    /// Never fails: page-level errors end up in `fails`, and the session is
    /// returned with whatever was collected. Only the browsing session's
    /// acquisition and release, both owned by the caller, can fail a run.
    pub async fn run<B: Browser>(&self, browser: &mut B, ctx: &RunContext) -> ScrapeSession {
        let scraper = PageScraper::new(self.config);
        let mut session = ScrapeSession::new(ctx, self.config.max_pages);

        info!(
            site = %ctx.site,
            category = %ctx.category,
            session = %ctx.session_id,
            max_pages = self.config.max_pages,
            "run started"
        );

        for page in 1..=self.config.max_pages {
            let url = self.page_url(page);
            self.observers.notify_page_started(page, url.as_str()).await;

            match scraper.scrape_page(browser, &url).await {
                Ok(raw_items) => {
                    if raw_items.is_empty() {
                        // Past the last page most sites serve an empty grid
                        // rather than an error status.
                        debug!(page, "no cards found, ending pagination");
                        break;
                    }
                    let count = raw_items.len();
                    for raw in raw_items {
                        let listing = NormalizedListing::from_raw(raw, &self.config.price, ctx);
                        self.observers.notify_item(&listing).await;
                        session.items.push(listing);
                    }
                    self.observers
                        .notify_page_scraped(page, url.as_str(), count)
                        .await;
                }
                Err(error) => {
                    let failure = PageFailure {
                        page,
                        url: url.to_string(),
                        error: error.to_string(),
                    };
                    warn!(page, url = %url, error = %failure.error, "page failed, continuing");
                    self.observers.notify_page_failed(&failure).await;
                    session.fails.push(failure);
                }
            }

            if page < self.config.max_pages {
                self.pause_between_pages().await;
            }
        }

        self.observers.notify_run_complete(&session).await;
        info!(
            items = session.items.len(),
            fails = session.fails.len(),
            "run finished"
        );
        session
    }

    /// Randomized inter-page pause. A throttle against rate limiting, not a
    /// correctness requirement.
    async fn pause_between_pages(&self) {
        let (min_ms, max_ms) = self.config.delay_ms;
        let delay = if max_ms > min_ms {
            rand::thread_rng().gen_range(min_ms..=max_ms)
        } else {
            min_ms
        };
        if delay > 0 {
            sleep(Duration::from_millis(delay)).await;
        }
    }
}
