// Core modules
mod backend;
mod browser;
mod config;
mod error;
mod extract;
mod locate;
mod price;
mod record;
mod scrape;
mod writer;

// Public exports
pub use backend::DomElement;
pub use browser::{Browser, HttpBrowser};
pub use config::{ConfigError, SelectorChains, SiteConfig};
pub use error::ScrapeError;
pub use extract::{FieldExtractor, RawItem};
pub use locate::CardLocator;
pub use price::PriceRules;
pub use record::{NormalizedListing, PageFailure, RunContext, ScrapeSession};
pub use scrape::{ObserverRegistry, PageScraper, PaginationDriver, ScrapeObserver};
pub use writer::SessionWriter;
