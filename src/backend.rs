//! DOM backend abstraction over the parsed document tree

use std::hash::{DefaultHasher, Hash, Hasher};

/// Capability set the extraction logic needs from one DOM element.
///
/// The Card Locator and Field Extractor are pure functions over this trait,
/// so they run against any parsed document model: the shipped
/// `scraper::ElementRef` implementation or a hand-built test double.
pub trait DomElement {
    /// Select all descendant elements matching the CSS selector, in document
    /// order.
    ///
    /// Returns an empty vector if no elements match or if the selector is
    /// invalid.
    fn select_all(&self, selector: &str) -> Vec<Self>
    where
        Self: Sized;

    /// Select the first descendant element matching the CSS selector.
    ///
    /// Returns `None` if no element matches or if the selector is invalid.
    fn select_first(&self, selector: &str) -> Option<Self>
    where
        Self: Sized;

    /// Get the text content of this element.
    ///
    /// This includes all text from child elements, whitespace-collapsed.
    fn text(&self) -> String;

    /// Get the value of an HTML attribute.
    ///
    /// Returns `None` if the attribute doesn't exist.
    fn attr(&self, name: &str) -> Option<&str>;

    /// Stable identity of the underlying node within its document.
    ///
    /// Two references to the same node must agree on this key, and distinct
    /// nodes in one document must not collide. The Card Locator dedups the
    /// union of its pattern matches by this key, not by content.
    fn identity(&self) -> u64;
}

/// Implementation of DomElement for scraper::ElementRef
impl<'a> DomElement for scraper::ElementRef<'a> {
    fn select_all(&self, selector: &str) -> Vec<Self> {
        let selector = match scraper::Selector::parse(selector) {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        self.select(&selector).collect()
    }

    fn select_first(&self, selector: &str) -> Option<Self> {
        let selector = scraper::Selector::parse(selector).ok()?;
        self.select(&selector).next()
    }

    fn text(&self) -> String {
        self.text()
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn identity(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.id().hash(&mut hasher);
        hasher.finish()
    }
}
