//! Field extraction from product-card elements

use url::Url;

use crate::backend::DomElement;
use crate::config::SelectorChains;

/// One field-extracted product card, before normalization.
///
/// `url` is the mandatory key: a card without a resolvable absolute link
/// never becomes a `RawItem`. The other fields stay raw here; price text is
/// normalized later, under the session's price rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RawItem {
    pub url: Url,
    pub product_name: Option<String>,
    pub price_text: Option<String>,
    pub image_url: Option<Url>,
}

/// Applies the per-field selector fallback chains to one card element.
///
/// Resolution is first-match-wins: the first pattern in a chain that matches
/// anything settles that field, even when a later pattern would have produced
/// a richer value. Partial values are never merged across patterns.
pub struct FieldExtractor<'c> {
    chains: &'c SelectorChains,
}

impl<'c> FieldExtractor<'c> {
    pub fn new(chains: &'c SelectorChains) -> Self {
        Self { chains }
    }

    /// Extract a `RawItem` from one card, resolving URLs against `base`.
    ///
    /// Returns `None` when the card has no resolvable link; missing optional
    /// fields are `None` inside the item, not errors.
    pub fn extract<E: DomElement>(&self, card: &E, base: &Url) -> Option<RawItem> {
        let url = self.resolve_link(card, base)?;

        Some(RawItem {
            url,
            product_name: self.first_text(card, &self.chains.title),
            price_text: self.first_text(card, &self.chains.price),
            image_url: self.resolve_image(card, base),
        })
    }

    /// Text of the first chain pattern that matches within the card scope.
    fn first_text<E: DomElement>(&self, card: &E, chain: &[String]) -> Option<String> {
        let found = chain.iter().find_map(|sel| card.select_first(sel))?;
        let text = found.text();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// First href-bearing anchor in card scope, joined against the base
    /// origin to an absolute URL.
    fn resolve_link<E: DomElement>(&self, card: &E, base: &Url) -> Option<Url> {
        let anchor = self.chains.link.iter().find_map(|sel| card.select_first(sel))?;
        let href = anchor.attr("href")?;
        base.join(href).ok()
    }

    /// Image source: the explicit attribute when present, lazy-load
    /// attributes otherwise, resolved to absolute form.
    fn resolve_image<E: DomElement>(&self, card: &E, base: &Url) -> Option<Url> {
        let image = self.chains.image.iter().find_map(|sel| card.select_first(sel))?;
        let src = self
            .chains
            .image_attrs
            .iter()
            .find_map(|attr| image.attr(attr))
            .filter(|src| !src.trim().is_empty())?;
        base.join(src).ok()
    }
}
