use scraper::Html;
use shelfwatch::{CardLocator, DomElement};

fn patterns(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_element_matching_two_patterns_counted_once() {
    // The same card matches both the class-substring pattern and the
    // test-id pattern; identity dedup must keep it once.
    let html = Html::parse_document(
        r#"
        <div>
            <div class="product-card" data-testid="product-tile">
                <a href="/p/1">Milk</a>
            </div>
        </div>
    "#,
    );

    let locator = CardLocator::new(&patterns(&[
        "div[class*='product-card']",
        "[data-testid='product-tile']",
    ]));

    let cards = locator.locate(&html.root_element());
    assert_eq!(cards.len(), 1);
}

#[test]
fn test_union_across_patterns() {
    // Two templates on the same page: only the union of both patterns sees
    // every card.
    let html = Html::parse_document(
        r#"
        <div>
            <div class="product-card"><a href="/p/1">A</a></div>
            <article class="product-item"><a href="/p/2">B</a></article>
        </div>
    "#,
    );

    let locator = CardLocator::new(&patterns(&[
        "div[class*='product-card']",
        "article[class*='product']",
    ]));

    let cards = locator.locate(&html.root_element());
    assert_eq!(cards.len(), 2);
}

#[test]
fn test_first_seen_order_preserved() {
    let html = Html::parse_document(
        r#"
        <div>
            <article class="product-item"><span>first-pattern</span></article>
            <div class="product-card"><span>second-pattern</span></div>
        </div>
    "#,
    );

    // The article pattern comes first in the chain, so its matches lead the
    // result even though the div appears later in the chain order.
    let locator = CardLocator::new(&patterns(&[
        "article[class*='product']",
        "div[class*='product-card']",
    ]));

    let cards = locator.locate(&html.root_element());
    assert_eq!(cards.len(), 2);
    assert!(DomElement::text(&cards[0]).contains("first-pattern"));
    assert!(DomElement::text(&cards[1]).contains("second-pattern"));
}

#[test]
fn test_zero_matches_is_not_an_error() {
    let html = Html::parse_document("<div><p>nothing resembling a card</p></div>");

    let locator = CardLocator::new(&patterns(&["div[class*='product-card']"]));

    assert!(locator.locate(&html.root_element()).is_empty());
}

#[test]
fn test_invalid_pattern_skipped() {
    let html = Html::parse_document(
        r#"<div><div class="product-card"><a href="/p/1">A</a></div></div>"#,
    );

    // A broken selector in the chain contributes nothing; the rest of the
    // chain still runs.
    let locator = CardLocator::new(&patterns(&["div[[[", "div[class*='product-card']"]));

    assert_eq!(locator.locate(&html.root_element()).len(), 1);
}
