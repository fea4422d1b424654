use std::fs;

use shelfwatch::{NormalizedListing, PageFailure, RunContext, ScrapeSession, SessionWriter};

fn sample_session() -> ScrapeSession {
    let ctx = RunContext::begin("Fora.ua", "Молочні продукти та яйця", "₴");
    let mut session = ScrapeSession::new(&ctx, 3);
    session.items.push(NormalizedListing {
        site_name: ctx.site.clone(),
        category: ctx.category.clone(),
        product_name: Some("Молоко 2,5%".to_string()),
        price: Some(42.90),
        currency: ctx.currency.clone(),
        image_url: Some("https://shop.example/img/milk.jpg".to_string()),
        url: "https://shop.example/p/milk".to_string(),
        scraped_at: ctx.scraped_at,
        session_id: ctx.session_id.clone(),
    });
    session.fails.push(PageFailure {
        page: 2,
        url: "https://shop.example/dairy?page=2".to_string(),
        error: "navigation timed out".to_string(),
    });
    session
}

#[test]
fn test_artifact_written_and_named_by_session() {
    let session = sample_session();
    let out_dir = std::env::temp_dir().join(format!("shelfwatch-test-{}", session.session_id));
    let writer = SessionWriter::new(&out_dir);

    let path = writer.write(&session).expect("write succeeds");

    let filename = path.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(
        filename,
        format!("fora_products_{}.json", session.session_id)
    );
    assert!(path.exists());

    let _ = fs::remove_dir_all(&out_dir);
}

#[test]
fn test_artifact_shape() {
    let session = sample_session();
    let out_dir = std::env::temp_dir().join(format!("shelfwatch-shape-{}", session.session_id));
    let writer = SessionWriter::new(&out_dir);

    let path = writer.write(&session).expect("write succeeds");
    let raw = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value["site"], "Fora.ua");
    assert_eq!(value["category"], "Молочні продукти та яйця");
    assert_eq!(value["session_id"], session.session_id.as_str());
    assert_eq!(value["max_pages"], 3);

    let items = value["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["product_name"], "Молоко 2,5%");
    assert_eq!(items[0]["price"], 42.90);
    assert_eq!(items[0]["currency"], "₴");
    assert_eq!(items[0]["url"], "https://shop.example/p/milk");
    assert_eq!(items[0]["session_id"], session.session_id.as_str());

    let fails = value["fails"].as_array().unwrap();
    assert_eq!(fails.len(), 1);
    assert_eq!(fails[0]["page"], 2);
    assert_eq!(fails[0]["error"], "navigation timed out");

    let _ = fs::remove_dir_all(&out_dir);
}

#[test]
fn test_partial_session_still_written() {
    // A run where every page failed still produces an artifact: a partial
    // result is always preferable to no result.
    let ctx = RunContext::begin("Fora.ua", "dairy", "₴");
    let mut session = ScrapeSession::new(&ctx, 2);
    session.fails.push(PageFailure {
        page: 1,
        url: "https://shop.example/dairy".to_string(),
        error: "navigation timed out".to_string(),
    });
    session.fails.push(PageFailure {
        page: 2,
        url: "https://shop.example/dairy?page=2".to_string(),
        error: "navigation timed out".to_string(),
    });

    let out_dir = std::env::temp_dir().join(format!("shelfwatch-partial-{}", session.session_id));
    let writer = SessionWriter::new(&out_dir);

    let path = writer.write(&session).expect("write succeeds");
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(value["items"].as_array().unwrap().len(), 0);
    assert_eq!(value["fails"].as_array().unwrap().len(), 2);

    let _ = fs::remove_dir_all(&out_dir);
}
