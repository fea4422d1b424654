use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use shelfwatch::{
    Browser, HttpBrowser, PageFailure, PaginationDriver, RunContext, ScrapeObserver, SessionWriter,
    SiteConfig,
};

#[derive(Parser, Debug)]
#[command(
    name = "shelfwatch",
    about = "Scrape product listings from a category page into a session JSON"
)]
struct Args {
    /// Path to a site profile JSON; omit to use the built-in Fora.ua profile.
    #[arg(long, env = "SHELFWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured page bound.
    #[arg(long, env = "SHELFWATCH_MAX_PAGES")]
    max_pages: Option<u32>,

    /// Directory the session artifact is written to.
    #[arg(long, env = "SHELFWATCH_OUT_DIR", default_value = "data")]
    out_dir: PathBuf,

    /// Reduce log output to warnings and errors.
    #[arg(long)]
    quiet: bool,
}

/// Progress reporting over the observer seam.
struct LogObserver;

#[async_trait::async_trait]
impl ScrapeObserver for LogObserver {
    async fn on_page_scraped(&self, page: u32, url: &str, items: usize) {
        info!(page, url, items, "page scraped");
    }

    async fn on_page_failed(&self, failure: &PageFailure) {
        error!(
            page = failure.page,
            url = %failure.url,
            error = %failure.error,
            "page failed"
        );
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "run failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => SiteConfig::from_file(path)?,
        None => SiteConfig::default(),
    };
    if let Some(max_pages) = args.max_pages {
        config.max_pages = max_pages;
    }

    let ctx = RunContext::begin(
        config.site.as_str(),
        config.category.as_str(),
        config.currency.as_str(),
    );
    let driver = PaginationDriver::new(&config)?.observe_with(Arc::new(LogObserver));

    // The browsing session is the one resource with run-level failure
    // semantics: acquired once, released exactly once, and whatever was
    // aggregated gets written out even when release fails.
    let mut browser = HttpBrowser::new(&config.user_agent)?;
    let session = driver.run(&mut browser, &ctx).await;
    let close_result = browser.close().await;

    let writer = SessionWriter::new(&args.out_dir);
    let path = writer.write(&session)?;
    info!(
        path = %path.display(),
        items = session.items.len(),
        fails = session.fails.len(),
        "session artifact written"
    );

    close_result?;
    Ok(())
}
