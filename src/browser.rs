//! Browsing collaborator abstraction and the HTTP-backed implementation

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::ScrapeError;

/// The capability set the engine needs from a browsing backend.
///
/// Any backend that can load a page, report whether a selector is present,
/// and hand back a document snapshot will do: a plain HTTP fetcher for
/// server-rendered sites, or a full rendering engine for script-heavy ones.
/// The extraction logic itself never touches this trait; it runs over the
/// returned snapshot.
#[async_trait]
pub trait Browser: Send {
    /// Navigate to `url` and wait for document readiness, bounded by
    /// `timeout`.
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<(), ScrapeError>;

    /// Wait up to `timeout` for `selector` to be present in the current
    /// document.
    ///
    /// `Ok(false)` means the wait elapsed without a match; that is not an
    /// error.
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool, ScrapeError>;

    /// Snapshot of the current document's HTML.
    async fn document(&mut self) -> Result<String, ScrapeError>;

    /// Release the browsing session. Called exactly once per run.
    async fn close(&mut self) -> Result<(), ScrapeError>;
}

/// `Browser` over plain HTTP.
///
/// A fetched document is complete by the time the body has been read, so
/// readiness coincides with the fetch and selector presence is evaluated
/// immediately against the held snapshot. The probe/grace protocol of the
/// page scraper still applies unchanged when a rendering backend is
/// substituted.
pub struct HttpBrowser {
    client: reqwest::Client,
    current: Option<String>,
}

impl HttpBrowser {
    pub fn new(user_agent: &str) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| ScrapeError::Backend(e.to_string()))?;
        Ok(Self {
            client,
            current: None,
        })
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<(), ScrapeError> {
        self.current = None;

        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ScrapeError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let body = response.text().await.map_err(|e| ScrapeError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        self.current = Some(body);
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<bool, ScrapeError> {
        let Some(html) = &self.current else {
            return Ok(false);
        };
        let Ok(parsed) = scraper::Selector::parse(selector) else {
            return Ok(false);
        };
        let document = scraper::Html::parse_document(html);
        Ok(document.select(&parsed).next().is_some())
    }

    async fn document(&mut self) -> Result<String, ScrapeError> {
        self.current.clone().ok_or(ScrapeError::MissingDocument)
    }

    async fn close(&mut self) -> Result<(), ScrapeError> {
        self.current = None;
        Ok(())
    }
}
