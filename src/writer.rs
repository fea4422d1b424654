//! Session artifact persistence

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ScrapeError;
use crate::record::ScrapeSession;

/// Writes one JSON document per run, filename keyed by session id.
///
/// A partial session is written exactly like a complete one; downstream
/// ingestion reads the `fails` list to judge how much of the category the run
/// actually covered.
pub struct SessionWriter {
    out_dir: PathBuf,
}

impl SessionWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Persist the session; returns the path written.
    pub fn write(&self, session: &ScrapeSession) -> Result<PathBuf, ScrapeError> {
        fs::create_dir_all(&self.out_dir).map_err(|source| ScrapeError::SessionWrite {
            path: self.out_dir.display().to_string(),
            source,
        })?;

        let filename = format!(
            "{}_products_{}.json",
            site_slug(&session.site),
            session.session_id
        );
        let path = self.out_dir.join(filename);

        let json =
            serde_json::to_string_pretty(session).map_err(|source| ScrapeError::SessionWrite {
                path: path.display().to_string(),
                source: source.into(),
            })?;
        fs::write(&path, json).map_err(|source| ScrapeError::SessionWrite {
            path: path.display().to_string(),
            source,
        })?;

        info!(path = %path.display(), items = session.items.len(), "session written");
        Ok(path)
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

/// Filename-safe site token: "Fora.ua" becomes "fora".
fn site_slug(site: &str) -> String {
    let head: String = site
        .chars()
        .take_while(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if head.is_empty() {
        "site".to_string()
    } else {
        head
    }
}
