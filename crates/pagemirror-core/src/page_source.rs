//! Sources of rendered page markup.
//!
//! The capture engine only needs the final markup and the URL the page ended
//! up at. Loading it over HTTP follows redirects and reports the effective
//! URL; loading it from a file (markup saved out of a browser) takes the base
//! URL from the caller.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::MirrorConfig;
use crate::downloader::{self, FetchError};

/// Fully rendered markup plus the page's final navigated URL.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: String,
    pub final_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PageLoadError {
    #[error("load {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait PageSource {
    fn load(&self) -> Result<RenderedPage, PageLoadError>;
}

/// Fetches the page with a plain GET.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    url: String,
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: Option<String>,
}

impl HttpPageSource {
    pub fn new(url: impl Into<String>, cfg: &MirrorConfig) -> Self {
        Self {
            url: url.into(),
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.page_load_timeout(),
            user_agent: cfg.user_agent.clone(),
        }
    }
}

impl PageSource for HttpPageSource {
    fn load(&self) -> Result<RenderedPage, PageLoadError> {
        let (body, effective) = downloader::get(
            &self.url,
            self.connect_timeout,
            self.timeout,
            self.user_agent.as_deref(),
        )
        .map_err(|source| PageLoadError::Fetch {
            url: self.url.clone(),
            source,
        })?;
        let final_url = effective.unwrap_or_else(|| self.url.clone());
        if final_url != self.url {
            tracing::info!(from = %self.url, to = %final_url, "page redirected");
        }
        Ok(RenderedPage {
            html: String::from_utf8_lossy(&body).into_owned(),
            final_url,
        })
    }
}

/// Reads markup from disk and pairs it with an explicit base URL.
#[derive(Debug, Clone)]
pub struct FilePageSource {
    path: PathBuf,
    base_url: String,
}

impl FilePageSource {
    pub fn new(path: impl AsRef<Path>, base_url: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            base_url: base_url.into(),
        }
    }
}

impl PageSource for FilePageSource {
    fn load(&self) -> Result<RenderedPage, PageLoadError> {
        let bytes = std::fs::read(&self.path).map_err(|source| PageLoadError::Read {
            path: self.path.clone(),
            source,
        })?;
        Ok(RenderedPage {
            html: String::from_utf8_lossy(&bytes).into_owned(),
            final_url: self.base_url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_source_uses_given_base() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.html");
        std::fs::write(&path, "<p>hi</p>").unwrap();
        let page = FilePageSource::new(&path, "https://ex.com/blog/post").load().unwrap();
        assert_eq!(page.html, "<p>hi</p>");
        assert_eq!(page.final_url, "https://ex.com/blog/post");
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = FilePageSource::new("/nonexistent/pagemirror.html", "https://ex.com/")
            .load()
            .unwrap_err();
        assert!(matches!(err, PageLoadError::Read { .. }));
    }
}
