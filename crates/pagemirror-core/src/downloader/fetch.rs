//! Byte fetching over HTTP.

use std::time::Duration;

use crate::config::MirrorConfig;

/// Error from a single GET (curl failure or non-2xx status).
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{0}")]
    Curl(#[from] curl::Error),
    #[error("HTTP {0}")]
    Http(u32),
}

/// Capability to fetch the body of a URL. Implementations block; the
/// coordinator calls them from the blocking pool.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// libcurl-backed fetcher. Follows redirects; one easy handle per call.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: Option<String>,
}

impl CurlFetcher {
    pub fn new(connect_timeout: Duration, timeout: Duration, user_agent: Option<String>) -> Self {
        Self {
            connect_timeout,
            timeout,
            user_agent,
        }
    }

    pub fn from_config(cfg: &MirrorConfig) -> Self {
        Self::new(cfg.connect_timeout(), cfg.transfer_timeout(), cfg.user_agent.clone())
    }
}

impl Default for CurlFetcher {
    fn default() -> Self {
        Self::from_config(&MirrorConfig::default())
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        get(url, self.connect_timeout, self.timeout, self.user_agent.as_deref())
            .map(|(body, _)| body)
    }
}

/// GET `url`, returning the body and the effective URL after redirects.
pub(crate) fn get(
    url: &str,
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: Option<&str>,
) -> Result<(Vec<u8>, Option<String>), FetchError> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.connect_timeout(connect_timeout)?;
    easy.timeout(timeout)?;
    if let Some(ua) = user_agent {
        easy.useragent(ua)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }

    let effective = easy.effective_url()?.map(str::to_string);
    Ok((body, effective))
}
