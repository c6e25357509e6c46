//! Fatal capture errors. Everything else is recorded per asset.

use crate::page_source::PageLoadError;
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("missing required input: {0}")]
    MissingInput(&'static str),
    #[error("page URL {url:?} is not an absolute URL: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("page failed to load: {0}")]
    PageLoad(#[from] PageLoadError),
    #[error("save document: {0}")]
    Storage(#[from] StorageError),
}
