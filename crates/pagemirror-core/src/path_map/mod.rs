//! Local path computation for in-scope assets.
//!
//! Maps an absolute asset URL to a relative path under the capture root that
//! mirrors where the asset lives on the origin server:
//!
//! - assets under the page's directory keep only the part below it,
//! - everything else keeps its full server path (leading `/` removed),
//! - an empty path gets a generated `assets/asset-<token>` name, and so does
//!   one that would land on the captured document itself (`index.html`),
//! - extensionless paths get a default extension for their kind.
//!
//! Queries and fragments are never part of the local path, so URLs that differ
//! only by query share one file (last write wins). Such collisions are logged.

mod directory;
mod extension;
mod token;

pub use directory::{base_directory, PrettyRoutes};
pub use extension::{default_extension, extension, has_extension};
pub use token::{RandomTokens, SequentialTokens, TokenSource};

use crate::document::AssetKind;
use crate::storage::INDEX_FILE;
use std::collections::HashMap;
use url::Url;

/// Directory for generated fallback names.
pub const FALLBACK_DIR: &str = "assets";
/// Stem of generated fallback names (`asset-<token>`).
pub const FALLBACK_STEM: &str = "asset";
/// File name used when an asset URL names a directory (`/static/`).
pub const DIRECTORY_INDEX: &str = "index";

/// Per-run path mapper. Memoizes by absolute URL so repeated references agree.
pub struct PathMapper<T: TokenSource = RandomTokens> {
    pretty: PrettyRoutes,
    tokens: T,
    by_url: HashMap<String, String>,
    owners: HashMap<String, String>,
}

impl PathMapper<RandomTokens> {
    pub fn new(pretty: PrettyRoutes) -> Self {
        Self::with_tokens(pretty, RandomTokens)
    }
}

impl<T: TokenSource> PathMapper<T> {
    pub fn with_tokens(pretty: PrettyRoutes, tokens: T) -> Self {
        Self {
            pretty,
            tokens,
            by_url: HashMap::new(),
            owners: HashMap::new(),
        }
    }

    /// Local relative path for `asset`, found on the page at `base`.
    ///
    /// `asset` must already be resolved (dot segments normalized). The result is
    /// never empty and is identical for every call with the same asset URL.
    pub fn map(&mut self, base: &Url, asset: &Url, kind: AssetKind) -> String {
        let key = asset.as_str().to_string();
        if let Some(path) = self.by_url.get(&key) {
            return path.clone();
        }

        let base_dir = base_directory(base.path(), self.pretty);
        let local = self.local_path(&base_dir, asset.path(), kind);

        match self.owners.get(&local) {
            Some(owner) if owner != &key => {
                tracing::warn!(
                    local = %local,
                    first = %owner,
                    second = %key,
                    "two asset URLs map to the same local path; last write wins"
                );
            }
            Some(_) => {}
            None => {
                self.owners.insert(local.clone(), key.clone());
            }
        }

        self.by_url.insert(key, local.clone());
        local
    }

    fn local_path(&mut self, base_dir: &str, asset_path: &str, kind: AssetKind) -> String {
        let stripped = asset_path
            .strip_prefix(base_dir)
            .unwrap_or(asset_path)
            .trim_start_matches('/');

        let mut local = if stripped.is_empty() {
            self.fallback_name()
        } else if stripped.ends_with('/') {
            format!("{}{}", stripped, DIRECTORY_INDEX)
        } else if stripped == INDEX_FILE {
            let renamed = format!("{}.html", self.fallback_name());
            tracing::warn!(
                asset = %asset_path,
                local = %renamed,
                "asset would overwrite the captured document; renamed"
            );
            renamed
        } else {
            stripped.to_string()
        };

        if !has_extension(&local) {
            if let Some(ext) = default_extension(kind) {
                local.push('.');
                local.push_str(ext);
            }
        }
        local
    }

    fn fallback_name(&mut self) -> String {
        format!("{}/{}-{}", FALLBACK_DIR, FALLBACK_STEM, self.tokens.next_token())
    }
}
