//! Resolve, filter and map every reference before anything is mutated.

use url::Url;

use crate::document::AssetReference;
use crate::path_map::{PathMapper, TokenSource};
use crate::storage;
use crate::url_model::{is_in_scope, resolve_reference, Resolution, SkipReason};

/// Decision for one reference. `local_path` is set iff `skip` is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub reference: AssetReference,
    pub absolute_url: Option<Url>,
    pub in_scope: bool,
    pub local_path: Option<String>,
    pub skip: Option<SkipReason>,
}

impl ResolvedAsset {
    fn skipped(reference: AssetReference, absolute_url: Option<Url>, reason: SkipReason) -> Self {
        Self {
            reference,
            absolute_url,
            in_scope: false,
            local_path: None,
            skip: Some(reason),
        }
    }

    pub fn is_localized(&self) -> bool {
        self.local_path.is_some()
    }
}

/// Turns references into decisions, in reference order.
pub fn resolve_assets<T: TokenSource>(
    references: Vec<AssetReference>,
    base: &Url,
    mapper: &mut PathMapper<T>,
) -> Vec<ResolvedAsset> {
    references
        .into_iter()
        .map(|reference| resolve_one(reference, base, mapper))
        .collect()
}

fn resolve_one<T: TokenSource>(
    reference: AssetReference,
    base: &Url,
    mapper: &mut PathMapper<T>,
) -> ResolvedAsset {
    let url = match resolve_reference(&reference.raw, base) {
        Ok(Resolution::Resolved(url)) => url,
        Ok(Resolution::Skip(reason)) => {
            tracing::debug!(raw = %reference.raw, "skip: {}", reason);
            return ResolvedAsset::skipped(reference, None, reason);
        }
        Err(e) => {
            tracing::warn!("skip: {}", e);
            return ResolvedAsset::skipped(reference, None, SkipReason::Unparseable);
        }
    };

    if !is_in_scope(&url, base) {
        let reason = SkipReason::OutOfScope(url.host_str().map(str::to_string));
        tracing::debug!(url = %url, "skip: {}", reason);
        return ResolvedAsset::skipped(reference, Some(url), reason);
    }

    let local = mapper.map(base, &url, reference.kind);
    if let Err(e) = storage::check_contained(&local) {
        tracing::warn!(url = %url, "skip: {}", e);
        return ResolvedAsset::skipped(reference, Some(url), SkipReason::UnsafePath);
    }

    tracing::debug!(url = %url, local = %local, kind = %reference.kind, "mapped asset");
    ResolvedAsset {
        reference,
        absolute_url: Some(url),
        in_scope: true,
        local_path: Some(local),
        skip: None,
    }
}
