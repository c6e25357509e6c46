//! Second pass: write local paths into the document.

use super::scan::ASSET_SELECTOR;
use crate::capture::ResolvedAsset;
use dom_query::{Document, Selection};
use std::collections::HashMap;

/// Sets the originating attribute of every asset with a local path.
///
/// Must run after all mapping decisions for the document are final. Assets
/// without a local path are left exactly as found. Returns the number of
/// attributes written.
pub fn apply_rewrites(doc: &Document, assets: &[ResolvedAsset]) -> usize {
    let by_position: HashMap<usize, (&'static str, &str)> = assets
        .iter()
        .filter_map(|a| {
            a.local_path
                .as_deref()
                .map(|p| (a.reference.position, (a.reference.attribute, p)))
        })
        .collect();
    if by_position.is_empty() {
        return 0;
    }

    let mut written = 0;
    for (position, node) in doc.select(ASSET_SELECTOR).nodes().iter().enumerate() {
        if let Some((attribute, local)) = by_position.get(&position) {
            Selection::from(*node).set_attr(attribute, local);
            written += 1;
        }
    }

    if written != by_position.len() {
        tracing::warn!(
            expected = by_position.len(),
            written,
            "document changed between scan and rewrite"
        );
    }
    written
}
