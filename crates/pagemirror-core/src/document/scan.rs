//! First pass: collect asset references in document order.

use super::{AssetKind, AssetReference};
use dom_query::{Document, Selection};

/// Every element that may carry an asset reference.
///
/// `link` is matched broadly and filtered by `rel` afterwards so that positions
/// stay aligned between the scan and the rewrite pass.
pub const ASSET_SELECTOR: &str = "img[src], script[src], link[href], source[src], video[src], audio[src]";

/// Collects asset references. Elements that match the selector but are not
/// assets (e.g. `<link rel="canonical">`) still consume a position.
pub fn scan_references(doc: &Document) -> Vec<AssetReference> {
    let mut refs = Vec::new();
    for (position, node) in doc.select(ASSET_SELECTOR).nodes().iter().enumerate() {
        let sel = Selection::from(*node);
        let Some(tag) = node.node_name() else {
            continue;
        };
        let tag = tag.to_string().to_ascii_lowercase();
        let Some((kind, attribute)) = classify(&tag, &sel) else {
            continue;
        };
        let Some(raw) = sel.attr(attribute) else {
            continue;
        };
        refs.push(AssetReference {
            position,
            kind,
            attribute,
            raw: raw.to_string(),
        });
    }
    tracing::debug!(count = refs.len(), "scanned asset references");
    refs
}

/// Kind and attribute name for an element, or None if it is not an asset.
pub(super) fn classify(tag: &str, sel: &Selection) -> Option<(AssetKind, &'static str)> {
    match tag {
        "img" => Some((AssetKind::Image, "src")),
        "script" => Some((AssetKind::Script, "src")),
        "source" | "video" | "audio" => Some((AssetKind::MediaSource, "src")),
        "link" => {
            let rel = sel.attr("rel")?.to_string().to_ascii_lowercase();
            let tokens: Vec<&str> = rel.split_ascii_whitespace().collect();
            if tokens.contains(&"stylesheet") {
                Some((AssetKind::Stylesheet, "href"))
            } else if tokens.iter().any(|t| t.contains("icon")) {
                Some((AssetKind::Icon, "href"))
            } else {
                None
            }
        }
        _ => None,
    }
}
