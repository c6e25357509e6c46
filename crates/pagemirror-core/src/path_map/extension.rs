//! Extension detection and per-kind defaults.

use crate::document::AssetKind;

/// Extension of the last path segment, if it has one.
///
/// A leading dot (`.htaccess`) or trailing dot (`name.`) does not count.
pub fn extension(path: &str) -> Option<&str> {
    let segment = path.rsplit('/').next().unwrap_or("");
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

pub fn has_extension(path: &str) -> bool {
    extension(path).is_some()
}

/// Extension forced onto extensionless paths of this kind.
pub fn default_extension(kind: AssetKind) -> Option<&'static str> {
    match kind {
        AssetKind::Image => Some("png"),
        AssetKind::Script => Some("js"),
        AssetKind::Stylesheet | AssetKind::Icon => Some("css"),
        AssetKind::MediaSource => None,
    }
}
