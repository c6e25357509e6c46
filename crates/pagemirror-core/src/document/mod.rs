//! Asset discovery and in-place rewriting of the captured document.
//!
//! Discovery and rewriting are two separate passes over the same selector:
//! every decision is made against an untouched tree, then all attribute
//! writes are applied at once. Rewrites only change attribute values, never
//! their presence, so the selector matches the same elements in both passes
//! and a reference's position identifies its element.

mod markers;
mod rewrite;
mod scan;

pub use markers::{strip_editor_markers, EDITOR_MARKER_ATTR, EDITOR_MARKER_ID};
pub use rewrite::apply_rewrites;
pub use scan::{scan_references, ASSET_SELECTOR};

pub use dom_query::Document;

use serde::Serialize;
use std::fmt;

/// What kind of element a reference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// `<img src>`
    Image,
    /// `<script src>`
    Script,
    /// `<link rel="stylesheet" href>`
    Stylesheet,
    /// `<link rel="icon" href>` and variants
    Icon,
    /// `src` of `<source>`, `<video>`, `<audio>`
    MediaSource,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssetKind::Image => "image",
            AssetKind::Script => "script",
            AssetKind::Stylesheet => "stylesheet",
            AssetKind::Icon => "icon",
            AssetKind::MediaSource => "media",
        };
        f.pad(s)
    }
}

/// One asset-bearing attribute found in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetReference {
    /// Ordinal of the element among all [`ASSET_SELECTOR`] matches.
    pub position: usize,
    pub kind: AssetKind,
    pub attribute: &'static str,
    pub raw: String,
}
