//! Removal of editor overlay artifacts.

use dom_query::Document;

/// Id of the overlay element injected by the in-page editor.
pub const EDITOR_MARKER_ID: &str = "pagemirror-editor";
/// Attribute carried by every other element the editor injects.
pub const EDITOR_MARKER_ATTR: &str = "data-pagemirror-editor";

/// Removes editor-injected elements. Returns how many were removed.
pub fn strip_editor_markers(doc: &Document) -> usize {
    let selector = format!("#{}, [{}]", EDITOR_MARKER_ID, EDITOR_MARKER_ATTR);
    let found = doc.select(&selector);
    let count = found.length();
    if count > 0 {
        found.remove();
        tracing::debug!(count, "removed editor markers");
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_marker_elements() {
        let doc = Document::from(
            r#"<body><p>keep</p><div id="pagemirror-editor"><button>save</button></div><style data-pagemirror-editor>.x{}</style></body>"#,
        );
        assert_eq!(strip_editor_markers(&doc), 2);
        let html = doc.html().to_string();
        assert!(html.contains("keep"));
        assert!(!html.contains("pagemirror-editor"));
        assert!(!html.contains("save"));
    }

    #[test]
    fn no_markers_is_noop() {
        let doc = Document::from("<p>plain</p>");
        assert_eq!(strip_editor_markers(&doc), 0);
        assert!(doc.html().contains("plain"));
    }
}
