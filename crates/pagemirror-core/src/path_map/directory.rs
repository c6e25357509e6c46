//! Base directory of the captured page.

use serde::{Deserialize, Serialize};

use super::extension::has_extension;

/// How an extensionless page path (`/blog/post`) becomes a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrettyRoutes {
    /// Use the parent directory, the same anchor relative references resolve against.
    #[default]
    Parent,
    /// Treat the page path itself as a directory (`/blog/post/`).
    Directory,
}

/// Directory path (always ending in `/`) that assets are made relative to.
pub fn base_directory(page_path: &str, pretty: PrettyRoutes) -> String {
    if page_path.is_empty() {
        return "/".to_string();
    }
    if page_path.ends_with('/') {
        return page_path.to_string();
    }
    if !has_extension(page_path) && pretty == PrettyRoutes::Directory {
        return format!("{}/", page_path);
    }
    match page_path.rfind('/') {
        Some(i) => page_path[..=i].to_string(),
        None => "/".to_string(),
    }
}
