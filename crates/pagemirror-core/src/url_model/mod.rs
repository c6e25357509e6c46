//! Reference resolution and scope decisions.
//!
//! Turns a raw attribute value into an absolute URL relative to the page it
//! was found on, and decides whether that URL belongs to the page's origin.

mod resolve;
mod scope;

pub use resolve::{resolve_reference, Resolution, ResolveError, NON_FETCHABLE_SCHEMES};
pub use scope::is_in_scope;

use std::fmt;

/// Why a reference was left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Attribute value was empty or whitespace only.
    Empty,
    /// Inline data, mail or phone reference (scheme without the colon).
    NonFetchableScheme(&'static str),
    /// Resolution against the base URL failed.
    Unparseable,
    /// Host differs from the page host (None when the URL has no host at all).
    OutOfScope(Option<String>),
    /// The computed local path would land outside the output directory.
    UnsafePath,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Empty => write!(f, "empty reference"),
            SkipReason::NonFetchableScheme(s) => write!(f, "non-fetchable scheme {}:", s),
            SkipReason::Unparseable => write!(f, "unparseable URL"),
            SkipReason::OutOfScope(Some(host)) => write!(f, "out of scope host {}", host),
            SkipReason::OutOfScope(None) => write!(f, "out of scope (no host)"),
            SkipReason::UnsafePath => write!(f, "local path escapes output directory"),
        }
    }
}
