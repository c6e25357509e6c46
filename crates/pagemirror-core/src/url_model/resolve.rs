//! Resolve raw attribute values against the page URL.

use super::SkipReason;
use url::Url;

/// Scheme prefixes that never name a downloadable resource.
pub const NON_FETCHABLE_SCHEMES: [&str; 3] = ["data", "mailto", "tel"];

/// Outcome of resolving one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Url),
    Skip(SkipReason),
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("cannot resolve {raw:?} against page URL: {source}")]
    Unparseable {
        raw: String,
        #[source]
        source: url::ParseError,
    },
}

/// Resolves `raw` (absolute, relative or protocol-relative) against `base`.
///
/// Empty values and `data:`, `mailto:`, `tel:` references are skipped before
/// any parsing happens. Dot segments are normalized by the URL parser, so the
/// returned path never contains `.` or `..` segments. Query and fragment are
/// kept on the absolute URL.
pub fn resolve_reference(raw: &str, base: &Url) -> Result<Resolution, ResolveError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Resolution::Skip(SkipReason::Empty));
    }

    if let Some(scheme) = non_fetchable_scheme(raw) {
        return Ok(Resolution::Skip(SkipReason::NonFetchableScheme(scheme)));
    }

    base.join(raw)
        .map(Resolution::Resolved)
        .map_err(|source| ResolveError::Unparseable {
            raw: raw.to_string(),
            source,
        })
}

fn non_fetchable_scheme(raw: &str) -> Option<&'static str> {
    let (scheme, _) = raw.split_once(':')?;
    NON_FETCHABLE_SCHEMES
        .iter()
        .copied()
        .find(|s| scheme.trim().eq_ignore_ascii_case(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://ex.com/blog/post").unwrap()
    }

    fn resolved(raw: &str) -> String {
        match resolve_reference(raw, &base()).unwrap() {
            Resolution::Resolved(u) => u.to_string(),
            Resolution::Skip(r) => panic!("unexpected skip: {}", r),
        }
    }

    #[test]
    fn relative_resolves_next_to_page() {
        assert_eq!(resolved("img.png"), "https://ex.com/blog/img.png");
    }

    #[test]
    fn root_relative_and_protocol_relative() {
        assert_eq!(resolved("/static/app.js"), "https://ex.com/static/app.js");
        assert_eq!(resolved("//cdn.other.com/lib.js"), "https://cdn.other.com/lib.js");
    }

    #[test]
    fn dot_segments_are_normalized() {
        assert_eq!(resolved("../css/./site.css"), "https://ex.com/css/site.css");
        assert_eq!(resolved("../../../../x.png"), "https://ex.com/x.png");
    }

    #[test]
    fn query_and_fragment_kept() {
        assert_eq!(resolved("a.css?v=2#top"), "https://ex.com/blog/a.css?v=2#top");
    }

    #[test]
    fn non_fetchable_schemes_skip() {
        for raw in ["data:image/png;base64,AAAA", "mailto:a@b.com", "tel:+123", "MAILTO:x@y.z"] {
            assert!(
                matches!(
                    resolve_reference(raw, &base()).unwrap(),
                    Resolution::Skip(SkipReason::NonFetchableScheme(_))
                ),
                "{} should be skipped",
                raw
            );
        }
    }

    #[test]
    fn empty_skips() {
        assert_eq!(
            resolve_reference("   ", &base()).unwrap(),
            Resolution::Skip(SkipReason::Empty)
        );
    }

    #[test]
    fn unparseable_is_an_error() {
        let err = resolve_reference("http://[::1", &base()).unwrap_err();
        assert!(matches!(err, ResolveError::Unparseable { .. }));
    }
}
