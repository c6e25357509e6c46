//! Same-origin host check.

use url::Url;

/// True when `url` and `base` both have a host and the hosts are identical.
///
/// Scheme and port are not compared. Subdomains never match their parent.
pub fn is_in_scope(url: &Url, base: &Url) -> bool {
    match (url.host_str(), base.host_str()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
