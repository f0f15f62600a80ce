//! URL helpers for cache keys and fetch targets.

use url::{Position, Url};

use crate::error::PrefetchResult;

/// Suffix appended to the fetch URL of a static prefetch.
pub const STATIC_SUFFIX: &str = "__static__";

/// Resolves `href` against the application origin.
///
/// Absolute hrefs are returned as-is; relative ones are joined to `origin`.
pub fn to_absolute_url(origin: &Url, href: &str) -> PrefetchResult<Url> {
    Ok(origin.join(href)?)
}

/// Returns `url` without its fragment.
pub fn strip_hash(url: &Url) -> Url {
    let mut stripped = url.clone();
    stripped.set_fragment(None);
    stripped
}

/// Host-relative form of `url`: path, query and fragment.
pub fn cache_key(url: &Url) -> String {
    url[Position::BeforePath..].to_string()
}

/// Fragment of `url`, treating an empty `#` as no fragment.
pub fn fragment(url: &Url) -> Option<&str> {
    url.fragment().filter(|f| !f.is_empty())
}

/// URL to fetch for `url`: hash stripped, plus the static marker when asked.
pub fn fetch_url(url: &Url, is_static: bool) -> PrefetchResult<Url> {
    let stripped = strip_hash(url);
    if !is_static {
        return Ok(stripped);
    }
    Ok(Url::parse(&format!("{}{}", stripped, STATIC_SUFFIX))?)
}
