//! URL handling for Site-Corpus
//!
//! This module canonicalizes discovered links and decides whether a candidate
//! URL belongs to the crawl's site. The canonical form used as the identity
//! key everywhere in the crate is an absolute URL with its fragment removed.

mod normalize;

pub use normalize::canonicalize;

use url::Url;

/// Tests whether two URLs belong to the same site
///
/// Two URLs are same-site iff their host components (including an explicit
/// port, if present) are equal. The scheme is ignored so that mixed
/// http/https link graphs on one logical site count as a single crawl scope.
///
/// # Examples
///
/// ```
/// use site_corpus::url::same_site;
/// use url::Url;
///
/// let root = Url::parse("https://example.com/a").unwrap();
/// let http = Url::parse("http://example.com/b").unwrap();
/// let other = Url::parse("https://other.com/c").unwrap();
/// assert!(same_site(&root, &http));
/// assert!(!same_site(&root, &other));
/// ```
pub fn same_site(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port() == b.port()
}

/// Checks whether a raw string is acceptable as a crawl root
///
/// A valid root parses to an absolute URL with both a scheme and a host.
/// This is used only for the initial user-supplied URL, before any relative
/// resolution is possible.
pub fn is_valid_root(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => url.host_str().is_some(),
        Err(_) => false,
    }
}
