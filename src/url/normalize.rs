use crate::UrlError;
use url::Url;

/// Canonicalizes a raw URL string into the crate's identity form
///
/// # Canonicalization Steps
///
/// 1. Resolve `raw` against `base` when a base is given (relative hrefs),
///    otherwise parse it as an absolute URL
/// 2. Strip the fragment, so URLs differing only by `#anchor` collapse to
///    one entity
/// 3. Reject the result if it carries no host (mailto:, javascript:, data:
///    and friends all fail here)
///
/// The scheme is deliberately left untouched: http and https versions of a
/// page are distinct entities, even though they share a crawl scope (see
/// [`same_site`](crate::url::same_site)).
///
/// # Arguments
///
/// * `raw` - The raw URL or href to canonicalize
/// * `base` - The page the href was found on, for relative resolution
///
/// # Returns
///
/// * `Ok(Url)` - The canonical URL
/// * `Err(UrlError)` - The input does not resolve to an absolute URL with a host
///
/// # Examples
///
/// ```
/// use site_corpus::url::canonicalize;
/// use url::Url;
///
/// let base = Url::parse("https://a.test/docs/intro").unwrap();
/// let url = canonicalize("../x#top", Some(&base)).unwrap();
/// assert_eq!(url.as_str(), "https://a.test/x");
/// ```
pub fn canonicalize(raw: &str, base: Option<&Url>) -> Result<Url, UrlError> {
    let mut url = match base {
        Some(base) => base.join(raw),
        None => Url::parse(raw),
    }
    .map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    url.set_fragment(None);

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(url.to_string()));
    }

    Ok(url)
}
