//! URL handling module for Film-Scraper
//!
//! Builds numbered listing-page URLs and qualifies the relative paths found
//! in listing markup against the site root.

use crate::config::SiteConfig;
use url::Url;

/// Builds the URL of a numbered listing page
///
/// The layout is `{base-url}/{listing-path}/{page}/`, with redundant slashes
/// on either side of the configured values removed.
///
/// # Examples
///
/// ```
/// use film_scraper::config::SiteConfig;
/// use film_scraper::url::listing_page_url;
///
/// let site = SiteConfig::default();
/// assert_eq!(
///     listing_page_url(&site, 7),
///     "https://www.cpasmieux.ad/filmstreaming/7/"
/// );
/// ```
pub fn listing_page_url(site: &SiteConfig, page: u32) -> String {
    format!(
        "{}/{}/{}/",
        site.base_url.trim_end_matches('/'),
        site.listing_path.trim_matches('/'),
        page
    )
}

/// Derives the site root (scheme, host and port) from the configured base URL
pub fn site_root(base_url: &str) -> Result<Url, url::ParseError> {
    let mut root = Url::parse(base_url)?;
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    Ok(root)
}

/// Qualifies a path extracted from markup against the site root
///
/// Returns `Ok(None)` for an absent or blank value so callers can fall back
/// to an empty string. Already absolute URLs are returned unchanged.
pub fn absolutize(root: &Url, href: Option<&str>) -> Result<Option<String>, url::ParseError> {
    let href = match href.map(str::trim) {
        Some(href) if !href.is_empty() => href,
        _ => return Ok(None),
    };

    let absolute = root.join(href)?;
    Ok(Some(absolute.to_string()))
}
