//! Static asset discovery.
//!
//! Optionally mimics a browser by scanning each page load for embedded
//! resources and fetching the ones served by the application itself.
//! Extraction is best-effort: malformed markup yields whatever can be
//! recovered, never an error. Disabled by default since it multiplies
//! request volume.

use crate::client::MenuClient;
use scraper::{Html, Selector};
use tracing::debug;

/// Path prefix for collected static files.
pub const STATIC_PREFIX: &str = "/static/";
/// Path prefix for user-uploaded media.
pub const MEDIA_PREFIX: &str = "/media/";

/// Extract the `src` attribute of every element in the document, in
/// document order. Never fails; unparseable input yields an empty list.
#[must_use]
pub fn extract_resource_urls(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("[src]") else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("src"))
        .map(str::to_string)
        .collect()
}

/// Fetch every embedded resource under a recognized prefix.
///
/// `/static/...` and `/media/...` URLs are requested and reported under
/// one normalized name per prefix; anything else is ignored. Individual
/// fetch failures are recorded by the client and otherwise swallowed.
pub async fn discover_and_fetch(client: &MenuClient, html: &str) {
    for url in extract_resource_urls(html) {
        let name = if url.starts_with(STATIC_PREFIX) {
            "/static/..."
        } else if url.starts_with(MEDIA_PREFIX) {
            "/media/..."
        } else {
            continue;
        };
        if let Err(e) = client.get(&url, name).await {
            debug!(url = %url, error = %e, "asset fetch failed");
        }
    }
}
