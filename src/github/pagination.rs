//! Link-header pagination over listing endpoints.
//!
//! Listing endpoints return the first page together with a `Link` header
//! naming the last page. The walker requests pages `2..=last` by rewriting the
//! `page` query parameter of the last-page link and concatenates the items in
//! page order. A missing header means the first page was already complete.
//!
//! Walking is best effort: a malformed link or a failed request stops the walk
//! and the items gathered so far are returned.

use http::Uri;
use octocrab::{Octocrab, Page};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::MigrationError;

/// Builds the URI for `page` from the last-page link of a listing response.
///
/// All other query parameters are preserved in their original order.
///
/// # Errors
///
/// Returns [`MigrationError::InvalidUrl`] when the link is not an absolute URL
/// or the rewritten URL is not a valid URI.
pub fn page_uri(template: &Uri, page: u32) -> Result<Uri, MigrationError> {
    let mut url = Url::parse(&template.to_string())
        .map_err(|error| MigrationError::InvalidUrl(format!("{template}: {error}")))?;

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("page", &page.to_string());

    url.as_str()
        .parse::<Uri>()
        .map_err(|error| MigrationError::InvalidUrl(format!("{url}: {error}")))
}

/// Collects every item of a paginated listing, starting from its first page.
///
/// Pages after the first are fetched one at a time in order. Any failure
/// while walking is logged and ends the walk early with the partial result.
pub async fn walk_pages<T>(client: &Octocrab, mut first: Page<T>, operation: &str) -> Vec<T>
where
    T: DeserializeOwned,
{
    let mut items = first.take_items();

    let Some(last_link) = first.last.clone() else {
        return items;
    };
    let Some(last_page) = first.number_of_pages() else {
        tracing::warn!(operation, link = %last_link, "last-page link has no page marker");
        return items;
    };

    for page in 2..=last_page {
        let uri = match page_uri(&last_link, page) {
            Ok(uri) => uri,
            Err(error) => {
                tracing::warn!(operation, page, "stopping pagination: {error}");
                break;
            }
        };

        match client.get_page::<T>(&Some(uri)).await {
            Ok(Some(mut next)) => items.append(&mut next.take_items()),
            Ok(None) => break,
            Err(error) => {
                tracing::warn!(operation, page, "stopping pagination: {error}");
                break;
            }
        }
    }

    items
}
