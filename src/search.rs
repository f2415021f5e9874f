use tracing::debug;

use crate::models::Link;

/// Links whose title, description or category contain `term`, ignoring case.
/// An empty term keeps everything. Order follows `links`.
pub fn filter<'a>(links: &'a [Link], term: &str) -> Vec<&'a Link> {
    let needle = term.to_lowercase();
    let found: Vec<&Link> = links.iter().filter(|link| matches(link, &needle)).collect();
    debug!("Search {term:?} matched {} of {} links", found.len(), links.len());
    found
}

/// `needle` must already be lowercase.
fn matches(link: &Link, needle: &str) -> bool {
    [&link.title, &link.description, &link.category]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}
