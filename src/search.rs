//! Substring search over an already-fetched blog list.

use crate::i18n::Locale;
use crate::model::BlogPostSummary;

/// Posts whose title or country contains `query`, ignoring case.
///
/// Returns `None` for an empty query, an unknown locale or no matches, so
/// callers only ever see a non-empty result list.
pub fn search_blog_posts(
    posts: &[BlogPostSummary],
    query: &str,
    locale: Option<Locale>,
) -> Option<Vec<BlogPostSummary>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() || locale.is_none() {
        return None;
    }

    let matches: Vec<BlogPostSummary> = posts
        .iter()
        .filter(|post| {
            post.title.to_lowercase().contains(&needle)
                || post
                    .country
                    .as_deref()
                    .is_some_and(|country| country.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();

    (!matches.is_empty()).then_some(matches)
}
