//! Canonical URL mapping for collected pages.

/// Map a page slug to its canonical URL under `origin`.
///
/// A trailing `index_marker` segment is dropped, so `guides/index` maps to
/// `<origin>/guides` and the root `index` maps to the bare origin.
/// `origin` is expected without a trailing slash.
pub fn page_url(origin: &str, slug: &str, index_marker: &str) -> String {
    let path = canonical_path(slug, index_marker);
    if path.is_empty() {
        origin.to_string()
    } else {
        format!("{origin}/{path}")
    }
}

/// The URL path for `slug`, empty for the site root.
fn canonical_path<'a>(slug: &'a str, index_marker: &str) -> &'a str {
    if slug == index_marker {
        return "";
    }

    slug.strip_suffix(index_marker)
        .and_then(|rest| rest.strip_suffix('/'))
        .unwrap_or(slug)
}
