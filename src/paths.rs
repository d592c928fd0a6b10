//! Path and filename helpers shared by the collection scanner and the
//! sub-sidebar.
//!
//! ## Normalization
//!
//! Site paths compare equal regardless of trailing slashes: `/docs/b/` and
//! `/docs/b` are the same page. The root path stays `/`.
//!
//! ## Ordered Filenames
//!
//! Page files may carry an optional numeric prefix (`NNN-`) that orders them
//! within their section. The prefix never reaches the URL:
//! - `010-install.md` → order 10, slug `install`
//! - `usage.md` → no order, slug `usage`

/// Strip trailing slashes from a site path. An all-slash or empty path
/// becomes `/`.
pub fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// Whether two site paths refer to the same page.
pub fn same_page(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Last non-empty segment of a site path (`/docs/install/` → `install`).
pub fn last_segment(path: &str) -> Option<&str> {
    path.split('/').filter(|s| !s.is_empty()).next_back()
}

/// A page file stem split into its ordering prefix and slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedStem {
    /// Number prefix if present (`10` from `010-install`).
    pub order: Option<u32>,
    /// Slug after the prefix. For unprefixed stems this is the full stem.
    pub slug: String,
}

/// Split a file stem following the optional `NNN-slug` convention.
///
/// A number-only stem (`"010"`) keeps the number as its slug so the page
/// still gets a usable URL.
pub fn split_stem(stem: &str) -> OrderedStem {
    if let Some((prefix, rest)) = stem.split_once('-')
        && let Ok(order) = prefix.parse::<u32>()
        && !rest.is_empty()
    {
        return OrderedStem {
            order: Some(order),
            slug: rest.to_string(),
        };
    }
    OrderedStem {
        order: stem.parse().ok(),
        slug: stem.to_string(),
    }
}
