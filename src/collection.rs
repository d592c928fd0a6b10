//! Content collection scanning.
//!
//! Walks the content directory, validates every page's front matter against
//! the [`schema`](crate::schema), and derives the sub-page lookup the browser
//! side consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── index.md               # Root page, href "/" (no section)
//! ├── docs/                  # Section "docs"
//! │   ├── index.md           # href "/docs/"
//! │   ├── 010-install.md     # href "/docs/install/", ordered by prefix
//! │   └── usage.md           # href "/docs/usage/"
//! └── 020-blog/              # Section "blog" (prefix stripped)
//!     └── hello.md
//! ```
//!
//! ## Ordering
//!
//! Within a section, entries sort by `nav_order`, then by filename prefix,
//! then by href. Pages without a `nav_order` or prefix sort after those with
//! one. Pages with `show_in_nav = false` are validated but left out of the
//! lookup.

use crate::paths::{self, split_stem};
use crate::schema::{self, FrontMatter, SchemaError};
use crate::subpages::{IconMap, RawEntry, SectionMap, SubpageEntry, Subpages};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Content directory not found: {0}")]
    MissingRoot(PathBuf),
    #[error("Invalid page {path}: {source}")]
    Page {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },
    #[error("Pages {0} and {1} both resolve to {2}")]
    DuplicateHref(PathBuf, PathBuf, String),
}

/// A validated page and where it lives on the site.
#[derive(Debug, Clone)]
pub struct ContentEntry {
    /// Source path relative to the content root.
    pub source: PathBuf,
    /// Section key (first directory, prefix stripped). Empty for root pages.
    pub section: String,
    /// Site path with trailing slash, e.g. `/docs/install/`.
    pub href: String,
    /// Filename prefix order, if any.
    pub file_order: Option<u32>,
    pub front: FrontMatter,
}

impl ContentEntry {
    pub fn to_subpage(&self) -> SubpageEntry {
        SubpageEntry {
            href: self.href.clone(),
            label: self.front.label().to_string(),
            icon: self.front.icon.clone(),
        }
    }
}

/// All pages of the content directory.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub entries: Vec<ContentEntry>,
}

impl Collection {
    /// Visible entries grouped by section, in navigation order. Root pages
    /// and sections with no visible pages are omitted.
    pub fn sections(&self) -> BTreeMap<&str, Vec<&ContentEntry>> {
        let mut sections: BTreeMap<&str, Vec<&ContentEntry>> = BTreeMap::new();
        for entry in &self.entries {
            if entry.section.is_empty() || !entry.front.show_in_nav {
                continue;
            }
            sections.entry(entry.section.as_str()).or_default().push(entry);
        }
        for list in sections.values_mut() {
            list.sort_by(|a, b| nav_cmp(a, b));
        }
        sections
    }

    /// The `__SUBPAGES__` and `__SUBPAGE_ICONS__` lookups for this collection.
    ///
    /// A segment enters the icon lookup only when every listed page ending in
    /// it declares the same icon, so a page without an icon never borrows one
    /// from a namesake in another section.
    pub fn subpages(&self) -> Subpages {
        let mut lookup = SectionMap::new();
        let mut candidates: BTreeMap<&str, Option<&str>> = BTreeMap::new();
        for (section, entries) in self.sections() {
            let list = entries
                .iter()
                .map(|e| {
                    if let Some(segment) = paths::last_segment(&e.href) {
                        let icon = e.front.icon.as_deref();
                        candidates
                            .entry(segment)
                            .and_modify(|seen| {
                                if *seen != icon {
                                    *seen = None;
                                }
                            })
                            .or_insert(icon);
                    }
                    RawEntry::from(e.to_subpage())
                })
                .collect();
            lookup.insert(section.to_string(), list);
        }
        let icons: IconMap = candidates
            .into_iter()
            .filter_map(|(segment, icon)| Some((segment.to_string(), icon?.to_string())))
            .collect();
        Subpages::new(lookup, icons)
    }

    pub fn find(&self, href: &str) -> Option<&ContentEntry> {
        self.entries.iter().find(|e| paths::same_page(&e.href, href))
    }
}

fn nav_cmp(a: &ContentEntry, b: &ContentEntry) -> Ordering {
    fn last_if_none<T>(a: Option<T>, b: Option<T>, cmp: impl FnOnce(T, T) -> Ordering) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => cmp(a, b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    last_if_none(a.front.nav_order, b.front.nav_order, |x, y| x.total_cmp(&y))
        .then_with(|| last_if_none(a.file_order, b.file_order, |x, y| x.cmp(&y)))
        .then_with(|| a.href.cmp(&b.href))
}

/// Scan and validate every `.md` page under `root`.
pub fn load_collection(root: &Path) -> Result<Collection, CollectionError> {
    if !root.is_dir() {
        return Err(CollectionError::MissingRoot(root.to_path_buf()));
    }

    let mut entries: Vec<ContentEntry> = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for dir_entry in walker {
        let dir_entry = dir_entry?;
        if !dir_entry.file_type().is_file() || !is_markdown(dir_entry.path()) {
            continue;
        }
        let relative = dir_entry
            .path()
            .strip_prefix(root)
            .unwrap_or(dir_entry.path())
            .to_path_buf();

        let source = fs::read_to_string(dir_entry.path())?;
        let front = schema::parse_page(&source).map_err(|source| CollectionError::Page {
            path: relative.clone(),
            source,
        })?;
        let entry = build_entry(relative, front);

        if let Some(existing) = entries.iter().find(|e| e.href == entry.href) {
            return Err(CollectionError::DuplicateHref(
                existing.source.clone(),
                entry.source,
                entry.href,
            ));
        }
        log::debug!("page {} → {}", entry.source.display(), entry.href);
        entries.push(entry);
    }

    Ok(Collection { entries })
}

fn build_entry(relative: PathBuf, front: FrontMatter) -> ContentEntry {
    let mut segments: Vec<String> = relative
        .parent()
        .into_iter()
        .flat_map(|p| p.components())
        .map(|c| split_stem(&c.as_os_str().to_string_lossy()).slug)
        .collect();

    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let file = split_stem(&stem);
    if file.slug != "index" {
        segments.push(file.slug);
    }

    let href = if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    };
    let section = if relative.components().count() > 1 {
        segments.first().cloned().unwrap_or_default()
    } else {
        String::new()
    };

    ContentEntry {
        source: relative,
        section,
        href,
        file_order: file.order,
        front,
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}
