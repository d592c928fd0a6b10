//! Sub-sidebar entries: the global lookup the host page provides, entry
//! resolution, active-page matching, and the rendered link list.
//!
//! ## Lookup Shapes
//!
//! The host page exposes `window.__SUBPAGES__`, mapping a section key to an
//! ordered list. Each item is either a bare path or a record:
//!
//! ```json
//! {
//!   "docs": ["/docs/a", "/docs/b"],
//!   "guides": [{ "href": "/guides/setup/", "label": "Setup", "icon": "wrench" }]
//! }
//! ```
//!
//! An optional `window.__SUBPAGE_ICONS__` maps a path segment (`"setup"`) to
//! an icon, used when an item does not carry its own.
//!
//! Bare paths are labelled with their last segment, or the configured default
//! label (`"Overview"`) when the path has none.

use crate::paths;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const DEFAULT_LABEL: &str = "Overview";

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("invalid sub-page lookup: {0}")]
    Json(#[from] serde_json::Error),
}

/// A resolved sub-sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubpageEntry {
    pub href: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// One item of a lookup list, as the host page supplies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEntry {
    Path(String),
    Record {
        href: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
    },
}

impl RawEntry {
    pub fn href(&self) -> &str {
        match self {
            RawEntry::Path(href) | RawEntry::Record { href, .. } => href,
        }
    }
}

impl From<SubpageEntry> for RawEntry {
    fn from(entry: SubpageEntry) -> Self {
        RawEntry::Record {
            href: entry.href,
            label: Some(entry.label),
            icon: entry.icon,
        }
    }
}

/// Section key → ordered entries.
pub type SectionMap = BTreeMap<String, Vec<RawEntry>>;

/// Path segment → icon.
pub type IconMap = BTreeMap<String, String>;

/// The two global lookups plus the fallback label for bare paths.
#[derive(Debug, Clone, Default)]
pub struct Subpages {
    sections: SectionMap,
    icons: IconMap,
    default_label: Option<String>,
}

/// An entry paired with whether it is the page being viewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubpageLink {
    pub entry: SubpageEntry,
    pub active: bool,
}

impl Subpages {
    pub fn new(sections: SectionMap, icons: IconMap) -> Self {
        Self {
            sections,
            icons,
            default_label: None,
        }
    }

    /// Parse the lookups from their JSON text.
    ///
    /// Only a sections document that is not a JSON object is an error. A
    /// malformed section or icon is skipped with a warning so the rest of
    /// the lookup keeps working; a malformed or missing icon document is
    /// treated as empty.
    pub fn from_json(sections: &str, icons: Option<&str>) -> Result<Self, LookupError> {
        let raw_sections: BTreeMap<String, serde_json::Value> = serde_json::from_str(sections)?;
        let sections = raw_sections
            .into_iter()
            .filter_map(|(key, value)| match serde_json::from_value::<Vec<RawEntry>>(value) {
                Ok(list) => Some((key, list)),
                Err(err) => {
                    log::warn!("skipping sub-page section {key:?}: {err}");
                    None
                }
            })
            .collect();
        let icons = icons.map(parse_icons).unwrap_or_default();
        Ok(Self::new(sections, icons))
    }

    pub fn with_default_label(mut self, label: impl Into<String>) -> Self {
        self.default_label = Some(label.into());
        self
    }

    pub fn sections(&self) -> &SectionMap {
        &self.sections
    }

    pub fn icons(&self) -> &IconMap {
        &self.icons
    }

    /// Whether hovering this key would open the flyout.
    pub fn has_entries(&self, key: &str) -> bool {
        self.sections.get(key).is_some_and(|list| !list.is_empty())
    }

    /// Resolve a section's entries in source order. Unknown keys resolve to
    /// an empty list.
    pub fn resolve(&self, key: &str) -> Vec<SubpageEntry> {
        self.sections
            .get(key)
            .map(|list| list.iter().map(|raw| self.resolve_entry(raw)).collect())
            .unwrap_or_default()
    }

    /// Resolve a section's entries and mark the one matching `current_path`.
    pub fn links(&self, key: &str, current_path: &str) -> Vec<SubpageLink> {
        self.resolve(key)
            .into_iter()
            .map(|entry| SubpageLink {
                active: paths::same_page(&entry.href, current_path),
                entry,
            })
            .collect()
    }

    fn resolve_entry(&self, raw: &RawEntry) -> SubpageEntry {
        let segment = paths::last_segment(raw.href());
        let looked_up_icon = || segment.and_then(|s| self.icons.get(s)).cloned();
        match raw {
            RawEntry::Path(href) => SubpageEntry {
                href: href.clone(),
                label: self.segment_label(segment),
                icon: looked_up_icon(),
            },
            RawEntry::Record { href, label, icon } => SubpageEntry {
                href: href.clone(),
                label: label
                    .clone()
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| self.segment_label(segment)),
                icon: icon.clone().or_else(looked_up_icon),
            },
        }
    }

    fn segment_label(&self, segment: Option<&str>) -> String {
        segment
            .map(str::to_string)
            .unwrap_or_else(|| self.default_label.as_deref().unwrap_or(DEFAULT_LABEL).to_string())
    }
}

fn parse_icons(text: &str) -> IconMap {
    let raw: BTreeMap<String, serde_json::Value> = match serde_json::from_str(text) {
        Ok(raw) => raw,
        Err(err) => {
            log::warn!("ignoring sub-page icon lookup: {err}");
            return IconMap::new();
        }
    };
    raw.into_iter()
        .filter_map(|(segment, value)| match value {
            serde_json::Value::String(icon) => Some((segment, icon)),
            other => {
                log::warn!("skipping icon for {segment:?}: expected a string, got {other}");
                None
            }
        })
        .collect()
}

/// Render the `<li>` items that go inside `#sub-sidebar-links`.
pub fn render_links(links: &[SubpageLink]) -> Markup {
    html! {
        @for link in links {
            li {
                a.sub-link.active[link.active]
                    href=(link.entry.href)
                    aria-current=[link.active.then_some("page")] {
                    @if let Some(icon) = &link.entry.icon {
                        span.sub-icon aria-hidden="true" data-icon=(icon) {}
                    }
                    span.sub-label { (link.entry.label) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs_lookup() -> Subpages {
        Subpages::from_json(r#"{"docs": ["/docs/a", "/docs/b"], "empty": []}"#, None).unwrap()
    }

    #[test]
    fn bare_paths_resolve_in_source_order() {
        let entries = docs_lookup().resolve("docs");
        let hrefs: Vec<&str> = entries.iter().map(|e| e.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/docs/a", "/docs/b"]);
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[test]
    fn current_page_marked_active_ignoring_trailing_slash() {
        let links = docs_lookup().links("docs", "/docs/b/");
        assert_eq!(links.len(), 2);
        assert!(!links[0].active);
        assert!(links[1].active);
    }

    #[test]
    fn unknown_and_empty_sections_have_no_entries() {
        let lookup = docs_lookup();
        assert!(lookup.resolve("blog").is_empty());
        assert!(!lookup.has_entries("blog"));
        assert!(!lookup.has_entries("empty"));
        assert!(lookup.has_entries("docs"));
    }

    #[test]
    fn root_path_uses_default_label() {
        let lookup = Subpages::from_json(r#"{"home": ["/"]}"#, None).unwrap();
        assert_eq!(lookup.resolve("home")[0].label, "Overview");

        let lookup = lookup.with_default_label("Start");
        assert_eq!(lookup.resolve("home")[0].label, "Start");
    }

    #[test]
    fn records_keep_label_and_icon() {
        let lookup = Subpages::from_json(
            r#"{"guides": [{"href": "/guides/setup/", "label": "Setup", "icon": "wrench"}]}"#,
            None,
        )
        .unwrap();
        let entry = &lookup.resolve("guides")[0];
        assert_eq!(entry.label, "Setup");
        assert_eq!(entry.icon.as_deref(), Some("wrench"));
    }

    #[test]
    fn icon_lookup_fills_missing_icons() {
        let lookup = Subpages::from_json(
            r#"{"guides": ["/guides/setup/", {"href": "/guides/deploy", "label": "Deploy"}]}"#,
            Some(r#"{"setup": "wrench", "deploy": "rocket"}"#),
        )
        .unwrap();
        let entries = lookup.resolve("guides");
        assert_eq!(entries[0].icon.as_deref(), Some("wrench"));
        assert_eq!(entries[0].label, "setup");
        assert_eq!(entries[1].icon.as_deref(), Some("rocket"));
    }

    #[test]
    fn record_without_label_uses_segment() {
        let lookup = Subpages::from_json(r#"{"s": [{"href": "/s/intro/"}]}"#, None).unwrap();
        assert_eq!(lookup.resolve("s")[0].label, "intro");
    }

    #[test]
    fn lookup_that_is_not_an_object_is_an_error() {
        assert!(Subpages::from_json("not json", None).is_err());
        assert!(Subpages::from_json(r#"["/docs/a"]"#, None).is_err());
    }

    #[test]
    fn malformed_section_skipped_others_kept() {
        let lookup = Subpages::from_json(
            r#"{"docs": ["/docs/a"], "blog": null, "news": "/news/", "misc": [42]}"#,
            None,
        )
        .unwrap();
        assert_eq!(lookup.resolve("docs").len(), 1);
        assert!(!lookup.has_entries("blog"));
        assert!(!lookup.has_entries("news"));
        assert!(!lookup.has_entries("misc"));
        assert_eq!(lookup.sections().len(), 1);
    }

    #[test]
    fn malformed_icons_skipped_others_kept() {
        let lookup = Subpages::from_json(
            r#"{"docs": ["/docs/a", "/docs/b"]}"#,
            Some(r#"{"a": null, "b": "star"}"#),
        )
        .unwrap();
        let entries = lookup.resolve("docs");
        assert_eq!(entries[0].icon, None);
        assert_eq!(entries[1].icon.as_deref(), Some("star"));

        let lookup = Subpages::from_json(r#"{"docs": ["/docs/a"]}"#, Some("[1, 2]")).unwrap();
        assert!(lookup.icons().is_empty());
        assert_eq!(lookup.resolve("docs").len(), 1);
    }

    #[test]
    fn render_marks_active_link() {
        let html = render_links(&docs_lookup().links("docs", "/docs/b")).into_string();
        assert_eq!(html.matches("<li>").count(), 2);
        assert!(html.contains(r#"class="sub-link active""#));
        assert_eq!(html.matches(r#"aria-current="page""#).count(), 1);
        assert!(html.contains(r#"href="/docs/b" aria-current="page""#));
    }

    #[test]
    fn render_escapes_labels() {
        let links = vec![SubpageLink {
            entry: SubpageEntry {
                href: "/x".into(),
                label: "<b>x</b>".into(),
                icon: Some("star".into()),
            },
            active: false,
        }];
        let html = render_links(&links).into_string();
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        assert!(html.contains(r#"data-icon="star""#));
    }

    #[test]
    fn entries_convert_to_records() {
        let raw: RawEntry = SubpageEntry {
            href: "/a/".into(),
            label: "A".into(),
            icon: None,
        }
        .into();
        assert_eq!(serde_json::to_string(&raw).unwrap(), r#"{"href":"/a/","label":"A"}"#);
    }
}
