//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every page leads with its positional index and navigation label, followed
//! by where it lands on the site. The source file is secondary context on an
//! indented `Source:` line.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Sections
//! 001 docs (2 pages)
//!     001 Overview → /docs/
//!         Source: docs/index.md
//!     002 Install → /docs/install/ [download]
//!         Source: docs/010-install.md
//!
//! Hidden
//!     Unfinished guides → /guides/drafts/
//!         Source: 020-guides/drafts.md
//!
//! Pages
//! 001 Acme Docs → /
//!     Source: index.md
//!
//! 3 sections, 10 pages
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>` or
//! `String`) for testability and a `print_*` wrapper that writes to stdout.

use crate::collection::{Collection, ContentEntry};
use crate::subpages::{self, SubpageLink, Subpages};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `Label → /href/ [icon]`
fn entry_line(entry: &ContentEntry) -> String {
    match &entry.front.icon {
        Some(icon) => format!("{} → {} [{}]", entry.front.label(), entry.href, icon),
        None => format!("{} → {}", entry.front.label(), entry.href),
    }
}

fn source_line(depth: usize, entry: &ContentEntry) -> String {
    format!("{}Source: {}", indent(depth), entry.source.display())
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// check
// ============================================================================

/// Format the collection inventory printed by `check`.
pub fn format_check_output(collection: &Collection) -> Vec<String> {
    let mut lines = Vec::new();
    let sections = collection.sections();

    lines.push("Sections".to_string());
    for (i, (key, entries)) in sections.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            key,
            plural(entries.len(), "page")
        ));
        for (j, entry) in entries.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(j + 1), entry_line(entry)));
            lines.push(source_line(2, entry));
        }
    }

    let hidden: Vec<&ContentEntry> = collection
        .entries
        .iter()
        .filter(|e| !e.front.show_in_nav)
        .collect();
    if !hidden.is_empty() {
        lines.push(String::new());
        lines.push("Hidden".to_string());
        for entry in hidden {
            lines.push(format!("{}{} → {}", indent(1), entry.front.title, entry.href));
            lines.push(source_line(2, entry));
        }
    }

    let root_pages: Vec<&ContentEntry> = collection
        .entries
        .iter()
        .filter(|e| e.section.is_empty() && e.front.show_in_nav)
        .collect();
    if !root_pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, entry) in root_pages.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), entry_line(entry)));
            lines.push(source_line(1, entry));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{}, {}",
        plural(sections.len(), "section"),
        plural(collection.entries.len(), "page")
    ));
    lines
}

/// Print `check` output to stdout.
pub fn print_check_output(collection: &Collection) {
    for line in format_check_output(collection) {
        println!("{}", line);
    }
}

// ============================================================================
// subpages
// ============================================================================

/// Serialize the lookups as `{"subpages": …, "icons": …}`.
pub fn format_subpages_json(lookup: &Subpages, pretty: bool) -> Result<String, serde_json::Error> {
    let value = serde_json::json!({
        "subpages": lookup.sections(),
        "icons": lookup.icons(),
    });
    if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
}

// ============================================================================
// render
// ============================================================================

/// Render the `<li>` list for one section.
pub fn format_render_output(links: &[SubpageLink]) -> String {
    subpages::render_links(links).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::load_collection;
    use crate::test_helpers::setup_fixtures;

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn plural_words() {
        assert_eq!(plural(1, "page"), "1 page");
        assert_eq!(plural(0, "page"), "0 pages");
        assert_eq!(plural(3, "section"), "3 sections");
    }

    #[test]
    fn check_output_lists_sections_hidden_and_root_pages() {
        let tmp = setup_fixtures();
        let collection = load_collection(tmp.path()).unwrap();
        let lines = format_check_output(&collection);

        assert_eq!(lines[0], "Sections");
        assert_eq!(lines[1], "001 blog (1 page)");
        assert!(lines.contains(&"002 docs (4 pages)".to_string()));
        assert!(lines.contains(&"    002 Install → /docs/install/ [download]".to_string()));
        assert!(lines.contains(&"        Source: docs/010-install.md".to_string()));
        assert!(lines.contains(&"Hidden".to_string()));
        assert!(lines.contains(&"    Unfinished guides → /guides/drafts/".to_string()));
        assert!(lines.contains(&"Pages".to_string()));
        assert!(lines.contains(&"001 About → /about/".to_string()));
        assert_eq!(lines.last().unwrap(), "3 sections, 10 pages");
    }

    #[test]
    fn check_output_omits_empty_groups() {
        let lines = format_check_output(&Collection::default());
        assert_eq!(lines, vec!["Sections", "", "0 sections, 0 pages"]);
    }

    #[test]
    fn subpages_json_shape() {
        let lookup = Subpages::from_json(r#"{"docs": ["/docs/a"]}"#, Some(r#"{"a": "star"}"#)).unwrap();
        let json = format_subpages_json(&lookup, false).unwrap();
        assert_eq!(json, r#"{"icons":{"a":"star"},"subpages":{"docs":["/docs/a"]}}"#);
    }

    #[test]
    fn render_output_is_list_items() {
        let lookup = Subpages::from_json(r#"{"docs": ["/docs/a"]}"#, None).unwrap();
        let html = format_render_output(&lookup.links("docs", "/"));
        assert!(html.starts_with("<li>"));
        assert!(html.ends_with("</li>"));
    }
}
