//! Page collection schema.
//!
//! Every page in the content collection starts with a TOML front-matter
//! block fenced by `+++` lines:
//!
//! ```text
//! +++
//! title = "Installing"
//! nav_label = "Install"
//! nav_order = 10
//! icon = "download"
//! show_in_nav = true
//! template = "default"
//! +++
//!
//! Body markdown…
//! ```
//!
//! | Field | Type | Default |
//! |-------|------|---------|
//! | `title` | string, required, non-empty | n/a |
//! | `subtitle` | string | none |
//! | `nav_label` | string, non-empty | falls back to `title` |
//! | `nav_order` | number | none (sorts after ordered pages) |
//! | `icon` | string, non-empty | none |
//! | `show_in_nav` | boolean | `true` |
//! | `template` | `"default"`, `"wide"`, `"landing"` | `"default"` |
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const FENCE: &str = "+++";

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("missing front matter: page must start with a `+++` line")]
    MissingFrontMatter,
    #[error("unterminated front matter: no closing `+++` line")]
    UnterminatedFrontMatter,
    #[error("front matter parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("front matter validation error: {0}")]
    Validation(String),
}

/// Layout variant a page is rendered with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    #[default]
    Default,
    Wide,
    Landing,
}

/// Front matter shape of a page in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrontMatter {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Label shown in navigation instead of the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav_label: Option<String>,
    /// Position within the section; lower sorts first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav_order: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default = "default_show_in_nav")]
    pub show_in_nav: bool,
    #[serde(default)]
    pub template: Template,
}

fn default_show_in_nav() -> bool {
    true
}

impl FrontMatter {
    /// Label used for navigation entries.
    pub fn label(&self) -> &str {
        self.nav_label.as_deref().unwrap_or(&self.title)
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.title.trim().is_empty() {
            return Err(SchemaError::Validation("title must not be empty".into()));
        }
        if self.nav_label.as_deref().is_some_and(|l| l.trim().is_empty()) {
            return Err(SchemaError::Validation(
                "nav_label must not be empty when set".into(),
            ));
        }
        if self.icon.as_deref().is_some_and(|i| i.trim().is_empty()) {
            return Err(SchemaError::Validation(
                "icon must not be empty when set".into(),
            ));
        }
        if self.nav_order.is_some_and(|o| !o.is_finite()) {
            return Err(SchemaError::Validation(
                "nav_order must be a finite number".into(),
            ));
        }
        Ok(())
    }
}

/// Split a page source into its front-matter text and body.
pub fn split_front_matter(source: &str) -> Result<(&str, &str), SchemaError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut lines = source.split_inclusive('\n');
    let first = lines.next().ok_or(SchemaError::MissingFrontMatter)?;
    if first.trim_end() != FENCE {
        return Err(SchemaError::MissingFrontMatter);
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == FENCE {
            return Ok((&source[start..offset], &source[offset + line.len()..]));
        }
        offset += line.len();
    }
    Err(SchemaError::UnterminatedFrontMatter)
}

/// Parse and validate front matter text (without fences).
pub fn parse_front_matter(text: &str) -> Result<FrontMatter, SchemaError> {
    let front: FrontMatter = toml::from_str(text)?;
    front.validate()?;
    Ok(front)
}

/// Parse a complete page source into its validated front matter. The
/// markdown body is left to the site renderer.
pub fn parse_page(source: &str) -> Result<FrontMatter, SchemaError> {
    let (front, _body) = split_front_matter(source)?;
    parse_front_matter(front)
}
