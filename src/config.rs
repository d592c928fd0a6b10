//! Navigation configuration module.
//!
//! Handles loading, validating, and merging `nav.toml`. Stock defaults are
//! overridden by whatever keys the user file sets; the browser binding uses
//! the stock defaults unless the host page passes its own.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [breakpoint]
//! desktop_min_width = 901           # px; at or above this the flyout is active
//!
//! [sub_sidebar]
//! close_delay_ms = 150              # debounce before a hover-away close
//! default_label = "Overview"        # label for entries whose path has no segment
//!
//! [storage]
//! section_key = "openSubSidebarKey" # sessionStorage key, last-opened section
//! pin_key = "subSidebarPinned"      # localStorage key, "1" or "0"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Upper bound for the hover-away debounce.
const MAX_CLOSE_DELAY_MS: u64 = 5_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Navigation configuration loaded from `nav.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    /// Responsive breakpoint between drawer (mobile) and flyout (desktop).
    pub breakpoint: BreakpointConfig,
    /// Flyout timing and labelling.
    pub sub_sidebar: SubSidebarConfig,
    /// Browser storage keys.
    pub storage: StorageConfig,
}

impl NavConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.breakpoint.desktop_min_width == 0 {
            return Err(ConfigError::Validation(
                "breakpoint.desktop_min_width must be non-zero".into(),
            ));
        }
        if self.sub_sidebar.close_delay_ms > MAX_CLOSE_DELAY_MS {
            return Err(ConfigError::Validation(format!(
                "sub_sidebar.close_delay_ms must be at most {MAX_CLOSE_DELAY_MS}"
            )));
        }
        if self.sub_sidebar.default_label.trim().is_empty() {
            return Err(ConfigError::Validation(
                "sub_sidebar.default_label must not be empty".into(),
            ));
        }
        if self.storage.section_key.is_empty() || self.storage.pin_key.is_empty() {
            return Err(ConfigError::Validation(
                "storage keys must not be empty".into(),
            ));
        }
        if self.storage.section_key == self.storage.pin_key {
            return Err(ConfigError::Validation(
                "storage.section_key and storage.pin_key must differ".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BreakpointConfig {
    /// Minimum viewport width, in CSS pixels, treated as desktop.
    pub desktop_min_width: u32,
}

impl Default for BreakpointConfig {
    fn default() -> Self {
        Self {
            desktop_min_width: 901,
        }
    }
}

impl BreakpointConfig {
    /// Media query matching desktop viewports, e.g. `(min-width: 901px)`.
    pub fn media_query(&self) -> String {
        format!("(min-width: {}px)", self.desktop_min_width)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubSidebarConfig {
    /// Debounce between hovering away and the flyout closing.
    pub close_delay_ms: u64,
    /// Label for bare-path entries without a usable segment.
    pub default_label: String,
}

impl Default for SubSidebarConfig {
    fn default() -> Self {
        Self {
            close_delay_ms: 150,
            default_label: crate::subpages::DEFAULT_LABEL.to_string(),
        }
    }
}

impl SubSidebarConfig {
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Session storage key holding the last-opened section.
    pub section_key: String,
    /// Local storage key holding the pin flag.
    pub pin_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            section_key: "openSubSidebarKey".to_string(),
            pin_key: "subSidebarPinned".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(NavConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value. `Ok(None)` if it does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<NavConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: NavConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `nav.toml` from `path`, falling back to stock defaults when absent.
pub fn load_config(path: &Path) -> Result<NavConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(path)?)
}

/// Returns a fully-commented stock `nav.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# site-nav configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Responsive breakpoint
# ---------------------------------------------------------------------------
[breakpoint]
# Viewports at least this wide (CSS px) are desktop: the drawer is forced
# closed and the sub-sidebar flyout is active. Narrower viewports use the
# drawer and keep the flyout closed.
desktop_min_width = 901

# ---------------------------------------------------------------------------
# Sub-sidebar flyout
# ---------------------------------------------------------------------------
[sub_sidebar]
# Delay before the flyout closes after the pointer leaves both the main nav
# and the flyout (milliseconds, at most 5000).
close_delay_ms = 150

# Label for entries whose path has no segment to name them (e.g. "/").
default_label = "Overview"

# ---------------------------------------------------------------------------
# Browser storage
# ---------------------------------------------------------------------------
[storage]
# sessionStorage key remembering the last-opened section for this tab.
section_key = "openSubSidebarKey"

# localStorage key remembering the pin preference ("1" or "0").
pin_key = "subSidebarPinned"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = NavConfig::default();
        assert_eq!(config.breakpoint.desktop_min_width, 901);
        assert_eq!(config.sub_sidebar.close_delay_ms, 150);
        assert_eq!(config.sub_sidebar.default_label, "Overview");
        assert_eq!(config.storage.section_key, "openSubSidebarKey");
        assert_eq!(config.storage.pin_key, "subSidebarPinned");
        config.validate().unwrap();
    }

    #[test]
    fn media_query_from_breakpoint() {
        let bp = BreakpointConfig::default();
        assert_eq!(bp.media_query(), "(min-width: 901px)");
        let bp = BreakpointConfig { desktop_min_width: 1200 };
        assert_eq!(bp.media_query(), "(min-width: 1200px)");
    }

    #[test]
    fn close_delay_duration() {
        assert_eq!(
            SubSidebarConfig::default().close_delay(),
            Duration::from_millis(150)
        );
    }

    #[test]
    fn parse_partial_config() {
        let config: NavConfig = toml::from_str("[sub_sidebar]\nclose_delay_ms = 300\n").unwrap();
        assert_eq!(config.sub_sidebar.close_delay_ms, 300);
        // Default values preserved
        assert_eq!(config.sub_sidebar.default_label, "Overview");
        assert_eq!(config.breakpoint.desktop_min_width, 901);
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<NavConfig, _> = toml::from_str("[breakpoint]\nmin_width = 800\n");
        assert!(result.is_err());
        let result: Result<NavConfig, _> = toml::from_str("[drawer]\n");
        assert!(result.is_err());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = NavConfig::default();
        config.breakpoint.desktop_min_width = 0;
        assert!(config.validate().is_err());

        let mut config = NavConfig::default();
        config.sub_sidebar.close_delay_ms = 60_000;
        assert!(config.validate().is_err());

        let mut config = NavConfig::default();
        config.storage.pin_key = config.storage.section_key.clone();
        assert!(config.validate().is_err());

        let mut config = NavConfig::default();
        config.storage.section_key.clear();
        assert!(config.validate().is_err());

        let mut config = NavConfig::default();
        config.sub_sidebar.default_label = " ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn merge_preserves_unset_keys() {
        let overlay: toml::Value = toml::from_str("[storage]\npin_key = \"pin\"\n").unwrap();
        let config = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        assert_eq!(config.storage.pin_key, "pin");
        assert_eq!(config.storage.section_key, "openSubSidebarKey");
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("nav.toml")).unwrap();
        assert_eq!(config, NavConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nav.toml");
        fs::write(&path, "[breakpoint]\ndesktop_min_width = 1024\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.breakpoint.desktop_min_width, 1024);
        assert_eq!(config.sub_sidebar.close_delay_ms, 150);
    }

    #[test]
    fn load_config_rejects_invalid_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nav.toml");
        fs::write(&path, "[breakpoint]\ndesktop_min_width = 0\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: NavConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, NavConfig::default());
    }
}
