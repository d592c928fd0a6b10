//! Shared test utilities for the site-nav test suite.
//!
//! Provides recording views for the drawer and flyout state machines, and
//! helpers for building content trees on disk.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! write_page(tmp.path(), "docs/extra.md", "title = \"Extra\"");
//!
//! let mut drawer = Drawer::new(RecordingDrawerView::default());
//! drawer.toggle();
//! assert_eq!(drawer.view().focus_log, vec![FocusTarget::FirstLink]);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::drawer::{DrawerChrome, DrawerView, FocusTarget};
use crate::flyout::FlyoutView;
use crate::subpages::SubpageLink;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write a page with the given front matter (no fences) under `root`,
/// creating parent directories.
pub fn write_page(root: &Path, relative: &str, front_matter: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, format!("+++\n{front_matter}\n+++\n\nBody of {relative}.\n")).unwrap();
}

// =========================================================================
// Recording views
// =========================================================================

/// Drawer view that records every render and focus move.
#[derive(Debug, Default)]
pub struct RecordingDrawerView {
    pub renders: Vec<DrawerChrome>,
    pub focus_log: Vec<FocusTarget>,
}

impl RecordingDrawerView {
    pub fn last(&self) -> Option<&DrawerChrome> {
        self.renders.last()
    }
}

impl DrawerView for RecordingDrawerView {
    fn render(&mut self, chrome: &DrawerChrome) {
        self.renders.push(*chrome);
    }

    fn focus(&mut self, target: FocusTarget) {
        self.focus_log.push(target);
    }
}

/// Flyout view that keeps the currently shown state.
#[derive(Debug, Default)]
pub struct RecordingFlyoutView {
    pub open: bool,
    pub pinned: bool,
    pub links: Vec<SubpageLink>,
    pub populate_count: usize,
}

impl FlyoutView for RecordingFlyoutView {
    fn show(&mut self, open: bool) {
        self.open = open;
    }

    fn populate(&mut self, links: &[SubpageLink]) {
        self.links = links.to_vec();
        self.populate_count += 1;
    }

    fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
    }
}
