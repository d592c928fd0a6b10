//! Sub-sidebar flyout: the desktop panel listing the pages of the hovered
//! (or pinned) top-level section.
//!
//! ## States
//!
//! ```text
//!            hover key with entries
//!   Closed ─────────────────────────▶ Open ◀──── toggle_pin ───▶ Pinned
//!     ▲                                │                           │
//!     └──── debounced hover-away ──────┘        (never auto-closes)
//! ```
//!
//! Pinning is a preference that outlives the open state: it is persisted to
//! local storage and restored on the next page, and a pinned flyout ignores
//! hover-away. The section being shown is persisted to session storage so the
//! flyout re-opens on the same section after navigation; it is cleared when
//! the flyout closes.
//!
//! ## Debounce
//!
//! Hover-away closes are delayed so the pointer can cross the gap between the
//! main nav and the flyout. Scheduling returns a [`CloseTicket`]; the host
//! runs a timer for the configured delay and hands the ticket back through
//! [`SubSidebar::close_elapsed`]. Any hover or enter before then cancels the
//! pending ticket, and a stale ticket does nothing.
//!
//! ## Breakpoint
//!
//! Below the desktop breakpoint the flyout is forced closed and shown
//! unpinned, but storage is left alone. Crossing back up restores from
//! storage.

use crate::storage::{NavStore, Storage};
use crate::subpages::{SubpageLink, Subpages};

/// Observable flyout state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlyoutState {
    Closed,
    Open,
    Pinned,
}

/// Where the pointer currently is, for hover-away detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerRegion {
    MainNav,
    Flyout,
    Elsewhere,
}

/// Identifies one scheduled close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseTicket(u64);

/// Receives flyout transitions. Implemented over the DOM by the `web` binding.
pub trait FlyoutView {
    /// Toggle the `open` class on `.sub-sidebar`.
    fn show(&mut self, open: bool);
    /// Replace the contents of `#sub-sidebar-links`.
    fn populate(&mut self, links: &[SubpageLink]);
    /// Reflect the pin state on `.sub-pin`.
    fn set_pinned(&mut self, pinned: bool);
}

/// Sub-sidebar state machine.
#[derive(Debug)]
pub struct SubSidebar<V, S, L> {
    view: V,
    store: NavStore<S, L>,
    subpages: Subpages,
    current_path: String,
    desktop: bool,
    open: bool,
    pinned: bool,
    section: Option<String>,
    pending: Option<CloseTicket>,
    next_ticket: u64,
}

impl<V: FlyoutView, S: Storage, L: Storage> SubSidebar<V, S, L> {
    /// Bind to a view and restore any persisted state.
    pub fn new(
        view: V,
        store: NavStore<S, L>,
        subpages: Subpages,
        current_path: impl Into<String>,
        desktop: bool,
    ) -> Self {
        let mut flyout = Self {
            view,
            store,
            subpages,
            current_path: current_path.into(),
            desktop,
            open: false,
            pinned: false,
            section: None,
            pending: None,
            next_ticket: 0,
        };
        flyout.restore();
        flyout
    }

    pub fn state(&self) -> FlyoutState {
        match (self.open, self.pinned) {
            (false, _) => FlyoutState::Closed,
            (true, false) => FlyoutState::Open,
            (true, true) => FlyoutState::Pinned,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Pin state as currently shown.
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn is_desktop(&self) -> bool {
        self.desktop
    }

    /// Section whose entries were last populated.
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    pub fn pending_close(&self) -> Option<CloseTicket> {
        self.pending
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn store(&self) -> &NavStore<S, L> {
        &self.store
    }

    pub fn into_store(self) -> NavStore<S, L> {
        self.store
    }

    /// Pointer entered a main nav link. `key` is its `data-subpages` value.
    pub fn hover_link(&mut self, key: Option<&str>) -> Option<CloseTicket> {
        self.cancel_close();
        if !self.desktop {
            return None;
        }
        match key {
            Some(key) if self.populate(key) => {
                self.set_open(true);
                self.store.set_section_key(key);
                None
            }
            _ => self.schedule_close(),
        }
    }

    /// Pointer entered the flyout itself.
    pub fn enter_flyout(&mut self) {
        self.cancel_close();
    }

    /// Pointer moved somewhere in the document.
    pub fn pointer_moved(&mut self, region: PointerRegion) -> Option<CloseTicket> {
        if !self.open {
            return None;
        }
        match region {
            PointerRegion::Elsewhere => self.schedule_close(),
            PointerRegion::MainNav | PointerRegion::Flyout => {
                self.cancel_close();
                None
            }
        }
    }

    /// A nav or flyout link was clicked. Keeps the flyout from closing while
    /// navigation starts and remembers the clicked section for the next page.
    pub fn click_link(&mut self, key: Option<&str>) {
        self.cancel_close();
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            self.store.set_section_key(key);
        }
    }

    /// The debounce timer for `ticket` fired.
    pub fn close_elapsed(&mut self, ticket: CloseTicket) {
        if self.pending != Some(ticket) {
            return;
        }
        self.pending = None;
        if !self.pinned {
            self.close();
        }
    }

    /// Close the flyout and forget the open section.
    pub fn close(&mut self) {
        self.cancel_close();
        self.set_open(false);
        self.store.clear_section_key();
    }

    /// Pin control clicked.
    pub fn toggle_pin(&mut self) {
        self.cancel_close();
        self.pinned = !self.pinned;
        self.store.set_pinned(self.pinned);
        self.view.set_pinned(self.pinned);
        log::debug!("sub-sidebar pinned: {}", self.pinned);
    }

    /// The desktop media query changed.
    pub fn viewport_changed(&mut self, desktop: bool) {
        if desktop {
            let was_desktop = self.desktop;
            self.desktop = true;
            if !was_desktop {
                self.restore();
            }
            return;
        }
        self.desktop = false;
        self.cancel_close();
        self.pinned = false;
        self.view.set_pinned(false);
        self.set_open(false);
    }

    /// Re-apply persisted pin and section state. Does nothing below the
    /// desktop breakpoint.
    pub fn restore(&mut self) {
        self.cancel_close();
        if !self.desktop {
            return;
        }
        self.pinned = self.store.pinned().unwrap_or(false);
        self.view.set_pinned(self.pinned);

        let Some(key) = self.store.section_key() else {
            return;
        };
        if self.populate(&key) {
            self.set_open(true);
        } else {
            log::debug!("dropping stale sub-sidebar section {key:?}");
            self.store.clear_section_key();
        }
    }

    fn populate(&mut self, key: &str) -> bool {
        let links = self.subpages.links(key, &self.current_path);
        if links.is_empty() {
            return false;
        }
        self.view.populate(&links);
        self.section = Some(key.to_string());
        true
    }

    fn set_open(&mut self, open: bool) {
        self.open = open;
        self.view.show(open);
    }

    fn schedule_close(&mut self) -> Option<CloseTicket> {
        if !self.open || self.pinned {
            return None;
        }
        self.next_ticket += 1;
        let ticket = CloseTicket(self.next_ticket);
        self.pending = Some(ticket);
        Some(ticket)
    }

    fn cancel_close(&mut self) {
        self.pending = None;
    }
}
