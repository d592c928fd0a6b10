//! Left drawer: the off-canvas navigation panel used on narrow viewports.
//!
//! A hamburger toggle opens the drawer. It closes on the toggle, the close
//! button, a backdrop click, or Escape. Crossing the desktop breakpoint in
//! either direction forces it closed, since the drawer only exists below it.
//!
//! The state machine never touches the DOM itself. Every transition produces
//! a [`DrawerChrome`] snapshot describing the attributes the markup should
//! carry, plus an optional focus move, and hands both to a [`DrawerView`].
//! Re-applying the same snapshot is harmless, which keeps `open`/`close`
//! idempotent.

/// Focus destinations after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// First link inside the drawer panel.
    FirstLink,
    /// The hamburger toggle.
    Toggle,
}

/// Attribute state of the drawer markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawerChrome {
    /// `data-open` on `#site-drawer`.
    pub open: bool,
    /// `hidden` on `.site-backdrop`.
    pub backdrop_hidden: bool,
    /// `aria-expanded` on `.site-menu-toggle`.
    pub toggle_expanded: bool,
    /// `aria-label` on `.site-menu-toggle`.
    pub toggle_label: &'static str,
    /// `is-hidden` class on `.site-menu-toggle`.
    pub toggle_icon_hidden: bool,
    /// `hidden` on `.site-menu-close`, when present.
    pub close_button_hidden: bool,
    /// `overflow: hidden` on the document element.
    pub scroll_locked: bool,
}

impl DrawerChrome {
    pub const OPEN: DrawerChrome = DrawerChrome {
        open: true,
        backdrop_hidden: false,
        toggle_expanded: true,
        toggle_label: "Close menu",
        toggle_icon_hidden: true,
        close_button_hidden: false,
        scroll_locked: true,
    };

    pub const CLOSED: DrawerChrome = DrawerChrome {
        open: false,
        backdrop_hidden: true,
        toggle_expanded: false,
        toggle_label: "Open menu",
        toggle_icon_hidden: false,
        close_button_hidden: true,
        scroll_locked: false,
    };

    pub fn for_state(open: bool) -> Self {
        if open { Self::OPEN } else { Self::CLOSED }
    }
}

/// Receives drawer transitions. Implemented over the DOM by the `web` binding.
pub trait DrawerView {
    fn render(&mut self, chrome: &DrawerChrome);
    fn focus(&mut self, target: FocusTarget);
}

/// Drawer state machine.
#[derive(Debug)]
pub struct Drawer<V> {
    view: V,
    open: bool,
}

impl<V: DrawerView> Drawer<V> {
    /// Bind to a view. The drawer always starts closed.
    pub fn new(view: V) -> Self {
        let mut drawer = Self { view, open: false };
        drawer.render();
        drawer
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn open(&mut self) {
        self.open = true;
        self.render();
        self.view.focus(FocusTarget::FirstLink);
        log::debug!("drawer opened");
    }

    pub fn close(&mut self) {
        self.open = false;
        self.render();
        self.view.focus(FocusTarget::Toggle);
        log::debug!("drawer closed");
    }

    /// Hamburger click.
    pub fn toggle(&mut self) {
        if self.open { self.close() } else { self.open() }
    }

    /// Escape only acts on an open drawer so it never steals focus.
    pub fn escape(&mut self) {
        if self.open {
            self.close();
        }
    }

    pub fn backdrop_click(&mut self) {
        self.close();
    }

    pub fn close_button_click(&mut self) {
        self.close();
    }

    /// The breakpoint media query changed. Forces the closed state without
    /// moving focus.
    pub fn viewport_changed(&mut self, desktop: bool) {
        self.open = false;
        self.render();
        log::debug!("drawer reset for {} viewport", if desktop { "desktop" } else { "mobile" });
    }

    fn render(&mut self) {
        self.view.render(&DrawerChrome::for_state(self.open));
    }
}
