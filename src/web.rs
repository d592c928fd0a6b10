//! Browser binding for the drawer and flyout state machines.
//!
//! Compiled only with the `web` feature, for `wasm32-unknown-unknown`. The
//! host page loads the generated module and calls `initNavigation()` on
//! `DOMContentLoaded` and after every client-side page swap:
//!
//! ```js
//! import init, { initNavigation } from "./site_nav.js";
//! await init();
//! initNavigation();
//! document.addEventListener("astro:page-load", () => initNavigation());
//! ```
//!
//! Each widget marks its root with `data-nav-bound` so repeated calls never
//! double-bind listeners. Missing elements disable the widget with a console
//! warning; nothing here panics.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, FocusOptions, HtmlElement, KeyboardEvent,
    MediaQueryList, MediaQueryListEvent, Node, Window,
};

use crate::config::{self, NavConfig};
use crate::drawer::{Drawer, DrawerChrome, DrawerView, FocusTarget};
use crate::flyout::{CloseTicket, FlyoutView, PointerRegion, SubSidebar};
use crate::storage::{NavStore, Storage};
use crate::subpages::{self, SubpageLink, Subpages};

const BOUND_ATTR: &str = "data-nav-bound";
const SUBPAGES_GLOBAL: &str = "__SUBPAGES__";
const ICONS_GLOBAL: &str = "__SUBPAGE_ICONS__";

/// Bind every drawer and the flyout using the stock configuration.
#[wasm_bindgen(js_name = initNavigation)]
pub fn init() {
    install_logging();
    bind_all(&NavConfig::default());
}

/// Bind with a `nav.toml` document layered over the stock configuration.
#[wasm_bindgen(js_name = initNavigationWith)]
pub fn init_with(config_toml: &str) -> Result<(), JsValue> {
    install_logging();
    let overlay: toml::Value =
        toml::from_str(config_toml).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let nav_config = config::resolve_config(config::stock_defaults_value(), Some(overlay))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    bind_all(&nav_config);
    Ok(())
}

fn install_logging() {
    console_error_panic_hook::set_once();
    // Already installed on repeat calls
    let _ = console_log::init_with_level(log::Level::Warn);
}

fn bind_all(nav_config: &NavConfig) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    for root in query_all(&document, "[data-component=\"site-sidebar\"]") {
        setup_left_drawer(&window, &root, nav_config);
    }
    if let Ok(Some(panel)) = document.query_selector(".sub-sidebar") {
        setup_sub_sidebar(&window, &document, panel, nav_config);
    }
}

// ============================================================================
// DOM helpers
// ============================================================================

fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn find_html(root: &Element, selector: &str) -> Option<HtmlElement> {
    root.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
}

/// Mark an element as bound. Returns `false` if it already was.
fn claim(element: &Element) -> bool {
    if element.has_attribute(BOUND_ATTR) {
        return false;
    }
    let _ = element.set_attribute(BOUND_ATTR, "true");
    true
}

fn set_attr(element: &Element, name: &str, value: &str) {
    if let Err(err) = element.set_attribute(name, value) {
        log::warn!("failed to set {name}: {err:?}");
    }
}

fn toggle_class(element: &Element, class: &str, on: bool) {
    let _ = element.class_list().toggle_with_force(class, on);
}

fn listen<E: JsCast + 'static>(
    target: &EventTarget,
    event: &str,
    mut handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::<dyn FnMut(Event)>::new(move |e: Event| handler(e.unchecked_into::<E>()));
    if let Err(err) =
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        log::warn!("failed to listen for {event}: {err:?}");
    }
    // Listeners live as long as the page
    closure.forget();
}

fn desktop_query(window: &Window, nav_config: &NavConfig) -> Option<MediaQueryList> {
    window
        .match_media(&nav_config.breakpoint.media_query())
        .ok()
        .flatten()
}

fn focus_next_frame(window: &Window, element: HtmlElement) {
    let callback = Closure::once_into_js(move || {
        let options = FocusOptions::new();
        options.set_prevent_scroll(true);
        let _ = element.focus_with_options(&options);
    });
    let _ = window.request_animation_frame(callback.unchecked_ref());
}

// ============================================================================
// Storage
// ============================================================================

/// `sessionStorage` or `localStorage`. Unavailable storage reads as empty
/// and swallows writes.
pub struct WebStorage(Option<web_sys::Storage>);

impl WebStorage {
    pub fn session(window: &Window) -> Self {
        Self(window.session_storage().ok().flatten())
    }

    pub fn local(window: &Window) -> Self {
        Self(window.local_storage().ok().flatten())
    }
}

impl Storage for WebStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.0
            && let Err(err) = storage.set_item(key, value)
        {
            log::warn!("storage write for {key} failed: {err:?}");
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(storage) = &self.0 {
            let _ = storage.remove_item(key);
        }
    }
}

// ============================================================================
// Drawer
// ============================================================================

struct DomDrawerView {
    window: Window,
    toggle: HtmlElement,
    drawer: HtmlElement,
    backdrop: HtmlElement,
    close_button: Option<HtmlElement>,
    page: Option<HtmlElement>,
}

impl DrawerView for DomDrawerView {
    fn render(&mut self, chrome: &DrawerChrome) {
        set_attr(&self.drawer, "data-open", if chrome.open { "true" } else { "false" });
        self.backdrop.set_hidden(chrome.backdrop_hidden);
        set_attr(
            &self.toggle,
            "aria-expanded",
            if chrome.toggle_expanded { "true" } else { "false" },
        );
        set_attr(&self.toggle, "aria-label", chrome.toggle_label);
        toggle_class(&self.toggle, "is-hidden", chrome.toggle_icon_hidden);
        if let Some(close) = &self.close_button {
            close.set_hidden(chrome.close_button_hidden);
        }
        if let Some(page) = &self.page {
            let style = page.style();
            let _ = if chrome.scroll_locked {
                style.set_property("overflow", "hidden")
            } else {
                style.remove_property("overflow").map(|_| ())
            };
        }
    }

    fn focus(&mut self, target: FocusTarget) {
        let element = match target {
            FocusTarget::Toggle => Some(self.toggle.clone()),
            FocusTarget::FirstLink => find_html(&self.drawer, "a"),
        };
        if let Some(element) = element {
            focus_next_frame(&self.window, element);
        }
    }
}

fn setup_left_drawer(window: &Window, root: &Element, nav_config: &NavConfig) {
    let toggle = find_html(root, ".site-menu-toggle");
    let drawer_el = find_html(root, "#site-drawer");
    let backdrop = find_html(root, ".site-backdrop");
    let (Some(toggle), Some(drawer_el), Some(backdrop)) = (toggle, drawer_el, backdrop) else {
        log::warn!("[navDrawer] missing toggle, drawer, or backdrop; drawer disabled");
        return;
    };
    if !claim(root) {
        return;
    }

    let close_button = find_html(root, ".site-menu-close");
    let page = window
        .document()
        .and_then(|d| d.document_element())
        .and_then(|e| e.dyn_into::<HtmlElement>().ok());

    let view = DomDrawerView {
        window: window.clone(),
        toggle: toggle.clone(),
        drawer: drawer_el,
        backdrop: backdrop.clone(),
        close_button: close_button.clone(),
        page,
    };
    let drawer = Rc::new(RefCell::new(Drawer::new(view)));

    {
        let drawer = drawer.clone();
        listen(&toggle, "click", move |_: Event| drawer.borrow_mut().toggle());
    }
    if let Some(close_button) = close_button {
        let drawer = drawer.clone();
        listen(&close_button, "click", move |_: Event| {
            drawer.borrow_mut().close_button_click()
        });
    }
    {
        let drawer = drawer.clone();
        listen(&backdrop, "click", move |_: Event| drawer.borrow_mut().backdrop_click());
    }
    {
        let drawer = drawer.clone();
        listen(window, "keydown", move |e: KeyboardEvent| {
            if e.key() == "Escape" {
                drawer.borrow_mut().escape();
            }
        });
    }
    if let Some(query) = desktop_query(window, nav_config) {
        listen(&query, "change", move |e: MediaQueryListEvent| {
            drawer.borrow_mut().viewport_changed(e.matches());
        });
    }
}

// ============================================================================
// Sub-sidebar
// ============================================================================

struct DomFlyoutView {
    panel: Element,
    links: Element,
    pin: Option<Element>,
}

impl FlyoutView for DomFlyoutView {
    fn show(&mut self, open: bool) {
        toggle_class(&self.panel, "open", open);
    }

    fn populate(&mut self, links: &[SubpageLink]) {
        self.links
            .set_inner_html(&subpages::render_links(links).into_string());
    }

    fn set_pinned(&mut self, pinned: bool) {
        toggle_class(&self.panel, "is-pinned", pinned);
        if let Some(pin) = &self.pin {
            set_attr(pin, "aria-pressed", if pinned { "true" } else { "false" });
        }
    }
}

type WebFlyout = SubSidebar<DomFlyoutView, WebStorage, WebStorage>;

/// Shared flyout plus its debounce timer.
#[derive(Clone)]
struct FlyoutHandle {
    flyout: Rc<RefCell<WebFlyout>>,
    timer: Rc<RefCell<Option<Timeout>>>,
    delay_ms: u32,
}

impl FlyoutHandle {
    /// Arm the timer for a freshly scheduled close, or drop it once the
    /// machine has nothing pending.
    fn after(&self, ticket: Option<CloseTicket>) {
        match ticket {
            Some(ticket) => {
                let flyout = self.flyout.clone();
                let timeout = Timeout::new(self.delay_ms, move || {
                    flyout.borrow_mut().close_elapsed(ticket);
                });
                // Replacing the old timeout cancels it
                *self.timer.borrow_mut() = Some(timeout);
            }
            None => {
                if self.flyout.borrow().pending_close().is_none() {
                    self.timer.borrow_mut().take();
                }
            }
        }
    }
}

/// Read a page-supplied global as JSON text. Absent globals are `None`.
fn global_json(window: &Window, name: &str) -> Option<String> {
    let value = js_sys::Reflect::get(window, &JsValue::from_str(name)).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    js_sys::JSON::stringify(&value).ok().map(String::from)
}

fn read_subpages(window: &Window, nav_config: &NavConfig) -> Subpages {
    let Some(sections) = global_json(window, SUBPAGES_GLOBAL) else {
        return Subpages::default();
    };
    let icons = global_json(window, ICONS_GLOBAL);
    match Subpages::from_json(&sections, icons.as_deref()) {
        Ok(lookup) => lookup.with_default_label(nav_config.sub_sidebar.default_label.clone()),
        Err(err) => {
            log::warn!("[navDrawer] {err}; sub-sidebar has no entries");
            Subpages::default()
        }
    }
}

fn setup_sub_sidebar(window: &Window, document: &Document, panel: Element, nav_config: &NavConfig) {
    let links = document.get_element_by_id("sub-sidebar-links");
    let main_links = query_all(document, ".site-nav a");
    let Some(links) = links.filter(|_| !main_links.is_empty()) else {
        log::warn!("[navDrawer] missing #sub-sidebar-links or .site-nav links; sub-sidebar disabled");
        return;
    };
    if !claim(&panel) {
        return;
    }

    let main_sidebar = document.get_element_by_id("site-drawer");
    let pin = panel.query_selector(".sub-pin").ok().flatten();
    let query = desktop_query(window, nav_config);
    let desktop = query.as_ref().is_some_and(MediaQueryList::matches);
    let current_path = window.location().pathname().unwrap_or_else(|_| "/".to_string());

    let view = DomFlyoutView {
        panel: panel.clone(),
        links,
        pin: pin.clone(),
    };
    let store = NavStore::new(
        WebStorage::session(window),
        WebStorage::local(window),
        nav_config.storage.clone(),
    );
    let flyout = SubSidebar::new(
        view,
        store,
        read_subpages(window, nav_config),
        current_path,
        desktop,
    );
    let handle = FlyoutHandle {
        flyout: Rc::new(RefCell::new(flyout)),
        timer: Rc::new(RefCell::new(None)),
        delay_ms: u32::try_from(nav_config.sub_sidebar.close_delay().as_millis())
            .unwrap_or(u32::MAX),
    };

    for link in main_links {
        let key = link.get_attribute("data-subpages");
        {
            let handle = handle.clone();
            let key = key.clone();
            listen(&link, "mouseenter", move |_: Event| {
                let ticket = handle.flyout.borrow_mut().hover_link(key.as_deref());
                handle.after(ticket);
            });
        }
        let handle = handle.clone();
        listen(&link, "click", move |_: Event| {
            handle.flyout.borrow_mut().click_link(key.as_deref());
            handle.after(None);
        });
    }

    {
        let handle = handle.clone();
        listen(&panel, "mouseenter", move |_: Event| {
            handle.flyout.borrow_mut().enter_flyout();
            handle.after(None);
        });
    }
    {
        // Delegated: flyout links are re-rendered on every populate
        let handle = handle.clone();
        listen(&panel, "click", move |e: Event| {
            let on_link = e
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("a").ok().flatten())
                .is_some();
            if on_link {
                handle.flyout.borrow_mut().click_link(None);
                handle.after(None);
            }
        });
    }
    {
        let handle = handle.clone();
        let panel = panel.clone();
        listen(document, "mouseover", move |e: Event| {
            let target = e.target().and_then(|t| t.dyn_into::<Node>().ok());
            let within = |container: Option<&Element>| {
                container.is_some_and(|c| c.contains(target.as_ref()))
            };
            let region = if within(main_sidebar.as_ref()) {
                PointerRegion::MainNav
            } else if within(Some(&panel)) {
                PointerRegion::Flyout
            } else {
                PointerRegion::Elsewhere
            };
            let ticket = handle.flyout.borrow_mut().pointer_moved(region);
            handle.after(ticket);
        });
    }
    if let Some(pin) = pin {
        let handle = handle.clone();
        listen(&pin, "click", move |_: Event| {
            handle.flyout.borrow_mut().toggle_pin();
            handle.after(None);
        });
    }
    if let Some(query) = query {
        listen(&query, "change", move |e: MediaQueryListEvent| {
            handle.flyout.borrow_mut().viewport_changed(e.matches());
            handle.after(None);
        });
    }
}
