//! # site-nav
//!
//! Navigation chrome for a small static documentation site: a collapsible
//! left drawer for narrow viewports, a hover-driven sub-sidebar flyout for
//! desktop, and the front-matter schema of the page collection that feeds
//! them.
//!
//! # Architecture: Pure State Machines, Thin Bindings
//!
//! ```text
//! content/*.md ──▶ schema ──▶ collection ──▶ __SUBPAGES__ JSON      (build time, CLI)
//!
//! DOM events ──▶ web ──▶ drawer / flyout ──▶ DrawerView / FlyoutView  (run time, wasm)
//!                              │
//!                              └──▶ storage (session + local)
//! ```
//!
//! The drawer and flyout never touch the DOM. They receive events as method
//! calls and push their results through small view traits, so every
//! transition is tested natively with recording views and in-memory storage.
//! The `web` module (feature `web`) is the only code that knows about
//! `web-sys`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`schema`] | Page front matter: shape, defaults, validation |
//! | [`collection`] | Walks the content directory and builds the sub-page lookup |
//! | [`subpages`] | Lookup parsing, entry resolution, active matching, link-list HTML |
//! | [`paths`] | Trailing-slash normalization and `NNN-slug` filename parsing |
//! | [`storage`] | Storage trait and the typed section-key / pin-flag store |
//! | [`drawer`] | Left drawer state machine |
//! | [`flyout`] | Sub-sidebar state machine with debounce tickets |
//! | [`config`] | `nav.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Debounce As Tickets
//!
//! The only timer in the system guards the flyout's hover-away close. Rather
//! than owning a timer, the flyout hands out a [`flyout::CloseTicket`] and
//! the host reports it back when its timer fires. A newer ticket or any
//! cancel makes older ones inert, so tests drive time by hand and the
//! browser binding can use a plain `setTimeout`.
//!
//! ## Maud For The Link List
//!
//! The flyout's `<li>` items are rendered with [Maud](https://maud.lambda.xyz/)
//! both in the CLI (`site-nav render`) and in the browser, so the markup is
//! identical and auto-escaped in both places.

pub mod collection;
pub mod config;
pub mod drawer;
pub mod flyout;
pub mod output;
pub mod paths;
pub mod schema;
pub mod storage;
pub mod subpages;
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;
