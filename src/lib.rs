//! # Showcase
//!
//! Interactive behavior for a one-page portfolio site, plus the tooling to
//! render that page and exercise it headlessly.
//!
//! The page carries five independent behaviors:
//!
//! - **Scroll navigation**: the hero's call to action and every in-page nav
//!   link scroll smoothly to their target section.
//! - **Contact form**: required fields and an email shape check, validated
//!   on blur and on submit, with a status banner and simulated delivery.
//! - **Mobile nav**: a toggle that opens and closes the menu on small
//!   screens and closes it again after a link is followed.
//! - **Scroll-spy**: the nav link of the section in view is marked active.
//! - **Reveal**: elements fade in the first time they scroll into view.
//!
//! # Architecture: Hosts
//!
//! Behavior never touches a concrete document. Components are written
//! against two capabilities, and each host supplies both:
//!
//! ```text
//!               Page (scroll, contact, nav, spy, reveal)
//!                 │                          │
//!             Dom trait                Viewport trait
//!                 │                          │
//! headless    dom::Document            SimulatedViewport      tests, `simulate`
//! browser     web::WebDom              web::BrowserViewport   feature `web`
//! ```
//!
//! The same [`page::Page`] wiring runs in both, so what the tests and the
//! `simulate` command observe is what ships to the browser.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`selector`] | The CSS selector subset used for element lookups |
//! | [`dom`] | The `Dom` trait and the in-memory `Document` |
//! | [`viewport`] | Smooth scrolling and intersection observation; `SimulatedViewport` |
//! | [`scroll`] | Smooth scroll to the projects section and to fragment links |
//! | [`contact`] | Contact form validation and simulated submission |
//! | [`nav`] | Mobile nav toggle |
//! | [`spy`] | Scroll-spy active link highlighting |
//! | [`reveal`] | One-shot reveal on scroll |
//! | [`page`] | Wires the components, dispatches events, routes notifications |
//! | [`config`] | `config.toml` loading, validation, and merging |
//! | [`content`] | `page.toml` loading and validation |
//! | [`generate`] | Renders `index.html` with Maud and builds its headless twin |
//! | [`simulate`] | Replays scripted visitor actions against the headless page |
//! | [`output`] | CLI output formatting |
//! | `web` | Browser host over `web-sys` (feature `web`) |
//!
//! # Design Decisions
//!
//! ## State Lives in Rust
//!
//! Every DOM-visible state class is mirrored by a field on its component:
//! the banner state, whether the menu is open, the active link, and each
//! element's reveal state. The DOM is written from that state, never read
//! back, except once at wiring time for the menu's initial class.
//!
//! ## Missing Elements Disable, Never Fail
//!
//! A page without a contact form, or without intersection support, simply
//! runs without that behavior. Only configuration errors are errors.
//! `showcase check` reports contract lookups that would come up empty.

pub mod config;
pub mod contact;
pub mod content;
pub mod dom;
pub mod generate;
pub mod nav;
pub mod output;
pub mod page;
pub mod reveal;
pub mod scroll;
pub mod selector;
pub mod simulate;
pub mod spy;
pub mod viewport;
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;
