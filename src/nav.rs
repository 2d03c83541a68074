//! Mobile navigation menu.
//!
//! The open/closed state lives in `open` and is mirrored to the page as the
//! `nav-open` class on `<body>` and `aria-expanded` on the toggle.

use crate::dom::Dom;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct NavMenu<N> {
    body: N,
    toggle: Option<N>,
    links: Vec<N>,
    open_class: String,
    open: bool,
}

impl<N: Clone + PartialEq> NavMenu<N> {
    /// `None` only when the document has no body. Links are tracked even
    /// without a toggle so following one still closes the menu.
    pub fn attach<D: Dom<Node = N>>(
        dom: &D,
        toggle: Option<N>,
        links: Vec<N>,
        open_class: &str,
    ) -> Option<Self> {
        let body = dom.body()?;
        let open = dom.has_class(&body, open_class);
        Some(Self {
            body,
            toggle,
            links,
            open_class: open_class.to_string(),
            open,
        })
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle_control(&self) -> Option<&N> {
        self.toggle.as_ref()
    }

    pub fn links(&self) -> &[N] {
        &self.links
    }

    pub fn is_link(&self, node: &N) -> bool {
        self.links.contains(node)
    }

    /// Toggle handler: flip the menu and report the new state.
    pub fn toggle<D: Dom<Node = N>>(&mut self, dom: &mut D) -> bool {
        self.set_open(dom, !self.open);
        debug!(open = self.open, "nav toggled");
        self.open
    }

    /// Link handler: close the menu if it is open.
    pub fn close_after_navigation<D: Dom<Node = N>>(&mut self, dom: &mut D) {
        if self.open {
            self.set_open(dom, false);
            debug!("nav closed after navigation");
        }
    }

    fn set_open<D: Dom<Node = N>>(&mut self, dom: &mut D, open: bool) {
        self.open = open;
        if open {
            dom.add_class(&self.body, &self.open_class);
        } else {
            dom.remove_class(&self.body, &self.open_class);
        }
        if let Some(toggle) = &self.toggle {
            dom.set_attribute(toggle, "aria-expanded", if open { "true" } else { "false" });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, El, NodeId};

    fn menu(doc: &mut Document) -> (NavMenu<NodeId>, NodeId) {
        let toggle = doc.append(
            doc.body_id(),
            El::new("button").class("nav-toggle").attr("aria-expanded", "false"),
        );
        let link = doc.append(doc.body_id(), El::new("a").attr("href", "#about"));
        let nav = NavMenu::attach(doc, Some(toggle), vec![link], "nav-open").unwrap();
        (nav, toggle)
    }

    #[test]
    fn toggle_opens_and_sets_expanded() {
        let mut doc = Document::new();
        let (mut nav, toggle) = menu(&mut doc);
        assert!(nav.toggle(&mut doc));
        assert!(doc.has_class(&doc.body_id(), "nav-open"));
        assert_eq!(doc.attribute(&toggle, "aria-expanded").as_deref(), Some("true"));
    }

    #[test]
    fn double_toggle_round_trips() {
        let mut doc = Document::new();
        let (mut nav, toggle) = menu(&mut doc);
        nav.toggle(&mut doc);
        assert!(!nav.toggle(&mut doc));
        assert!(!doc.has_class(&doc.body_id(), "nav-open"));
        assert_eq!(doc.attribute(&toggle, "aria-expanded").as_deref(), Some("false"));
    }

    #[test]
    fn close_after_navigation_only_when_open() {
        let mut doc = Document::new();
        let (mut nav, toggle) = menu(&mut doc);
        doc.remove_attribute(&toggle, "aria-expanded");

        nav.close_after_navigation(&mut doc);
        // Closed menu: nothing written.
        assert_eq!(doc.attribute(&toggle, "aria-expanded"), None);

        nav.toggle(&mut doc);
        nav.close_after_navigation(&mut doc);
        assert!(!nav.is_open());
        assert!(!doc.has_class(&doc.body_id(), "nav-open"));
        assert_eq!(doc.attribute(&toggle, "aria-expanded").as_deref(), Some("false"));
    }

    #[test]
    fn works_without_toggle() {
        let mut doc = Document::new();
        let body = doc.body_id();
        doc.add_class(&body, "nav-open");
        let mut nav = NavMenu::attach(&doc, None, vec![], "nav-open").unwrap();
        assert!(nav.is_open());
        nav.close_after_navigation(&mut doc);
        assert!(!doc.has_class(&body, "nav-open"));
    }
}
