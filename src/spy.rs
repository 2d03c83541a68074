//! Scroll-spy: highlight the nav link of the section in view.

use crate::dom::Dom;
use crate::viewport::{IntersectionEntry, ObserverId, Viewport};
use std::collections::HashMap;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct ScrollSpy<N> {
    observer: ObserverId,
    links: Vec<N>,
    /// Section id → the link pointing at it. Later links win.
    link_map: HashMap<String, N>,
    sections: Vec<N>,
    active_class: String,
    active: Option<N>,
}

impl<N: Clone + PartialEq + std::fmt::Debug> ScrollSpy<N> {
    /// Observe `sections` and map fragment links to them.
    ///
    /// `None` when there are no sections, no links, or the viewport cannot
    /// observe intersections.
    pub fn attach<D, V>(
        dom: &D,
        viewport: &mut V,
        sections: Vec<N>,
        links: Vec<N>,
        threshold: f64,
        active_class: &str,
    ) -> Option<Self>
    where
        D: Dom<Node = N>,
        V: Viewport<N>,
    {
        if sections.is_empty() || links.is_empty() {
            return None;
        }
        let observer = viewport.create_observer(threshold)?;

        let mut link_map = HashMap::new();
        for link in &links {
            if let Some(id) = dom.attribute(link, "href").and_then(|h| h.strip_prefix('#').map(str::to_string)) {
                link_map.insert(id, link.clone());
            }
        }
        for section in &sections {
            viewport.observe(observer, section);
        }
        debug!(sections = sections.len(), links = links.len(), "scroll-spy observing");

        Some(Self {
            observer,
            links,
            link_map,
            sections,
            active_class: active_class.to_string(),
            active: None,
        })
    }

    pub fn observer(&self) -> ObserverId {
        self.observer
    }

    pub fn sections(&self) -> &[N] {
        &self.sections
    }

    /// The link currently marked active.
    pub fn active(&self) -> Option<&N> {
        self.active.as_ref()
    }

    /// The link pointing at section `id`.
    pub fn link_for(&self, id: &str) -> Option<&N> {
        self.link_map.get(id)
    }

    /// Apply a notification batch in delivery order; the last intersecting
    /// section with a link wins.
    pub fn on_intersections<D: Dom<Node = N>>(&mut self, dom: &mut D, entries: &[IntersectionEntry<N>]) {
        for entry in entries {
            trace!(section = ?entry.target, ratio = entry.ratio, intersecting = entry.is_intersecting, "spy entry");
            if !entry.is_intersecting {
                continue;
            }
            let id = dom.id(&entry.target);
            let Some(link) = self.link_map.get(&id).cloned() else {
                continue;
            };
            self.activate(dom, link);
        }
    }

    fn activate<D: Dom<Node = N>>(&mut self, dom: &mut D, link: N) {
        for other in &self.links {
            dom.remove_class(other, &self.active_class);
            dom.remove_attribute(other, "aria-current");
        }
        dom.add_class(&link, &self.active_class);
        dom.set_attribute(&link, "aria-current", "page");
        debug!(?link, "scroll-spy active link");
        self.active = Some(link);
    }
}
