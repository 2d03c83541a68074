//! Smooth scrolling to in-page targets.

use crate::dom::Dom;
use crate::viewport::Viewport;
use tracing::debug;

/// The "view projects" trigger and the section it scrolls to.
#[derive(Debug, Clone)]
pub struct ScrollNavigator<N> {
    trigger: N,
    target: N,
}

impl<N: Clone> ScrollNavigator<N> {
    /// Wired only when both the trigger and the target exist.
    pub fn attach<D: Dom<Node = N>>(dom: &D, trigger_id: &str, target_id: &str) -> Option<Self> {
        Some(Self {
            trigger: dom.element_by_id(trigger_id)?,
            target: dom.element_by_id(target_id)?,
        })
    }

    pub fn trigger(&self) -> &N {
        &self.trigger
    }

    pub fn target(&self) -> &N {
        &self.target
    }

    pub fn activate<V: Viewport<N>>(&self, viewport: &mut V) {
        viewport.scroll_into_view(&self.target);
    }
}

/// The element an in-page link points at: `href` must be `#` followed by
/// the id of an existing element.
pub fn fragment_target<D: Dom>(dom: &D, link: &D::Node) -> Option<D::Node> {
    let href = dom.attribute(link, "href")?;
    let id = href.strip_prefix('#')?;
    dom.element_by_id(id)
}

/// Smooth-scroll to the target of an in-page link.
///
/// Returns `true` when a scroll was performed, in which case the browser's
/// own jump to the anchor must be suppressed. Links to other pages and
/// fragments naming no element are left alone.
pub fn follow_fragment_link<D, V>(dom: &D, viewport: &mut V, link: &D::Node) -> bool
where
    D: Dom,
    V: Viewport<D::Node>,
{
    match fragment_target(dom, link) {
        Some(target) => {
            debug!(?target, "smooth scroll to fragment");
            viewport.scroll_into_view(&target);
            true
        }
        None => false,
    }
}
