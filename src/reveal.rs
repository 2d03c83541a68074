//! One-shot reveal animations.
//!
//! Every revealable element starts `Pending`. The first time it is reported
//! intersecting it becomes `Visible`, gets the `reveal-visible` class and is
//! no longer observed. `Visible` is terminal.
//!
//! When the host cannot observe intersections every element is revealed
//! immediately so no content stays hidden.

use crate::dom::Dom;
use crate::viewport::{IntersectionEntry, ObserverId, Viewport};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealState {
    Pending,
    Visible,
}

#[derive(Debug, Clone)]
pub struct RevealAnimator<N> {
    observer: Option<ObserverId>,
    elements: Vec<(N, RevealState)>,
    revealed_class: String,
}

impl<N: Clone + PartialEq + std::fmt::Debug> RevealAnimator<N> {
    pub fn attach<D, V>(
        dom: &mut D,
        viewport: &mut V,
        elements: Vec<N>,
        threshold: f64,
        revealed_class: &str,
    ) -> Self
    where
        D: Dom<Node = N>,
        V: Viewport<N>,
    {
        let mut animator = Self {
            observer: None,
            elements: elements.into_iter().map(|n| (n, RevealState::Pending)).collect(),
            revealed_class: revealed_class.to_string(),
        };
        if animator.elements.is_empty() {
            return animator;
        }

        match viewport.create_observer(threshold) {
            Some(observer) => {
                for (element, _) in &animator.elements {
                    viewport.observe(observer, element);
                }
                animator.observer = Some(observer);
                debug!(elements = animator.elements.len(), "reveal observing");
            }
            None => {
                for (element, state) in &mut animator.elements {
                    dom.add_class(element, &animator.revealed_class);
                    *state = RevealState::Visible;
                }
                debug!(elements = animator.elements.len(), "no intersection support, revealed all");
            }
        }
        animator
    }

    pub fn observer(&self) -> Option<ObserverId> {
        self.observer
    }

    pub fn state(&self, element: &N) -> Option<RevealState> {
        self.elements
            .iter()
            .find(|(n, _)| n == element)
            .map(|(_, s)| *s)
    }

    pub fn elements(&self) -> &[(N, RevealState)] {
        &self.elements
    }

    pub fn pending(&self) -> usize {
        self.elements
            .iter()
            .filter(|(_, s)| *s == RevealState::Pending)
            .count()
    }

    pub fn on_intersections<D, V>(&mut self, dom: &mut D, viewport: &mut V, entries: &[IntersectionEntry<N>])
    where
        D: Dom<Node = N>,
        V: Viewport<N>,
    {
        let Some(observer) = self.observer else {
            return;
        };
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            let Some((element, state)) = self.elements.iter_mut().find(|(n, _)| *n == entry.target) else {
                continue;
            };
            if *state == RevealState::Visible {
                continue;
            }
            dom.add_class(element, &self.revealed_class);
            viewport.unobserve(observer, element);
            *state = RevealState::Visible;
            debug!(?element, "revealed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, El, NodeId};
    use crate::viewport::SimulatedViewport;

    fn doc_with_cards(n: usize) -> (Document, Vec<NodeId>) {
        let mut doc = Document::new();
        let body = doc.body_id();
        let cards = (0..n)
            .map(|_| doc.append(body, El::new("article").class("reveal")))
            .collect();
        (doc, cards)
    }

    #[test]
    fn observes_each_element() {
        let (mut doc, cards) = doc_with_cards(2);
        let mut vp = SimulatedViewport::new();
        let anim = RevealAnimator::attach(&mut doc, &mut vp, cards.clone(), 0.2, "reveal-visible");
        assert_eq!(vp.observed(anim.observer().unwrap()), cards.as_slice());
        assert_eq!(anim.pending(), 2);
    }

    #[test]
    fn intersecting_element_is_revealed_and_unobserved() {
        let (mut doc, cards) = doc_with_cards(2);
        let mut vp = SimulatedViewport::new();
        let mut anim = RevealAnimator::attach(&mut doc, &mut vp, cards.clone(), 0.2, "reveal-visible");
        let observer = anim.observer().unwrap();

        let entry = IntersectionEntry { target: cards[0], is_intersecting: true, ratio: 0.3 };
        anim.on_intersections(&mut doc, &mut vp, &[entry]);

        assert!(doc.has_class(&cards[0], "reveal-visible"));
        assert!(!doc.has_class(&cards[1], "reveal-visible"));
        assert!(!vp.is_observing(observer, &cards[0]));
        assert!(vp.is_observing(observer, &cards[1]));
        assert_eq!(anim.state(&cards[0]), Some(RevealState::Visible));
    }

    #[test]
    fn visible_is_terminal() {
        let (mut doc, cards) = doc_with_cards(1);
        let mut vp = SimulatedViewport::new();
        let mut anim = RevealAnimator::attach(&mut doc, &mut vp, cards.clone(), 0.2, "reveal-visible");
        let shown = IntersectionEntry { target: cards[0], is_intersecting: true, ratio: 0.5 };
        let hidden = IntersectionEntry { target: cards[0], is_intersecting: false, ratio: 0.0 };

        anim.on_intersections(&mut doc, &mut vp, &[shown]);
        anim.on_intersections(&mut doc, &mut vp, &[hidden]);

        assert!(doc.has_class(&cards[0], "reveal-visible"));
        assert_eq!(anim.state(&cards[0]), Some(RevealState::Visible));
    }

    #[test]
    fn non_intersecting_entry_keeps_pending() {
        let (mut doc, cards) = doc_with_cards(1);
        let mut vp = SimulatedViewport::new();
        let mut anim = RevealAnimator::attach(&mut doc, &mut vp, cards.clone(), 0.2, "reveal-visible");
        let entry = IntersectionEntry { target: cards[0], is_intersecting: false, ratio: 0.1 };
        anim.on_intersections(&mut doc, &mut vp, &[entry]);
        assert_eq!(anim.state(&cards[0]), Some(RevealState::Pending));
    }

    #[test]
    fn fallback_reveals_everything_immediately() {
        let (mut doc, cards) = doc_with_cards(3);
        let mut vp = SimulatedViewport::without_intersection();
        let anim = RevealAnimator::attach(&mut doc, &mut vp, cards.clone(), 0.2, "reveal-visible");
        assert_eq!(anim.observer(), None);
        assert_eq!(anim.pending(), 0);
        for card in &cards {
            assert!(doc.has_class(card, "reveal-visible"));
        }
    }

    #[test]
    fn no_elements_creates_no_observer() {
        let (mut doc, _) = doc_with_cards(0);
        let mut vp = SimulatedViewport::new();
        let anim = RevealAnimator::attach(&mut doc, &mut vp, vec![], 0.2, "reveal-visible");
        assert_eq!(anim.observer(), None);
        assert_eq!(vp.observer_count(), 0);
    }
}
