//! Viewport capabilities: smooth scrolling and visibility observation.
//!
//! The browser offers both through `Element.scrollIntoView` and
//! `IntersectionObserver`. Components receive them through [`Viewport`] so
//! the behavior can be driven by [`SimulatedViewport`] in tests and in the
//! `simulate` command, where "scrolling" is a list of reported visibility
//! ratios.
//!
//! ## Observation Model
//!
//! A component asks for an observer with a threshold, registers targets on
//! it, and later receives batches of [`IntersectionEntry`] through
//! [`Page::notify`](crate::page::Page::notify). A host without an
//! intersection mechanism returns `None` from [`Viewport::create_observer`];
//! components fall back accordingly.

use std::fmt;

/// Identifies an observer created by a [`Viewport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub usize);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer#{}", self.0)
    }
}

/// One visibility notification for one observed element.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry<N> {
    pub target: N,
    /// Whether the target is at or above the observer's threshold.
    pub is_intersecting: bool,
    /// Visible fraction of the target, `0.0..=1.0`.
    pub ratio: f64,
}

/// Host capability for scrolling and visibility observation.
pub trait Viewport<N> {
    /// Create an observer that notifies when a target's visible ratio
    /// crosses `threshold`. `None` when the host has no intersection
    /// mechanism.
    fn create_observer(&mut self, threshold: f64) -> Option<ObserverId>;
    fn observe(&mut self, observer: ObserverId, target: &N);
    fn unobserve(&mut self, observer: ObserverId, target: &N);
    /// Smoothly scroll so the top of `target` aligns with the top of the
    /// viewport.
    fn scroll_into_view(&mut self, target: &N);
}

#[derive(Debug, Clone)]
struct SimulatedObserver<N> {
    threshold: f64,
    targets: Vec<N>,
}

/// In-memory viewport.
///
/// Scroll requests are recorded; visibility is driven explicitly with
/// [`SimulatedViewport::set_visibility`], which yields the notification
/// batches a browser would deliver.
#[derive(Debug, Clone)]
pub struct SimulatedViewport<N> {
    intersection_supported: bool,
    observers: Vec<SimulatedObserver<N>>,
    ratios: Vec<(N, f64)>,
    scrolls: Vec<N>,
}

impl<N> Default for SimulatedViewport<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> SimulatedViewport<N> {
    pub fn new() -> Self {
        Self {
            intersection_supported: true,
            observers: Vec::new(),
            ratios: Vec::new(),
            scrolls: Vec::new(),
        }
    }

    /// A viewport whose host lacks an intersection mechanism.
    pub fn without_intersection() -> Self {
        Self {
            intersection_supported: false,
            ..Self::new()
        }
    }

    /// Targets scrolled to, oldest first.
    pub fn scrolls(&self) -> &[N] {
        &self.scrolls
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn observed(&self, observer: ObserverId) -> &[N] {
        self.observers
            .get(observer.0)
            .map(|o| o.targets.as_slice())
            .unwrap_or_default()
    }
}

impl<N: Clone + PartialEq> SimulatedViewport<N> {
    pub fn is_observing(&self, observer: ObserverId, target: &N) -> bool {
        self.observed(observer).contains(target)
    }

    fn ratio_of(&self, target: &N) -> f64 {
        self.ratios
            .iter()
            .find(|(n, _)| n == target)
            .map_or(0.0, |(_, r)| *r)
    }

    /// Report new visible ratios and collect the resulting notifications.
    ///
    /// Each observer receives one batch holding an entry for every observed
    /// target whose ratio crossed the observer's threshold, in the order the
    /// changes were given. A target listed more than once takes its last
    /// ratio, at the position of its first mention. Observers with nothing
    /// to report are omitted.
    pub fn set_visibility(
        &mut self,
        changes: &[(N, f64)],
    ) -> Vec<(ObserverId, Vec<IntersectionEntry<N>>)> {
        let mut collapsed: Vec<(N, f64)> = Vec::with_capacity(changes.len());
        for (target, ratio) in changes {
            let ratio = ratio.clamp(0.0, 1.0);
            match collapsed.iter_mut().find(|(n, _)| n == target) {
                Some(slot) => slot.1 = ratio,
                None => collapsed.push((target.clone(), ratio)),
            }
        }
        let changes = collapsed;

        let previous: Vec<f64> = changes.iter().map(|(n, _)| self.ratio_of(n)).collect();
        for (target, ratio) in &changes {
            match self.ratios.iter_mut().find(|(n, _)| n == target) {
                Some(slot) => slot.1 = *ratio,
                None => self.ratios.push((target.clone(), *ratio)),
            }
        }

        let mut batches = Vec::new();
        for (index, observer) in self.observers.iter().enumerate() {
            let entries: Vec<_> = changes
                .iter()
                .zip(&previous)
                .filter(|((target, _), _)| observer.targets.contains(target))
                .filter_map(|((target, ratio), before)| {
                    let ratio = *ratio;
                    let was = *before >= observer.threshold && *before > 0.0;
                    let now = ratio >= observer.threshold && ratio > 0.0;
                    (was != now).then(|| IntersectionEntry {
                        target: target.clone(),
                        is_intersecting: now,
                        ratio,
                    })
                })
                .collect();
            if !entries.is_empty() {
                batches.push((ObserverId(index), entries));
            }
        }
        batches
    }
}

impl<N: Clone + PartialEq> Viewport<N> for SimulatedViewport<N> {
    fn create_observer(&mut self, threshold: f64) -> Option<ObserverId> {
        if !self.intersection_supported {
            return None;
        }
        self.observers.push(SimulatedObserver {
            threshold,
            targets: Vec::new(),
        });
        Some(ObserverId(self.observers.len() - 1))
    }

    fn observe(&mut self, observer: ObserverId, target: &N) {
        if let Some(o) = self.observers.get_mut(observer.0)
            && !o.targets.contains(target)
        {
            o.targets.push(target.clone());
        }
    }

    fn unobserve(&mut self, observer: ObserverId, target: &N) {
        if let Some(o) = self.observers.get_mut(observer.0) {
            o.targets.retain(|t| t != target);
        }
    }

    fn scroll_into_view(&mut self, target: &N) {
        self.scrolls.push(target.clone());
    }
}
