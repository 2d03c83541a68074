//! Page-level wiring.
//!
//! [`Page::ready`] plays the role of the `DOMContentLoaded` handler: it
//! attaches each component to the elements it finds and records one
//! listener per (event, element, behavior), in the order the components are
//! wired. [`Page::dispatch`] then delivers events the way the DOM does:
//! `click`, `input` and `submit` bubble from the target to the root,
//! `blur` stays on the target, and at each element listeners run in
//! registration order.
//!
//! Components share no state. The only cross-component interaction is that
//! a nav link click both scrolls (Scroll Navigator) and closes the menu
//! (Mobile Nav Toggle).

use crate::config::{ConfigError, SiteConfig};
use crate::contact::{ContactForm, Field, SubmitOutcome};
use crate::dom::Dom;
use crate::nav::NavMenu;
use crate::reveal::RevealAnimator;
use crate::scroll::{ScrollNavigator, follow_fragment_link};
use crate::spy::ScrollSpy;
use crate::viewport::{IntersectionEntry, ObserverId, Viewport};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

/// DOM event types the page listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Click,
    Blur,
    Input,
    Submit,
}

impl EventKind {
    pub fn bubbles(self) -> bool {
        !matches!(self, EventKind::Blur)
    }

    /// The DOM event type name.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Blur => "blur",
            EventKind::Input => "input",
            EventKind::Submit => "submit",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    ScrollTrigger,
    FieldBlur(Field),
    FieldInput,
    FormSubmit,
    NavToggle,
    NavLink,
}

#[derive(Debug, Clone)]
struct Listener<N> {
    kind: EventKind,
    node: N,
    handler: Handler,
}

/// What dispatching one event did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// The browser's default action must not run.
    pub default_prevented: bool,
    /// Number of listeners that ran.
    pub handled: usize,
    /// Set when the event was a contact form submit.
    pub submit: Option<SubmitOutcome>,
}

/// The interactive page: a document, a viewport, and the five components.
pub struct Page<D: Dom, V> {
    dom: D,
    viewport: V,
    listeners: Vec<Listener<D::Node>>,
    scroll: Option<ScrollNavigator<D::Node>>,
    contact: Option<ContactForm<D::Node>>,
    nav: Option<NavMenu<D::Node>>,
    spy: Option<ScrollSpy<D::Node>>,
    reveal: RevealAnimator<D::Node>,
}

impl<D: Dom, V> fmt::Debug for Page<D, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("listeners", &self.listeners.len())
            .field("scroll", &self.scroll.is_some())
            .field("contact", &self.contact.is_some())
            .field("nav", &self.nav.is_some())
            .field("spy", &self.spy.is_some())
            .field("reveal", &self.reveal.elements().len())
            .finish()
    }
}

impl<D, V> Page<D, V>
where
    D: Dom,
    V: Viewport<D::Node>,
{
    /// Wire every component whose elements are present.
    ///
    /// Fails only if the configuration holds an unparsable selector; missing
    /// elements silently disable the behavior that needs them.
    pub fn ready(mut dom: D, mut viewport: V, config: &SiteConfig) -> Result<Self, ConfigError> {
        let selectors = config.selectors.parsed()?;
        let mut listeners = Vec::new();

        let scroll = ScrollNavigator::attach(&dom, &config.selectors.view_projects, &config.selectors.projects);
        if let Some(s) = &scroll {
            listeners.push(Listener {
                kind: EventKind::Click,
                node: s.trigger().clone(),
                handler: Handler::ScrollTrigger,
            });
        }

        let contact = ContactForm::attach(&dom, config);
        if let Some(form) = &contact {
            for (field, input) in form.fields().iter() {
                listeners.push(Listener {
                    kind: EventKind::Blur,
                    node: input.clone(),
                    handler: Handler::FieldBlur(field),
                });
                listeners.push(Listener {
                    kind: EventKind::Input,
                    node: input.clone(),
                    handler: Handler::FieldInput,
                });
            }
            listeners.push(Listener {
                kind: EventKind::Submit,
                node: form.form().clone(),
                handler: Handler::FormSubmit,
            });
        }

        let toggle = dom.query_all(&selectors.nav_toggle).into_iter().next();
        let links = dom.query_all(&selectors.nav_links);
        let nav = NavMenu::attach(&dom, toggle, links.clone(), &config.classes.nav_open);
        if let Some(nav) = &nav {
            if let Some(toggle) = nav.toggle_control() {
                listeners.push(Listener {
                    kind: EventKind::Click,
                    node: toggle.clone(),
                    handler: Handler::NavToggle,
                });
            }
            for link in nav.links() {
                listeners.push(Listener {
                    kind: EventKind::Click,
                    node: link.clone(),
                    handler: Handler::NavLink,
                });
            }
        }

        let sections = dom.query_all(&selectors.sections);
        let spy = ScrollSpy::attach(
            &dom,
            &mut viewport,
            sections,
            links,
            config.spy.threshold,
            &config.classes.active,
        );

        let revealable = dom.query_all(&selectors.reveal);
        let reveal = RevealAnimator::attach(
            &mut dom,
            &mut viewport,
            revealable,
            config.reveal.threshold,
            &config.classes.revealed,
        );

        let page = Self {
            dom,
            viewport,
            listeners,
            scroll,
            contact,
            nav,
            spy,
            reveal,
        };
        debug!(?page, "page ready");
        Ok(page)
    }

    /// Deliver an event whose target is `target`.
    pub fn dispatch(&mut self, kind: EventKind, target: &D::Node) -> EventOutcome {
        let path = if kind.bubbles() {
            self.dom.ancestors_inclusive(target)
        } else {
            vec![target.clone()]
        };

        let mut outcome = EventOutcome::default();
        for node in &path {
            let handlers: Vec<Handler> = self
                .listeners
                .iter()
                .filter(|l| l.kind == kind && l.node == *node)
                .map(|l| l.handler)
                .collect();
            for handler in handlers {
                trace!(%kind, ?node, ?handler, "dispatch");
                self.run(handler, node, &mut outcome);
                outcome.handled += 1;
            }
        }
        outcome
    }

    fn run(&mut self, handler: Handler, node: &D::Node, outcome: &mut EventOutcome) {
        match handler {
            Handler::ScrollTrigger => {
                if let Some(scroll) = &self.scroll {
                    scroll.activate(&mut self.viewport);
                }
            }
            Handler::FieldBlur(field) => {
                if let Some(form) = &mut self.contact {
                    form.on_blur(&mut self.dom, field);
                }
            }
            Handler::FieldInput => {
                if let Some(form) = &mut self.contact {
                    form.on_input(&mut self.dom);
                }
            }
            Handler::FormSubmit => {
                outcome.default_prevented = true;
                if let Some(form) = &mut self.contact {
                    outcome.submit = Some(form.on_submit(&mut self.dom));
                }
            }
            Handler::NavToggle => {
                if let Some(nav) = &mut self.nav {
                    nav.toggle(&mut self.dom);
                }
            }
            Handler::NavLink => {
                if follow_fragment_link(&self.dom, &mut self.viewport, node) {
                    outcome.default_prevented = true;
                }
                if let Some(nav) = &mut self.nav {
                    nav.close_after_navigation(&mut self.dom);
                }
            }
        }
    }

    /// Deliver an intersection batch from `observer`.
    pub fn notify(&mut self, observer: ObserverId, entries: &[IntersectionEntry<D::Node>]) {
        if let Some(spy) = &mut self.spy
            && spy.observer() == observer
        {
            spy.on_intersections(&mut self.dom, entries);
            return;
        }
        if self.reveal.observer() == Some(observer) {
            self.reveal.on_intersections(&mut self.dom, &mut self.viewport, entries);
            return;
        }
        debug!(%observer, "notification for unknown observer dropped");
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|l| l.kind == kind).count()
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn scroll(&self) -> Option<&ScrollNavigator<D::Node>> {
        self.scroll.as_ref()
    }

    pub fn contact(&self) -> Option<&ContactForm<D::Node>> {
        self.contact.as_ref()
    }

    pub fn nav(&self) -> Option<&NavMenu<D::Node>> {
        self.nav.as_ref()
    }

    pub fn spy(&self) -> Option<&ScrollSpy<D::Node>> {
        self.spy.as_ref()
    }

    pub fn reveal(&self) -> &RevealAnimator<D::Node> {
        &self.reveal
    }
}
