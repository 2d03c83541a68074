//! Browser host.
//!
//! Implements [`Dom`] over `web_sys::Document` and [`Viewport`] over
//! `Element.scrollIntoView` and `IntersectionObserver`, then wires the same
//! [`Page`] the headless host uses. Built with `--features web` for
//! `wasm32-unknown-unknown`; the rendered page loads the bundle when
//! `[page] script` is set.
//!
//! Events are delegated: one document-level listener per event type hands
//! the event target to [`Page::dispatch`], which walks the ancestor chain
//! itself. `blur` does not bubble, so its listener sits in the capture
//! phase.

use crate::config::SiteConfig;
use crate::dom::Dom;
use crate::generate::{BEHAVIOR_ATTRIBUTE, CONFIG_SCRIPT_ID};
use crate::page::{EventKind, Page};
use crate::selector::Selector;
use crate::viewport::{IntersectionEntry, ObserverId, Viewport};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, HtmlFormElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, NodeList,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

/// [`Dom`] over the live document.
pub struct WebDom {
    document: web_sys::Document,
}

impl WebDom {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }
}

fn elements(list: Result<NodeList, JsValue>) -> Vec<Element> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

impl Dom for WebDom {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        if id.is_empty() {
            return None;
        }
        self.document.get_element_by_id(id)
    }

    fn query_all(&self, selector: &Selector) -> Vec<Element> {
        elements(self.document.query_selector_all(&selector.to_string()))
    }

    fn query_within(&self, root: &Element, selector: &Selector) -> Vec<Element> {
        elements(root.query_selector_all(&selector.to_string()))
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn remove_attribute(&mut self, node: &Element, name: &str) {
        let _ = node.remove_attribute(name);
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn value(&self, node: &Element) -> String {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(textarea) = node.dyn_ref::<HtmlTextAreaElement>() {
            textarea.value()
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            String::new()
        }
    }

    fn reset_form(&mut self, form: &Element) {
        if let Some(form) = form.dyn_ref::<HtmlFormElement>() {
            form.reset();
        }
    }
}

type Notify = Box<dyn Fn(ObserverId, Vec<IntersectionEntry<Element>>)>;

/// Where observer callbacks deliver their batches. Filled once the page
/// exists; callbacks never fire synchronously, so it is set in time.
type NotifySlot = Rc<RefCell<Option<Notify>>>;

/// [`Viewport`] over the window.
pub struct BrowserViewport {
    supported: bool,
    observers: Vec<IntersectionObserver>,
    notify: NotifySlot,
}

impl BrowserViewport {
    fn new(window: &web_sys::Window, notify: NotifySlot) -> Self {
        let supported = js_sys::Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false);
        Self {
            supported,
            observers: Vec::new(),
            notify,
        }
    }
}

impl Viewport<Element> for BrowserViewport {
    fn create_observer(&mut self, threshold: f64) -> Option<ObserverId> {
        if !self.supported {
            return None;
        }
        let id = ObserverId(self.observers.len());
        let notify = Rc::clone(&self.notify);
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _: IntersectionObserver| {
                let batch: Vec<_> = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| {
                        let ratio = entry.intersection_ratio();
                        IntersectionEntry {
                            target: entry.target(),
                            // Browsers report edge contact as intersecting.
                            is_intersecting: entry.is_intersecting() && ratio >= threshold,
                            ratio,
                        }
                    })
                    .collect();
                if let Some(notify) = notify.borrow().as_ref() {
                    notify(id, batch);
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options).ok()?;
        callback.forget();
        self.observers.push(observer);
        Some(id)
    }

    fn observe(&mut self, observer: ObserverId, target: &Element) {
        if let Some(o) = self.observers.get(observer.0) {
            o.observe(target);
        }
    }

    fn unobserve(&mut self, observer: ObserverId, target: &Element) {
        if let Some(o) = self.observers.get(observer.0) {
            o.unobserve(target);
        }
    }

    fn scroll_into_view(&mut self, target: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        target.scroll_into_view_with_scroll_into_view_options(&options);
    }
}

pub type WebPage = Page<WebDom, BrowserViewport>;

/// The behavior config embedded by `render`, or the defaults.
fn embedded_config(document: &web_sys::Document) -> Result<SiteConfig, JsValue> {
    let Some(json) = document
        .get_element_by_id(CONFIG_SCRIPT_ID)
        .and_then(|script| script.text_content())
    else {
        return Ok(SiteConfig::default());
    };
    let config: SiteConfig = serde_json::from_str(&json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    config.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(config)
}

/// Wire the page. Runs when the module loads; module scripts execute after
/// the document is parsed, so every element is already present.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let config = embedded_config(&document)?;

    let notify: NotifySlot = Rc::new(RefCell::new(None));
    let viewport = BrowserViewport::new(&window, Rc::clone(&notify));
    let page = Page::ready(WebDom::new(document.clone()), viewport, &config)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let page = Rc::new(RefCell::new(page));

    let weak: Weak<RefCell<WebPage>> = Rc::downgrade(&page);
    *notify.borrow_mut() = Some(Box::new(move |observer, entries| {
        if let Some(page) = weak.upgrade() {
            page.borrow_mut().notify(observer, &entries);
        }
    }));

    for kind in [EventKind::Click, EventKind::Blur, EventKind::Input, EventKind::Submit] {
        let page = Rc::clone(&page);
        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let outcome = page.borrow_mut().dispatch(kind, &target);
            if outcome.default_prevented {
                event.prevent_default();
            }
        });
        document.add_event_listener_with_callback_and_bool(
            kind.as_str(),
            listener.as_ref().unchecked_ref(),
            !kind.bubbles(),
        )?;
        listener.forget();
    }

    if let Some(root) = document.document_element() {
        root.set_attribute(BEHAVIOR_ATTRIBUTE, "ready")?;
    }
    Ok(())
}
