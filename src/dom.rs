//! The document boundary.
//!
//! Components never touch a concrete DOM. They go through [`Dom`], which the
//! browser host implements over `web_sys::Document` and which [`Document`]
//! implements in memory for tests, the `simulate` command, and anywhere a
//! rendering engine is not available.
//!
//! Only the operations the page behavior needs are modelled: lookup by id or
//! selector, parent traversal, attributes, classes, text content, and form
//! control values.

use crate::selector::{Selector, SelectorSubject};
use std::collections::BTreeMap;
use std::fmt;

/// Operations the interactive components perform on a document.
///
/// `Node` is a cheap handle to an element. Mutating methods take `&mut self`
/// so the in-memory host can stay a plain owned tree.
pub trait Dom {
    type Node: Clone + PartialEq + fmt::Debug;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;
    /// All matching elements in document order.
    fn query_all(&self, selector: &Selector) -> Vec<Self::Node>;
    /// Matching descendants of `root` in document order (`root` excluded).
    fn query_within(&self, root: &Self::Node, selector: &Selector) -> Vec<Self::Node>;
    fn body(&self) -> Option<Self::Node>;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);
    fn remove_attribute(&mut self, node: &Self::Node, name: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&mut self, node: &Self::Node, class: &str);
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    fn text(&self, node: &Self::Node) -> String;
    fn set_text(&mut self, node: &Self::Node, text: &str);

    /// Current value of a form control; empty for other elements.
    fn value(&self, node: &Self::Node) -> String;
    /// Restore every control inside `form` to its default (empty) value.
    fn reset_form(&mut self, form: &Self::Node);

    /// The element's `id` attribute, or an empty string.
    fn id(&self, node: &Self::Node) -> String {
        self.attribute(node, "id").unwrap_or_default()
    }

    /// `node` followed by its ancestors, innermost first.
    fn ancestors_inclusive(&self, node: &Self::Node) -> Vec<Self::Node> {
        let mut chain = vec![node.clone()];
        let mut current = self.parent(node);
        while let Some(parent) = current {
            current = self.parent(&parent);
            chain.push(parent);
        }
        chain
    }
}

/// Handle to an element of an in-memory [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// An element of the in-memory document.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    value: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    fn is_form_control(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "textarea" | "select")
    }

    /// The class list is authoritative; the `class` attribute mirrors it.
    fn sync_class_attribute(&mut self) {
        if self.classes.is_empty() {
            self.attributes.remove("class");
        } else {
            self.attributes.insert("class".to_string(), self.classes.join(" "));
        }
    }

    fn replace_classes(&mut self, value: &str) {
        self.classes.clear();
        for class in value.split_whitespace() {
            if !self.classes.iter().any(|c| c == class) {
                self.classes.push(class.to_string());
            }
        }
        self.sync_class_attribute();
    }
}

impl SelectorSubject for Element {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Description of an element to append with [`Document::append`].
///
/// ```
/// use showcase::dom::{Document, El};
///
/// let mut doc = Document::new();
/// let body = doc.body_id();
/// let link = doc.append(body, El::new("a").class("nav-link").attr("href", "#about").text("About"));
/// assert_eq!(doc.element(link).tag(), "a");
/// ```
#[derive(Debug, Clone)]
pub struct El {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    value: String,
}

impl El {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            text: String::new(),
            value: String::new(),
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(mut self, class: &str) -> Self {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }
}

/// In-memory document: an arena of elements rooted at `<html>` with a
/// `<body>` child.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let root = Element {
            tag: "html".to_string(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            text: String::new(),
            value: String::new(),
            parent: None,
            children: Vec::new(),
        };
        let mut doc = Self {
            nodes: vec![root],
            body: NodeId(0),
        };
        doc.body = doc.append(NodeId(0), El::new("body"));
        doc
    }

    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    pub fn body_id(&self) -> NodeId {
        self.body
    }

    /// Append a new element as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, el: El) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut element = Element {
            tag: el.tag,
            attributes: el.attributes,
            classes: Vec::new(),
            text: el.text,
            value: el.value,
            parent: Some(parent),
            children: Vec::new(),
        };
        let listed = element.attributes.get("class").cloned().unwrap_or_default();
        element.replace_classes(&format!("{listed} {}", el.classes.join(" ")));
        self.nodes.push(element);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn element(&self, node: NodeId) -> &Element {
        &self.nodes[node.0]
    }

    /// Set a form control's current value (what a user typing would do).
    pub fn set_value(&mut self, node: NodeId, value: &str) {
        self.nodes[node.0].value = value.to_string();
    }

    /// Elements in document (pre-)order, starting below `root`.
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[root.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        let ancestors = std::iter::successors(self.nodes[node.0].parent, |p| self.nodes[p.0].parent)
            .map(|p| &self.nodes[p.0]);
        selector.matches(&self.nodes[node.0], ancestors)
    }

    /// First element matching `selector`.
    pub fn query(&self, selector: &Selector) -> Option<NodeId> {
        self.descendants(self.root_id())
            .into_iter()
            .find(|n| self.matches(*n, selector))
    }

    /// Every element below the root, in document order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Element)> {
        self.descendants(self.root_id())
            .into_iter()
            .map(|n| (n, &self.nodes[n.0]))
    }
}

impl Dom for Document {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.descendants(self.root_id())
            .into_iter()
            .find(|n| self.nodes[n.0].attributes.get("id").is_some_and(|v| v == id))
    }

    fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.descendants(self.root_id())
            .into_iter()
            .filter(|n| self.matches(*n, selector))
            .collect()
    }

    fn query_within(&self, root: &NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(*root)
            .into_iter()
            .filter(|n| self.matches(*n, selector))
            .collect()
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes[node.0].attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        let el = &mut self.nodes[node.0];
        if name == "class" {
            el.replace_classes(value);
        } else {
            el.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) {
        let el = &mut self.nodes[node.0];
        el.attributes.remove(name);
        if name == "class" {
            el.classes.clear();
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes[node.0].has_class(class)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        let el = &mut self.nodes[node.0];
        if !el.classes.iter().any(|c| c == class) {
            el.classes.push(class.to_string());
            el.sync_class_attribute();
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        let el = &mut self.nodes[node.0];
        el.classes.retain(|c| c != class);
        el.sync_class_attribute();
    }

    fn text(&self, node: &NodeId) -> String {
        self.nodes[node.0].text.clone()
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        self.nodes[node.0].text = text.to_string();
    }

    fn value(&self, node: &NodeId) -> String {
        let el = &self.nodes[node.0];
        if el.is_form_control() {
            el.value.clone()
        } else {
            String::new()
        }
    }

    fn reset_form(&mut self, form: &NodeId) {
        for node in self.descendants(*form) {
            let el = &mut self.nodes[node.0];
            if el.is_form_control() {
                el.value.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(s: &str) -> Selector {
        s.parse().unwrap()
    }

    #[test]
    fn new_document_has_body() {
        let doc = Document::new();
        let body = doc.body().unwrap();
        assert_eq!(doc.element(body).tag(), "body");
        assert_eq!(doc.parent(&body), Some(doc.root_id()));
    }

    #[test]
    fn element_by_id_finds_nested_element() {
        let mut doc = Document::new();
        let main = doc.append(doc.body_id(), El::new("main"));
        let section = doc.append(main, El::new("section").id("projects"));
        assert_eq!(doc.element_by_id("projects"), Some(section));
        assert_eq!(doc.element_by_id("missing"), None);
        assert_eq!(doc.element_by_id(""), None);
    }

    #[test]
    fn query_all_returns_document_order() {
        let mut doc = Document::new();
        let body = doc.body_id();
        let main = doc.append(body, El::new("main"));
        let a = doc.append(main, El::new("section").id("a"));
        let inner = doc.append(a, El::new("div"));
        let nested = doc.append(inner, El::new("section").id("nested"));
        let b = doc.append(main, El::new("section").id("b"));
        let _no_id = doc.append(main, El::new("section"));

        assert_eq!(doc.query_all(&sel("main section[id]")), vec![a, nested, b]);
    }

    #[test]
    fn query_within_excludes_root_and_outside_nodes() {
        let mut doc = Document::new();
        let body = doc.body_id();
        let form = doc.append(body, El::new("form").id("contact-form"));
        let slot = doc.append(
            form,
            El::new("p").class("field-error").attr("data-error-for", "contact-name"),
        );
        let _outside = doc.append(
            body,
            El::new("p").class("field-error").attr("data-error-for", "contact-name"),
        );

        let s = Selector::attribute_equals("data-error-for", "contact-name");
        assert_eq!(doc.query_within(&form, &s), vec![slot]);
        assert_eq!(doc.query_all(&s).len(), 2);
    }

    #[test]
    fn classes_are_a_set() {
        let mut doc = Document::new();
        let el = doc.append(doc.body_id(), El::new("div"));
        doc.add_class(&el, "error");
        doc.add_class(&el, "error");
        assert_eq!(doc.element(el).classes(), ["error"]);
        doc.remove_class(&el, "error");
        doc.remove_class(&el, "error");
        assert!(!doc.has_class(&el, "error"));
    }

    #[test]
    fn class_attribute_reflects_class_list() {
        let mut doc = Document::new();
        let el = doc.append(doc.body_id(), El::new("div").class("a").class("b"));
        assert_eq!(doc.attribute(&el, "class").as_deref(), Some("a b"));
        doc.remove_class(&el, "a");
        doc.remove_class(&el, "b");
        assert_eq!(doc.attribute(&el, "class"), None);
    }

    #[test]
    fn class_attribute_writes_the_class_list() {
        let mut doc = Document::new();
        let el = doc.append(doc.body_id(), El::new("div").attr("class", "card  reveal"));
        assert!(doc.has_class(&el, "reveal"));
        assert_eq!(doc.query_all(&sel("[class]")), [el]);

        doc.set_attribute(&el, "class", "hero");
        assert_eq!(doc.element(el).classes(), ["hero"]);
        assert!(!doc.has_class(&el, "card"));
        assert_eq!(doc.query_all(&sel(".hero")), [el]);
        assert_eq!(doc.query_all(&sel(r#"[class="hero"]"#)), [el]);

        doc.remove_attribute(&el, "class");
        assert!(doc.element(el).classes().is_empty());
        assert!(doc.query_all(&sel("[class]")).is_empty());
    }

    #[test]
    fn attributes_set_and_remove() {
        let mut doc = Document::new();
        let el = doc.append(doc.body_id(), El::new("a"));
        doc.set_attribute(&el, "aria-current", "page");
        assert_eq!(doc.attribute(&el, "aria-current").as_deref(), Some("page"));
        doc.remove_attribute(&el, "aria-current");
        assert_eq!(doc.attribute(&el, "aria-current"), None);
    }

    #[test]
    fn value_only_for_form_controls() {
        let mut doc = Document::new();
        let input = doc.append(doc.body_id(), El::new("input").value("hi"));
        let div = doc.append(doc.body_id(), El::new("div").value("ignored"));
        assert_eq!(doc.value(&input), "hi");
        assert_eq!(doc.value(&div), "");
    }

    #[test]
    fn reset_form_clears_controls_inside_form_only() {
        let mut doc = Document::new();
        let body = doc.body_id();
        let form = doc.append(body, El::new("form"));
        let wrapper = doc.append(form, El::new("div"));
        let input = doc.append(wrapper, El::new("input").value("Ada"));
        let textarea = doc.append(form, El::new("textarea").value("Hello"));
        let outside = doc.append(body, El::new("input").value("keep"));

        doc.reset_form(&form);
        assert_eq!(doc.value(&input), "");
        assert_eq!(doc.value(&textarea), "");
        assert_eq!(doc.value(&outside), "keep");
    }

    #[test]
    fn ancestors_inclusive_walks_to_root() {
        let mut doc = Document::new();
        let nav = doc.append(doc.body_id(), El::new("nav"));
        let link = doc.append(nav, El::new("a"));
        assert_eq!(
            doc.ancestors_inclusive(&link),
            vec![link, nav, doc.body_id(), doc.root_id()]
        );
    }

    #[test]
    fn query_returns_first_match() {
        let mut doc = Document::new();
        let first = doc.append(doc.body_id(), El::new("button").class("nav-toggle"));
        let _second = doc.append(doc.body_id(), El::new("button").class("nav-toggle"));
        assert_eq!(doc.query(&sel(".nav-toggle")), Some(first));
    }
}
