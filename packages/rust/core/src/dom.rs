//! Mutable document tree over `scraper`'s parsed HTML.
//!
//! A [`Document`] owns the `ego_tree::Tree<scraper::Node>` produced by
//! html5ever and exposes it through [`NodeId`] handles. The rewrite passes
//! take the document by `&mut` and never hold node references across calls;
//! detached nodes stay in the tree storage until the document is dropped.
//!
//! Every walk goes through `ego_tree`'s iterators and serialization goes
//! through html5ever's stack-based serializer, so nesting depth is bounded
//! by memory rather than by the call stack.

use html5ever::{Attribute, LocalName, QualName, ns};
use scraper::node::{Element, Text};
use scraper::{ElementRef, Html, Node, StrTendril};

use docpreview_shared::{DocPreviewError, Result};

pub use ego_tree::NodeId;

/// Builder for a new element: tag name plus attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    name: String,
    attrs: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        self
    }

    fn into_node(self) -> Node {
        let attrs = self
            .attrs
            .into_iter()
            .map(|(name, value)| attribute(&name, &value))
            .collect();
        Node::Element(Element::new(html_name(&self.name), attrs))
    }
}

fn html_name(name: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(name))
}

fn attribute(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, ns!(), LocalName::from(name)),
        value: StrTendril::from(value),
    }
}

/// Typed view of one node.
#[derive(Debug, Clone, Copy)]
pub enum NodeKind<'a> {
    Element(&'a Element),
    Text(&'a str),
    Comment(&'a str),
    /// Document roots, doctypes and processing instructions.
    Other,
}

/// A parsed HTML fragment. Its children live under the fragment's root
/// element, which stands in for the page body.
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
    body: NodeId,
}

impl Document {
    /// Parse an HTML fragment in a `body` context.
    pub fn parse_fragment(html: &str) -> Self {
        let html = Html::parse_fragment(html);
        let body = html.root_element().id();
        Self { html, body }
    }

    fn node(&self, id: NodeId) -> Option<ego_tree::NodeRef<'_, Node>> {
        self.html.tree.get(id)
    }

    pub fn create_element(&mut self, data: ElementData) -> NodeId {
        self.html.tree.orphan(data.into_node()).id()
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        let text: String = text.into();
        self.html
            .tree
            .orphan(Node::Text(Text {
                text: StrTendril::from(text),
            }))
            .id()
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn kind(&self, id: NodeId) -> NodeKind<'_> {
        match self.node(id).map(|n| n.value()) {
            Some(Node::Element(el)) => NodeKind::Element(el),
            Some(Node::Text(text)) => NodeKind::Text(&text.text),
            Some(Node::Comment(comment)) => NodeKind::Comment(&comment.comment),
            _ => NodeKind::Other,
        }
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id) {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Replace the content of a text node. Returns `false` for any other node.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> bool {
        let Some(mut node) = self.html.tree.get_mut(id) else {
            return false;
        };
        match node.value() {
            Node::Text(t) => {
                t.text = StrTendril::from(text);
                true
            }
            _ => false,
        }
    }

    pub fn is_element_named(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|el| el.name() == name)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent().map(|p| p.id())
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|n| n.children().map(|c| c.id()).collect())
            .unwrap_or_default()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.first_child().map(|c| c.id())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.next_sibling().map(|s| s.id())
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.prev_sibling().map(|s| s.id())
    }

    /// Strict descendants of `id` in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|n| n.descendants().skip(1).map(|d| d.id()).collect())
            .unwrap_or_default()
    }

    /// Elements under the body with tag `name`, in document order.
    pub fn elements_by_tag(&self, name: &str) -> Vec<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|&id| self.is_element_named(id, name))
            .collect()
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self, id: NodeId) -> String {
        let Some(node) = self.node(id) else {
            return String::new();
        };
        node.descendants()
            .filter_map(|d| match d.value() {
                Node::Text(text) => Some(&*text.text),
                _ => None,
            })
            .collect()
    }

    /// Set or overwrite one attribute of an element. Returns `false` for non-elements.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        let Some(mut node) = self.html.tree.get_mut(id) else {
            return false;
        };
        let Node::Element(el) = node.value() else {
            return false;
        };

        let mut attrs: Vec<Attribute> = el
            .attrs()
            .filter(|(k, _)| *k != name)
            .map(|(k, v)| attribute(k, v))
            .collect();
        attrs.push(attribute(name, value));
        *el = Element::new(el.name.clone(), attrs);
        true
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    pub fn detach(&mut self, id: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if parent == child {
            return;
        }
        if let Some(mut node) = self.html.tree.get_mut(parent) {
            node.append_id(child);
        }
    }

    /// Insert `new` immediately before `reference`.
    pub fn insert_before(&mut self, reference: NodeId, new: NodeId) -> Result<()> {
        if reference == new {
            return Err(DocPreviewError::Render(format!(
                "cannot insert {new:?} before itself"
            )));
        }
        if self.parent(reference).is_none() {
            return Err(DocPreviewError::Render(format!(
                "cannot insert before detached node {reference:?}"
            )));
        }
        let mut node = self
            .html
            .tree
            .get_mut(reference)
            .ok_or_else(|| DocPreviewError::Render(format!("unknown node {reference:?}")))?;
        node.insert_id_before(new);
        Ok(())
    }

    /// Put `new` where `old` is and detach `old`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        self.insert_before(old, new)?;
        self.detach(old);
        Ok(())
    }

    /// Move every child of `from` to the end of `to`, keeping order.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        if from == to {
            return;
        }
        if let Some(mut node) = self.html.tree.get_mut(to) {
            node.reparent_from_id_append(from);
        }
    }

    /// Replace all children of `id` with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: impl Into<String>) {
        for child in self.children(id) {
            self.detach(child);
        }
        let text = self.create_text(text);
        self.append(id, text);
    }

    /// Change an element's tag name, keeping attributes and children.
    pub fn rename(&mut self, id: NodeId, name: &str) -> bool {
        let Some(mut node) = self.html.tree.get_mut(id) else {
            return false;
        };
        let Node::Element(el) = node.value() else {
            return false;
        };
        let attrs = el.attrs().map(|(k, v)| attribute(k, v)).collect();
        *el = Element::new(html_name(name), attrs);
        true
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Serialized children of the element `id`; empty for other nodes.
    pub fn inner_html(&self, id: NodeId) -> String {
        self.node(id)
            .and_then(ElementRef::wrap)
            .map(|el| el.inner_html())
            .unwrap_or_default()
    }

    pub fn body_html(&self) -> String {
        self.inner_html(self.body)
    }
}
