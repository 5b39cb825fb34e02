//! Query results and single-node views over a [`Document`].

use crate::dom::{Document, DomNode};
use css_selectors::{ElementAdapter as _, SelectorList, parse_selector_list};
use indextree::NodeId;
use std::vec;

impl Document {
    /// Every node matching `selector`, searched from the document root.
    ///
    /// Malformed selectors degrade instead of failing; an empty selector
    /// yields an empty selection.
    pub fn find(&self, selector: &str) -> Selection<'_> {
        Selection::from_roots(self, &[self.root()], &parse_selector_list(selector))
    }
}

/// Ordered list of matched nodes. Duplicates are kept.
#[derive(Clone, Debug)]
pub struct Selection<'doc> {
    doc: &'doc Document,
    nodes: Vec<NodeId>,
}

impl<'doc> Selection<'doc> {
    fn new(doc: &'doc Document, nodes: Vec<NodeId>) -> Self {
        Self { doc, nodes }
    }

    fn from_roots(doc: &'doc Document, roots: &[NodeId], list: &SelectorList) -> Self {
        if list.is_empty() {
            return Self::new(doc, Vec::new());
        }
        let nodes = roots
            .iter()
            .flat_map(|&root| css_selectors::find(doc, root, list))
            .collect();
        Self::new(doc, nodes)
    }

    /// Search under every node of this selection (each node is itself a
    /// candidate), concatenating results in selection order.
    pub fn find(&self, selector: &str) -> Self {
        Self::from_roots(self.doc, &self.nodes, &parse_selector_list(selector))
    }

    /// Call `callback` with the position and view of every node in order.
    pub fn each<F>(&self, mut callback: F)
    where
        F: FnMut(usize, Element<'doc>),
    {
        for (index, element) in self.iter().enumerate() {
            callback(index, element);
        }
    }

    pub fn first(&self) -> Element<'doc> {
        self.element(self.nodes.first().copied())
    }

    pub fn last(&self) -> Element<'doc> {
        self.element(self.nodes.last().copied())
    }

    /// Node at `index`, or a non-existent element when out of range.
    pub fn get(&self, index: usize) -> Element<'doc> {
        self.element(self.nodes.get(index).copied())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Keep the nodes for which `predicate` holds, preserving order.
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&Element<'doc>) -> bool,
    {
        let nodes = self
            .nodes
            .iter()
            .copied()
            .filter(|&node| predicate(&Element::new(self.doc, Some(node))))
            .collect();
        Self::new(self.doc, nodes)
    }

    pub fn iter(&self) -> impl Iterator<Item = Element<'doc>> + '_ {
        self.nodes
            .iter()
            .map(|&node| Element::new(self.doc, Some(node)))
    }

    /// Raw node ids, in selection order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    fn element(&self, node: Option<NodeId>) -> Element<'doc> {
        Element::new(self.doc, node)
    }
}

impl<'doc> IntoIterator for Selection<'doc> {
    type Item = Element<'doc>;
    type IntoIter = SelectionIntoIter<'doc>;

    fn into_iter(self) -> Self::IntoIter {
        SelectionIntoIter {
            doc: self.doc,
            nodes: self.nodes.into_iter(),
        }
    }
}

/// Owning iterator over a [`Selection`].
#[derive(Debug)]
pub struct SelectionIntoIter<'doc> {
    doc: &'doc Document,
    nodes: vec::IntoIter<NodeId>,
}

impl<'doc> Iterator for SelectionIntoIter<'doc> {
    type Item = Element<'doc>;

    fn next(&mut self) -> Option<Self::Item> {
        self.nodes
            .next()
            .map(|node| Element::new(self.doc, Some(node)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.nodes.size_hint()
    }
}

/// View of a single node, or of nothing. Every accessor on a non-existent
/// element returns an empty value instead of failing.
#[derive(Clone, Copy, Debug)]
pub struct Element<'doc> {
    doc: &'doc Document,
    node: Option<NodeId>,
}

impl<'doc> Element<'doc> {
    fn new(doc: &'doc Document, node: Option<NodeId>) -> Self {
        Self { doc, node }
    }

    fn data(&self) -> Option<&'doc DomNode> {
        self.doc.node(self.node?)
    }

    /// Value of the first attribute named `key`.
    pub fn attr(&self, key: &str) -> Option<&'doc str> {
        self.data()?.attr(key)
    }

    /// Text of every descendant text node in document order, untrimmed.
    pub fn text(&self) -> String {
        self.node
            .map(|node| self.doc.text_content(node))
            .unwrap_or_default()
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.node
            .is_some_and(|node| self.doc.has_class(node, name))
    }

    /// Tag name, empty for non-elements and non-existent elements.
    pub fn tag_name(&self) -> &'doc str {
        self.data().map_or("", DomNode::tag_name)
    }

    pub fn exists(&self) -> bool {
        self.node.is_some()
    }

    /// Search under this element, which is itself a candidate.
    pub fn find(&self, selector: &str) -> Selection<'doc> {
        match self.node {
            Some(node) => Selection::from_roots(self.doc, &[node], &parse_selector_list(selector)),
            None => Selection::new(self.doc, Vec::new()),
        }
    }

    pub fn node_id(&self) -> Option<NodeId> {
        self.node
    }
}
