//! Arena-backed document tree.
//!
//! Nodes are addressed by [`NodeId`]; the arena records parent, sibling and
//! child links, so the tree carries no reference cycles and can be shared
//! freely between threads once built.

use css_selectors::ElementAdapter;
use indextree::{Arena, NodeId};
use smallvec::SmallVec;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NodeKind {
    #[default]
    Document,
    Element {
        tag: String,
    },
    Text {
        text: String,
    },
    /// Comments, doctypes and processing instructions.
    Other,
}

#[derive(Debug, Clone, Default)]
pub struct DomNode {
    pub kind: NodeKind,
    /// Attributes in source order. Duplicate keys are kept; lookups return
    /// the first one.
    pub attrs: SmallVec<(String, String), 4>,
}

impl DomNode {
    pub fn element(tag: String, attrs: SmallVec<(String, String), 4>) -> Self {
        Self {
            kind: NodeKind::Element { tag },
            attrs,
        }
    }

    pub fn text(text: String) -> Self {
        Self {
            kind: NodeKind::Text { text },
            attrs: SmallVec::new(),
        }
    }

    pub fn other() -> Self {
        Self {
            kind: NodeKind::Other,
            attrs: SmallVec::new(),
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    pub fn tag_name(&self) -> &str {
        match &self.kind {
            NodeKind::Element { tag } => tag,
            _ => "",
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A parsed HTML document. Immutable once built.
#[derive(Debug)]
pub struct Document {
    pub(crate) arena: Arena<DomNode>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document holding only its root node.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        Self {
            root: arena.new_node(DomNode::default()),
            arena,
        }
    }

    pub(crate) fn from_parts(arena: Arena<DomNode>, root: NodeId) -> Self {
        Self { arena, root }
    }

    /// The document node, parent of `<html>`.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&DomNode> {
        self.arena.get(id).map(indextree::Node::get)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id)?.parent()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// Number of nodes in the arena, the root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children(&self.arena).next().is_none()
    }

    /// Concatenation of every text node under `id` (or `id` itself if it is
    /// a text node), in document order. No separators, no trimming.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in id.descendants(&self.arena) {
            if let Some(NodeKind::Text { text }) = self.node(node).map(|data| &data.kind) {
                out.push_str(text);
            }
        }
        out
    }
}

impl ElementAdapter for Document {
    type Handle = NodeId;

    fn unique_key(&self, node: NodeId) -> u64 {
        usize::from(node) as u64
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(DomNode::is_element)
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.first_child()
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.next_sibling()
    }

    fn tag_name(&self, node: NodeId) -> &str {
        self.node(node).map_or("", DomNode::tag_name)
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)?.attr(name)
    }
}
