//! html5ever tree sink that writes straight into the node arena.

use crate::dom::{Document, DomNode, NodeKind};
use core::cell::RefCell;
use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, ExpandedName, QualName, local_name, namespace_url};
use indextree::{Arena, Node, NodeId};
use log::trace;
use std::borrow::Cow;
use std::rc::Rc;

/// Handle passed around by the tree builder. Elements keep their qualified
/// name next to the arena id because `elem_name` must lend it out.
#[derive(Clone, Debug)]
pub struct SinkHandle {
    id: NodeId,
    name: Rc<QualName>,
}

/// Tree builder target. Lives only for the duration of one parse, on one
/// thread; `finish` hands the arena over to a [`Document`].
pub struct ArenaSink {
    arena: RefCell<Arena<DomNode>>,
    document: SinkHandle,
    /// Name shared by every non-element handle.
    anonymous: Rc<QualName>,
}

impl ArenaSink {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(DomNode::default());
        let anonymous = Rc::new(QualName::new(None, namespace_url!(""), local_name!("")));
        Self {
            arena: RefCell::new(arena),
            document: SinkHandle {
                id: root,
                name: Rc::clone(&anonymous),
            },
            anonymous,
        }
    }

    fn anonymous_node(&self, node: DomNode) -> SinkHandle {
        let id = self.arena.borrow_mut().new_node(node);
        SinkHandle {
            id,
            name: Rc::clone(&self.anonymous),
        }
    }

    /// Append text under `parent`, merging into a trailing text node.
    fn append_text(&self, parent: NodeId, text: &str) {
        let mut arena = self.arena.borrow_mut();
        if let Some(last) = arena.get(parent).and_then(Node::last_child)
            && let Some(NodeKind::Text { text: existing }) =
                arena.get_mut(last).map(|node| &mut node.get_mut().kind)
        {
            existing.push_str(text);
            return;
        }
        let node = arena.new_node(DomNode::text(text.to_owned()));
        parent.append(node, &mut arena);
    }

    /// Insert text before `sibling`, merging into a preceding text node.
    fn insert_text_before(&self, sibling: NodeId, text: &str) {
        let mut arena = self.arena.borrow_mut();
        if let Some(previous) = arena.get(sibling).and_then(Node::previous_sibling)
            && let Some(NodeKind::Text { text: existing }) =
                arena.get_mut(previous).map(|node| &mut node.get_mut().kind)
        {
            existing.push_str(text);
            return;
        }
        let node = arena.new_node(DomNode::text(text.to_owned()));
        sibling.insert_before(node, &mut arena);
    }
}

impl TreeSink for ArenaSink {
    type Handle = SinkHandle;
    type Output = Document;
    type ElemName<'a>
        = ExpandedName<'a>
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        Document::from_parts(self.arena.into_inner(), self.document.id)
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        // html5ever recovers from every markup error; they are only interesting when debugging.
        trace!("html parse error: {msg}");
    }

    fn get_document(&self) -> Self::Handle {
        self.document.clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> ExpandedName<'a> {
        target.name.expanded()
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect();
        let id = self
            .arena
            .borrow_mut()
            .new_node(DomNode::element(name.local.to_string(), attrs));
        SinkHandle {
            id,
            name: Rc::new(name),
        }
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        self.anonymous_node(DomNode::other())
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        self.anonymous_node(DomNode::other())
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => {
                parent.id.append(node.id, &mut self.arena.borrow_mut());
            }
            NodeOrText::AppendText(text) => self.append_text(parent.id, &text),
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self
            .arena
            .borrow()
            .get(element.id)
            .and_then(Node::parent)
            .is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let doctype = self.anonymous_node(DomNode::other());
        self.document
            .id
            .append(doctype.id, &mut self.arena.borrow_mut());
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents stay inline so selectors can reach them.
        target.clone()
    }

    fn same_node(&self, left: &Self::Handle, right: &Self::Handle) -> bool {
        left.id == right.id
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        match new_node {
            NodeOrText::AppendNode(node) => {
                sibling
                    .id
                    .insert_before(node.id, &mut self.arena.borrow_mut());
            }
            NodeOrText::AppendText(text) => self.insert_text_before(sibling.id, &text),
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut arena = self.arena.borrow_mut();
        let Some(node) = arena.get_mut(target.id) else {
            return;
        };
        let data = node.get_mut();
        for attr in attrs {
            let key = attr.name.local.to_string();
            if data.attr(&key).is_none() {
                data.attrs.push((key, attr.value.to_string()));
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        target.id.detach(&mut self.arena.borrow_mut());
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut arena = self.arena.borrow_mut();
        let children: Vec<NodeId> = node.id.children(&arena).collect();
        for child in children {
            new_parent.id.append(child, &mut arena);
        }
    }
}
