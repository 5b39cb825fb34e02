//! Matching a single element against one selector part.

use crate::{AttrRequirement, ElementAdapter, SelectorPart};

/// Match one selector part against a single node.
/// Non-element nodes never match.
pub fn matches_part<A: ElementAdapter>(adapter: &A, node: A::Handle, part: &SelectorPart) -> bool {
    if !adapter.is_element(node) {
        return false;
    }

    if !part.tag.is_empty() && adapter.tag_name(node) != part.tag.as_str() {
        return false;
    }

    if part
        .classes
        .iter()
        .any(|class_name| !adapter.has_class(node, class_name))
    {
        return false;
    }

    if let Some(id_value) = &part.id
        && adapter
            .element_id(node)
            .is_none_or(|value| value != id_value.as_str())
    {
        return false;
    }

    part.attrs.iter().all(|(name, requirement)| {
        let value = adapter.attr(node, name);
        match requirement {
            AttrRequirement::Exists => value.is_some(),
            AttrRequirement::Equals(expected) => value == Some(expected.as_str()),
        }
    })
}
