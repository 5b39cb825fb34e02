//! Selector compilation and tree search for scraping pages.
//!
//! Supported grammar (a deliberately small subset of Selectors Level 3):
//! - Type, class, id, attribute existence and attribute equals selectors
//! - The descendant combinator (whitespace)
//! - Groups of selectors separated by commas
//!
//! Malformed input never fails: it degrades to a partial selector or to a
//! selector that matches nothing. The crate knows nothing about any concrete
//! DOM; implement [`ElementAdapter`] for your tree.

mod cache;
mod matcher;
mod parser;
mod search;

// Re-export public API
pub use cache::MatchCache;
pub use matcher::matches_part;
pub use parser::{parse_selector, parse_selector_list, parse_selector_part};
pub use search::find;

use std::collections::BTreeMap;

/// An adapter that abstracts DOM access for selector matching.
/// Implement this for your DOM layer.
pub trait ElementAdapter {
    type Handle: Copy + Eq;

    /// Unique, stable key for caching per node.
    fn unique_key(&self, node: Self::Handle) -> u64;

    /// True for element nodes. Everything else (document, text, comments)
    /// is walked through but never matched.
    fn is_element(&self, node: Self::Handle) -> bool;

    /// First child of any kind, in document order.
    fn first_child(&self, node: Self::Handle) -> Option<Self::Handle>;

    /// Next sibling of any kind, in document order.
    fn next_sibling(&self, node: Self::Handle) -> Option<Self::Handle>;

    /// Tag name as stored in the tree. Empty for non-elements.
    fn tag_name(&self, node: Self::Handle) -> &str;

    /// Returns the attribute value if present (first occurrence wins).
    fn attr(&self, node: Self::Handle, name: &str) -> Option<&str>;

    /// Returns Some(id) if the element has an id attribute, else None.
    fn element_id(&self, node: Self::Handle) -> Option<&str> {
        self.attr(node, "id")
    }

    /// True if the element's `class` attribute contains the given token.
    fn has_class(&self, node: Self::Handle, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|token| token == class))
    }
}

/// Requirement placed on one attribute by a bracketed clause.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttrRequirement {
    /// `[name]` or `[name=""]`: the attribute must be present, any value.
    Exists,
    /// `[name=value]`: the attribute must equal `value` exactly.
    Equals(String),
}

/// One whitespace-separated unit of a selector, e.g. `a.title#main[rel=next]`.
/// Every constraint must hold for an element to match; a part with no
/// constraints matches every element.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SelectorPart {
    /// Required tag name. Empty means any tag.
    pub tag: String,
    /// Required class tokens, all of which must be present.
    pub classes: Vec<String>,
    /// Required id.
    pub id: Option<String>,
    /// Required attributes keyed by name. A later clause for the same name
    /// replaces an earlier one.
    pub attrs: BTreeMap<String, AttrRequirement>,
}

impl SelectorPart {
    /// True if this part places no constraint at all.
    pub fn is_universal(&self) -> bool {
        self.tag.is_empty() && self.classes.is_empty() && self.id.is_none() && self.attrs.is_empty()
    }
}

/// A descendant chain: `a b c` holds the parts for `a`, `b` and `c` in that
/// order. Each part must match a descendant of an element matching the
/// previous one.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CompiledSelector {
    pub parts: Vec<SelectorPart>,
}

impl CompiledSelector {
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// A selector list separated by commas. Alternatives are searched in order
/// and their results concatenated.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SelectorList {
    pub selectors: Vec<CompiledSelector>,
}

impl SelectorList {
    pub fn is_empty(&self) -> bool {
        self.selectors.iter().all(CompiledSelector::is_empty)
    }
}
