#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

//! HTML documents for scraping.
//!
//! A page is parsed once with html5ever into an immutable arena of nodes
//! ([`Document`]), then queried with CSS selectors. Queries return a
//! [`Selection`] of nodes; single nodes are viewed through [`Element`],
//! which may wrap nothing at all so that lookups chain without checks.

pub mod dom;
mod error;
mod parser;
mod selection;

pub use dom::{Document, DomNode, NodeKind};
pub use error::{ParseError, StreamError};
pub use indextree::NodeId;
pub use selection::{Element, Selection, SelectionIntoIter};
