//! Selector compilation.
//!
//! Compilation is permissive: nothing here can fail. Unterminated attribute
//! clauses are left in place, unknown characters end up in the tag or class
//! names, and an empty input yields an empty selector.

use crate::{AttrRequirement, CompiledSelector, SelectorList, SelectorPart};

/// Parse a selector list: comma-separated alternatives, each trimmed, with
/// empty alternatives dropped.
pub fn parse_selector_list(input: &str) -> SelectorList {
    let mut list = SelectorList::default();
    for alternative in input.split(',') {
        let trimmed = alternative.trim();
        if trimmed.is_empty() {
            continue;
        }
        list.selectors.push(parse_selector(trimmed));
    }
    list
}

/// Parse one alternative into its descendant chain. Every whitespace
/// separated token becomes one part.
pub fn parse_selector(input: &str) -> CompiledSelector {
    CompiledSelector {
        parts: input.split_whitespace().map(parse_selector_part).collect(),
    }
}

/// Parse a single token such as `a.title#main[rel=next]`.
///
/// Attribute clauses are pulled out first, then the id, and whatever is left
/// is read as `tag.class1.class2`.
pub fn parse_selector_part(token: &str) -> SelectorPart {
    let mut part = SelectorPart::default();
    let mut remaining = token.to_owned();

    extract_attr_clauses(&mut remaining, &mut part);
    extract_id(&mut remaining, &mut part);

    let mut segments = remaining.split('.');
    let tag = segments.next().unwrap_or_default();
    if tag != "*" {
        tag.clone_into(&mut part.tag);
    }
    part.classes = segments
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect();
    part
}

/// Remove every complete `[...]` clause from `remaining`, recording each one.
/// Stops at the first `[` without a closing `]`.
fn extract_attr_clauses(remaining: &mut String, part: &mut SelectorPart) {
    while let Some(start) = remaining.find('[') {
        let Some(offset) = remaining.get(start..).and_then(|rest| rest.find(']')) else {
            break;
        };
        let end = start + offset;
        let clause = remaining.get(start + 1..end).unwrap_or_default();
        let (name, requirement) = parse_attr_clause(clause);
        part.attrs.insert(name, requirement);
        remaining.replace_range(start..=end, "");
    }
}

/// Parse the inside of an attribute clause, `name` or `name=value`.
/// The value may be wrapped in single or double quotes; an empty value only
/// requires the attribute to exist.
fn parse_attr_clause(clause: &str) -> (String, AttrRequirement) {
    let Some((name, value)) = clause.split_once('=') else {
        return (clause.trim().to_owned(), AttrRequirement::Exists);
    };
    let value = value.trim().trim_matches(|ch| ch == '"' || ch == '\'');
    let requirement = if value.is_empty() {
        AttrRequirement::Exists
    } else {
        AttrRequirement::Equals(value.to_owned())
    };
    (name.trim().to_owned(), requirement)
}

/// Remove the first `#id` from `remaining`. The id is the run of ASCII
/// alphanumerics, `-` and `_` following the `#`.
fn extract_id(remaining: &mut String, part: &mut SelectorPart) {
    let Some(hash) = remaining.find('#') else {
        return;
    };
    let rest = remaining.get(hash + 1..).unwrap_or_default();
    let id_len = rest.bytes().take_while(|&byte| is_ident_byte(byte)).count();
    let id = rest.get(..id_len).unwrap_or_default();
    if !id.is_empty() {
        part.id = Some(id.to_owned());
    }
    remaining.replace_range(hash..=hash + id_len, "");
}

#[inline]
const fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_'
}
