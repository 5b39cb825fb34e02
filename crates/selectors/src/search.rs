//! Tree search: walking a subtree and collecting every node a selector
//! matches.
//!
//! The walk is depth-first pre-order. For a chain `p0 p1 .. pn`, a node
//! matching `p[i]` starts a search of its whole subtree for `p[i + 1]`, and
//! the walk also keeps going into its children looking for further `p[i]`
//! matches. A node can therefore be reached through several ancestors and
//! appear several times in the output; callers see every occurrence.
//!
//! Pending work lives on a heap-allocated stack, so tree depth is bounded
//! by memory rather than by the thread's call stack.

use crate::cache::MatchCache;
use crate::matcher::matches_part;
use crate::{CompiledSelector, ElementAdapter, SelectorList, SelectorPart};

/// Search the subtree rooted at `root` (the root itself included) for every
/// alternative of `list`, concatenating results in alternative order.
pub fn find<A: ElementAdapter>(adapter: &A, root: A::Handle, list: &SelectorList) -> Vec<A::Handle> {
    let mut results = Vec::new();
    let mut cache = MatchCache::default();
    for selector in &list.selectors {
        cache.clear();
        collect(adapter, root, selector, &mut cache, &mut results);
    }
    results
}

fn collect<A: ElementAdapter>(
    adapter: &A,
    root: A::Handle,
    selector: &CompiledSelector,
    cache: &mut MatchCache,
    results: &mut Vec<A::Handle>,
) {
    if selector.parts.is_empty() {
        return;
    }
    let mut walker = Walker {
        adapter,
        parts: &selector.parts,
        cache,
        results,
    };
    walker.walk(root);
}

struct Walker<'walk, A: ElementAdapter> {
    adapter: &'walk A,
    parts: &'walk [SelectorPart],
    cache: &'walk mut MatchCache,
    results: &'walk mut Vec<A::Handle>,
}

impl<A: ElementAdapter> Walker<'_, A> {
    /// Visit `(node, part index)` pairs from `root` in pre-order.
    ///
    /// When `node` matches a non-final part, its children are scheduled
    /// twice: with the next part, then with the same part. The next-part
    /// entries sit on top of the stack, so the subtree is searched for the
    /// rest of the chain before the walk moves on.
    fn walk(&mut self, root: A::Handle) {
        let mut pending = vec![(root, 0)];
        let mut children = Vec::new();
        while let Some((node, index)) = pending.pop() {
            children.clear();
            let mut child = self.adapter.first_child(node);
            while let Some(current) = child {
                children.push(current);
                child = self.adapter.next_sibling(current);
            }

            pending.extend(children.iter().rev().map(|&current| (current, index)));
            if self.adapter.is_element(node) && self.part_matches(node, index) {
                if index + 1 == self.parts.len() {
                    self.results.push(node);
                } else {
                    pending.extend(children.iter().rev().map(|&current| (current, index + 1)));
                }
            }
        }
    }

    fn part_matches(&mut self, node: A::Handle, index: usize) -> bool {
        // Single-part chains never revisit a node.
        if self.parts.len() == 1 {
            return self
                .parts
                .get(index)
                .is_some_and(|part| matches_part(self.adapter, node, part));
        }
        let key = self.adapter.unique_key(node);
        if let Some(matched) = self.cache.get(key, index) {
            return matched;
        }
        let matched = self
            .parts
            .get(index)
            .is_some_and(|part| matches_part(self.adapter, node, part));
        self.cache.set(key, index, matched);
        matched
    }
}
