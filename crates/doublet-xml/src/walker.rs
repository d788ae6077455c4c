// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Leaf traversal of balanced sequences.
//!
//! A sequence is a tree of nested `(left, right)` links whose leaves are the
//! encoded elements. [`SequenceWalker`] yields the leaves left to right, the
//! same direction [`balanced_sequence`](crate::codec::balanced_sequence)
//! builds them in. Walking the other way would reverse child order.

use doublet_store::{LinkAddress, LinkStore};

/// Lazy left-to-right iterator over the leaves of a sequence.
///
/// Traversal keeps an explicit stack of pending right branches instead of
/// recursing, so auxiliary space is bounded by the sequence depth
/// (`O(log n)` for balanced sequences) and total work by `O(leaves)`.
///
/// An address is emitted as a leaf when `is_leaf` accepts it, when it is not
/// a link at all (raw numbers, missing addresses), or when it is a link that
/// refers to itself; the last rule keeps self-referencing points from looping.
pub struct SequenceWalker<'a, S: ?Sized, F> {
    store: &'a S,
    stack: Vec<LinkAddress>,
    is_leaf: F,
}

impl<'a, S, F> SequenceWalker<'a, S, F>
where
    S: LinkStore + ?Sized,
    F: FnMut(LinkAddress) -> bool,
{
    /// Start walking `sequence`. The walk is lazy; nothing is read until the
    /// first call to `next`.
    pub fn new(store: &'a S, sequence: LinkAddress, is_leaf: F) -> Self {
        let mut stack = Vec::with_capacity(32);
        if !sequence.is_null() {
            stack.push(sequence);
        }
        Self {
            store,
            stack,
            is_leaf,
        }
    }
}

impl<S, F> Iterator for SequenceWalker<'_, S, F>
where
    S: LinkStore + ?Sized,
    F: FnMut(LinkAddress) -> bool,
{
    type Item = LinkAddress;

    fn next(&mut self) -> Option<LinkAddress> {
        while let Some(current) = self.stack.pop() {
            if (self.is_leaf)(current) {
                return Some(current);
            }
            let Some(link) = self.store.get(current) else {
                return Some(current);
            };
            if link.source == current || link.target == current {
                return Some(current);
            }
            self.stack.push(link.target);
            self.stack.push(link.source);
        }
        None
    }
}
