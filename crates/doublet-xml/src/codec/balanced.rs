// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Balanced list ↔ sequence conversion.

use doublet_store::{LinkAddress, LinkStore};

use crate::error::{Result, XmlError};
use crate::walker::SequenceWalker;

/// Fold `items` into a single sequence link by pairing neighbours level by
/// level until one address remains.
///
/// A one-element list is the element itself. An odd element at the end of a
/// level is carried up unpaired. Equal lists always fold to the same address.
///
/// # Errors
///
/// [`XmlError::EmptySequence`] for an empty list; store errors propagate.
pub fn balanced_sequence<S>(store: &mut S, items: &[LinkAddress]) -> Result<LinkAddress>
where
    S: LinkStore + ?Sized,
{
    let mut level: Vec<LinkAddress> = items.to_vec();
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            match *pair {
                [left, right] => next.push(store.get_or_create(left, right)?),
                [single] => next.push(single),
                _ => {}
            }
        }
        level = next;
    }
    level.first().copied().ok_or(XmlError::EmptySequence)
}

/// Unfold a sequence built by [`balanced_sequence`] back into its elements.
pub fn sequence_to_records<S, F>(store: &S, sequence: LinkAddress, is_element: F) -> Vec<LinkAddress>
where
    S: LinkStore + ?Sized,
    F: FnMut(LinkAddress) -> bool,
{
    SequenceWalker::new(store, sequence, is_element).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use doublet_store::MemoryLinks;

    fn raws(n: u32) -> Vec<LinkAddress> {
        (0..n).map(LinkAddress::raw).collect()
    }

    #[test]
    fn empty_list_is_rejected() {
        let mut store = MemoryLinks::new();
        assert_eq!(balanced_sequence(&mut store, &[]), Err(XmlError::EmptySequence));
        assert!(store.is_empty());
    }

    #[test]
    fn single_element_is_identity() {
        let mut store = MemoryLinks::new();
        let only = LinkAddress::raw(4);
        assert_eq!(balanced_sequence(&mut store, &[only]).unwrap(), only);
        assert!(store.is_empty());
    }

    #[test]
    fn odd_lengths_round_trip() {
        let mut store = MemoryLinks::new();
        for n in 1..=17 {
            let items = raws(n);
            let sequence = balanced_sequence(&mut store, &items).unwrap();
            assert_eq!(sequence_to_records(&store, sequence, LinkAddress::is_raw), items);
        }
    }

    #[test]
    fn equal_lists_share_a_sequence() {
        let mut store = MemoryLinks::new();
        let a = balanced_sequence(&mut store, &raws(9)).unwrap();
        let before = store.len();
        let b = balanced_sequence(&mut store, &raws(9)).unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len(), before);
    }

    #[test]
    fn four_elements_make_three_links() {
        let mut store = MemoryLinks::new();
        balanced_sequence(&mut store, &raws(4)).unwrap();
        // (0 1), (2 3), ((0 1) (2 3))
        assert_eq!(store.len(), 3);
    }
}
