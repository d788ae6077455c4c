// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
use doublet_store::{LinkAddress, LinkStore, MemoryLinks, Pattern};
use proptest::prelude::*;

proptest! {
    #[test]
    fn repeated_pairs_never_duplicate(pairs in prop::collection::vec((0u32..8, 0u32..8), 1..64)) {
        let mut store = MemoryLinks::new();
        let root = store.get_or_create(LinkAddress::new(1), LinkAddress::new(1)).unwrap();
        let mut first = Vec::new();
        for (s, t) in &pairs {
            let source = store.get_or_create(root, LinkAddress::raw(*s)).unwrap();
            let address = store.get_or_create(source, LinkAddress::raw(*t)).unwrap();
            first.push(address);
        }
        for ((s, t), expected) in pairs.iter().zip(&first) {
            let source = store.search(root, LinkAddress::raw(*s)).unwrap();
            prop_assert_eq!(store.search(source, LinkAddress::raw(*t)), Some(*expected));
        }
        // Every (source, target) pair is stored exactly once.
        let mut seen = std::collections::HashSet::new();
        for link in store.matching(Pattern::ANY) {
            prop_assert!(seen.insert((link.source, link.target)));
        }
    }

    #[test]
    fn outgoing_scan_agrees_with_full_scan(targets in prop::collection::vec(0u32..32, 0..48)) {
        let mut store = MemoryLinks::new();
        let root = store.get_or_create(LinkAddress::new(1), LinkAddress::new(1)).unwrap();
        for t in &targets {
            store.get_or_create(root, LinkAddress::raw(*t)).unwrap();
        }
        let indexed: Vec<_> = store.matching(Pattern::outgoing(root)).collect();
        let scanned: Vec<_> = store
            .matching(Pattern::ANY)
            .filter(|link| Pattern::outgoing(root).matches(link))
            .collect();
        prop_assert_eq!(indexed, scanned);
    }
}
