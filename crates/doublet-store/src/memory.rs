// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory relation store.
//!
//! [`MemoryLinks`] is the Phase 1 `LinkStore` implementation: an arena of
//! links addressed by 1-based index, with hash indices for exact lookup and
//! per-endpoint adjacency lists for pattern enumeration. Persistence is out of
//! scope.

use rustc_hash::FxHashMap;

use crate::{Link, LinkAddress, LinkStore, Pattern, StoreError};

/// In-memory content-addressed link store.
///
/// Links live in a `Vec<Link>` where address `n` sits at slot `n - 1`. An
/// optional record budget is *enforced*: once reached, `get_or_create` of a new
/// pair fails with [`StoreError::CapacityExceeded`] while lookups of existing
/// pairs keep succeeding.
///
/// # Ordering Invariants
///
/// - Addresses are assigned densely in creation order starting at `1`.
/// - Adjacency lists are append-only, so [`matching`](LinkStore::matching)
///   yields links in creation order for every pattern shape.
#[derive(Debug, Clone, Default)]
pub struct MemoryLinks {
    links: Vec<Link>,
    index: FxHashMap<(LinkAddress, LinkAddress), LinkAddress>,
    by_source: FxHashMap<LinkAddress, Vec<LinkAddress>>,
    by_target: FxHashMap<LinkAddress, Vec<LinkAddress>>,
    max_links: Option<usize>,
}

impl MemoryLinks {
    /// Create an empty store with no link limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that refuses to hold more than `max_links` links.
    pub fn with_limits(max_links: usize) -> Self {
        Self {
            max_links: Some(max_links),
            ..Self::default()
        }
    }

    /// The configured link budget, if any.
    pub fn max_links(&self) -> Option<usize> {
        self.max_links
    }

    /// Iterate over all links in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    fn next_address(&self) -> LinkAddress {
        LinkAddress::new(self.links.len() as u64 + 1)
    }

    fn slot(address: LinkAddress) -> Option<usize> {
        if address.is_null() || address.is_raw() {
            return None;
        }
        usize::try_from(address.get() - 1).ok()
    }

    fn check_endpoint(&self, endpoint: LinkAddress, next: LinkAddress) -> Result<(), StoreError> {
        if endpoint.is_null() {
            return Err(StoreError::NullEndpoint);
        }
        if endpoint.is_raw() || endpoint == next || self.exists(endpoint) {
            return Ok(());
        }
        Err(StoreError::DanglingEndpoint(endpoint))
    }

    fn adjacent<'a>(
        &'a self,
        bucket: Option<&'a Vec<LinkAddress>>,
    ) -> Box<dyn Iterator<Item = Link> + 'a> {
        Box::new(
            bucket
                .into_iter()
                .flatten()
                .filter_map(move |address| self.get(*address)),
        )
    }
}

impl LinkStore for MemoryLinks {
    fn get_or_create(
        &mut self,
        source: LinkAddress,
        target: LinkAddress,
    ) -> Result<LinkAddress, StoreError> {
        if source.is_null() || target.is_null() {
            return Err(StoreError::NullEndpoint);
        }
        if let Some(existing) = self.search(source, target) {
            return Ok(existing);
        }
        let index = self.next_address();
        self.check_endpoint(source, index)?;
        self.check_endpoint(target, index)?;
        if let Some(limit) = self.max_links {
            if self.links.len() >= limit {
                return Err(StoreError::CapacityExceeded { limit });
            }
        }
        self.links.push(Link {
            index,
            source,
            target,
        });
        self.index.insert((source, target), index);
        self.by_source.entry(source).or_default().push(index);
        self.by_target.entry(target).or_default().push(index);
        Ok(index)
    }

    fn get(&self, address: LinkAddress) -> Option<Link> {
        Self::slot(address).and_then(|slot| self.links.get(slot).copied())
    }

    fn search(&self, source: LinkAddress, target: LinkAddress) -> Option<LinkAddress> {
        self.index.get(&(source, target)).copied()
    }

    fn matching(&self, pattern: Pattern) -> Box<dyn Iterator<Item = Link> + '_> {
        match (pattern.source, pattern.target) {
            (Some(source), Some(target)) => Box::new(
                self.search(source, target)
                    .and_then(|address| self.get(address))
                    .into_iter(),
            ),
            (Some(source), None) => self.adjacent(self.by_source.get(&source)),
            (None, Some(target)) => self.adjacent(self.by_target.get(&target)),
            (None, None) => Box::new(self.links.iter().copied()),
        }
    }

    fn len(&self) -> usize {
        self.links.len()
    }
}
