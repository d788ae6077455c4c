// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Content-addressed relation store.
//!
//! `doublet-store` provides a [`LinkStore`] trait for storing immutable
//! `(source, target)` records ("links" or "doublets"). Every link is identified
//! by a positive integer [`LinkAddress`]; `0` is reserved as the null address.
//! Phase 1 ships [`MemoryLinks`], an arena-backed in-memory store.
//!
//! # Content Addressing
//!
//! Creating a link whose `(source, target)` pair already exists returns the
//! existing address. Two requests for the same pair never produce two records.
//! Deduplication is the point: identical substructures collapse to one link.
//!
//! # Raw Numbers
//!
//! An address with the high bit set is a *raw number*, an external value that
//! is not a link. Raw numbers may be used as endpoints (the symbol codec stores
//! code points this way) but are never returned as link identities.
//!
//! # Enumeration Order
//!
//! [`LinkStore::matching`] yields links in an implementation-defined order.
//! [`MemoryLinks`] guarantees creation order; other implementations may not.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::use_self
)]

mod memory;
pub use memory::MemoryLinks;

/// High bit marking an address as an external raw number.
const RAW_FLAG: u64 = 1 << 63;

/// Address of a link, or a raw number when the high bit is set.
///
/// Thin newtype over `u64`. The inner value is public for zero-cost access;
/// the `Display` impl renders raw numbers as `raw(n)` so log lines never
/// confuse the two spaces.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct LinkAddress(pub u64);

impl LinkAddress {
    /// The null address. Never identifies a link.
    pub const NULL: Self = Self(0);

    /// Build a link address from its 1-based index.
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// Encode `value` as a raw number.
    pub const fn raw(value: u32) -> Self {
        Self(RAW_FLAG | value as u64)
    }

    /// Returns `true` for the null address.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if this address carries a raw number.
    pub const fn is_raw(self) -> bool {
        self.0 & RAW_FLAG != 0
    }

    /// Decode the raw number, or `None` if this is a link address.
    pub const fn as_raw(self) -> Option<u64> {
        if self.is_raw() {
            Some(self.0 & !RAW_FLAG)
        } else {
            None
        }
    }

    /// The underlying integer.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for LinkAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_raw() {
            Some(value) => write!(f, "raw({value})"),
            None => write!(f, "{}", self.0),
        }
    }
}

/// An immutable `(source, target)` record together with its own address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Link {
    /// Address of this link.
    pub index: LinkAddress,
    /// First element of the pair.
    pub source: LinkAddress,
    /// Second element of the pair.
    pub target: LinkAddress,
}

impl Link {
    /// Returns `true` if both endpoints refer to this link itself.
    pub fn is_point(&self) -> bool {
        self.source == self.index && self.target == self.index
    }
}

/// Query pattern for [`LinkStore::matching`]. `None` fields match anything.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Pattern {
    /// Required source, or any.
    pub source: Option<LinkAddress>,
    /// Required target, or any.
    pub target: Option<LinkAddress>,
}

impl Pattern {
    /// Matches every link in the store.
    pub const ANY: Self = Self {
        source: None,
        target: None,
    };

    /// Links whose source is `source` (outgoing relations).
    pub const fn outgoing(source: LinkAddress) -> Self {
        Self {
            source: Some(source),
            target: None,
        }
    }

    /// Links whose target is `target` (incoming relations).
    pub const fn incoming(target: LinkAddress) -> Self {
        Self {
            source: None,
            target: Some(target),
        }
    }

    /// The single link `(source, target)`, if present.
    pub const fn exact(source: LinkAddress, target: LinkAddress) -> Self {
        Self {
            source: Some(source),
            target: Some(target),
        }
    }

    /// Returns `true` if `link` satisfies this pattern.
    pub fn matches(&self, link: &Link) -> bool {
        self.source.is_none_or(|s| s == link.source)
            && self.target.is_none_or(|t| t == link.target)
    }
}

/// Errors that can occur during store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No link lives at the given address.
    #[error("[LINK_NOT_FOUND] no link at address {0}")]
    NotFound(LinkAddress),
    /// The null address was passed as an endpoint.
    #[error("[LINK_NULL_ENDPOINT] null address cannot be a link endpoint")]
    NullEndpoint,
    /// An endpoint refers to a link that does not exist.
    #[error("[LINK_DANGLING_ENDPOINT] endpoint {0} does not exist")]
    DanglingEndpoint(LinkAddress),
    /// The store refused to grow past its configured budget.
    #[error("[LINK_CAPACITY_EXCEEDED] store is limited to {limit} links")]
    CapacityExceeded {
        /// Configured maximum number of links.
        limit: usize,
    },
}

/// Content-addressed store of `(source, target)` links.
///
/// The trait is synchronous and object-safe. Links are never deleted or
/// mutated; the store is the sole owner of link lifetime and callers hold
/// plain addresses.
///
/// # Absence Semantics
///
/// [`get`](LinkStore::get) and [`search`](LinkStore::search) return `None`
/// for missing links. That is the null sentinel, **not** an error. The
/// convenience accessors [`source`](LinkStore::source) and
/// [`target`](LinkStore::target) fail loudly instead.
pub trait LinkStore {
    /// Return the link `(source, target)`, creating it if absent.
    ///
    /// An endpoint may be a raw number, an existing link, or the address the
    /// new link is about to receive (a self reference).
    ///
    /// # Errors
    ///
    /// [`StoreError::NullEndpoint`], [`StoreError::DanglingEndpoint`] or
    /// [`StoreError::CapacityExceeded`]. On error the store is unchanged.
    fn get_or_create(
        &mut self,
        source: LinkAddress,
        target: LinkAddress,
    ) -> Result<LinkAddress, StoreError>;

    /// Retrieve the link at `address`.
    fn get(&self, address: LinkAddress) -> Option<Link>;

    /// Find the link `(source, target)` without creating it.
    fn search(&self, source: LinkAddress, target: LinkAddress) -> Option<LinkAddress>;

    /// Lazily enumerate links matching `pattern`.
    ///
    /// The iterator is finite and can be abandoned at any point; callers stop
    /// on the first match with [`Iterator::find`].
    fn matching(&self, pattern: Pattern) -> Box<dyn Iterator<Item = Link> + '_>;

    /// Number of links stored.
    fn len(&self) -> usize;

    /// Returns `true` if no links are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if a link lives at `address`.
    fn exists(&self, address: LinkAddress) -> bool {
        self.get(address).is_some()
    }

    /// Source of the link at `address`.
    fn source(&self, address: LinkAddress) -> Result<LinkAddress, StoreError> {
        self.get(address)
            .map(|link| link.source)
            .ok_or(StoreError::NotFound(address))
    }

    /// Target of the link at `address`.
    fn target(&self, address: LinkAddress) -> Result<LinkAddress, StoreError> {
        self.get(address)
            .map(|link| link.target)
            .ok_or(StoreError::NotFound(address))
    }

    /// Count links matching `pattern`.
    fn count(&self, pattern: Pattern) -> usize {
        self.matching(pattern).count()
    }
}
