// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Type schema bootstrap.
//!
//! Every domain concept is tagged by a *marker* link `(Type, name)` where
//! `Type` is the self-referencing root `(1, 1)` and `name` is the unicode
//! sequence of the marker's key. Marker identity is derived from the key, not
//! from its position in [`Marker::ALL`], so reordering or extending the table
//! never moves an existing marker. Bootstrapping against a populated store
//! resolves to the same addresses and creates nothing.
//!
//! The two codec markers (unicode symbol, unicode sequence) cannot be named by
//! a unicode sequence before the codec exists; they are keyed by fixed raw
//! numbers instead.

use doublet_store::{LinkAddress, LinkStore, Pattern};
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use crate::codec::UnicodeCodec;
use crate::error::Result;

/// Address the type root is created from; on an empty store the root is the
/// point `(1, 1)` at address `1`.
pub const TYPE_ROOT: LinkAddress = LinkAddress::new(1);

/// Current schema version, recorded in the store at bootstrap.
pub const SCHEMA_VERSION: u32 = 1;

const UNICODE_SYMBOL_KEY: u32 = 1;
const UNICODE_SEQUENCE_KEY: u32 = 2;
const SCHEMA_VERSION_KEY: u32 = 3;

/// Domain concept markers.
///
/// The numeric/temporal markers are reserved: they are bootstrapped so their
/// addresses are stable, but no operation in this crate produces them yet.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Marker {
    /// A document: `(Document, DocumentName)`.
    Document,
    /// A document name: `(DocumentName, String)`.
    DocumentName,
    /// An element: `(Element, String)`.
    Element,
    /// Element children: `(ElementChildrenNodes, sequence)`.
    ElementChildrenNodes,
    /// Sentinel for "element known to have no children".
    EmptyElementChildrenNodes,
    /// Document children: `(DocumentChildrenNodes, sequence)`.
    DocumentChildrenNodes,
    /// A text node: `(TextNode, String)`.
    TextNode,
    /// An attribute: `(AttributeNode, (name, value))`.
    AttributeNode,
    /// Reserved for object values.
    Object,
    /// Reserved for object members.
    Member,
    /// Reserved for generic values.
    Value,
    /// A string: `(String, sequence | EmptyString)`.
    String,
    /// Reserved for integers.
    Integer,
    /// Reserved for decimals.
    Decimal,
    /// Reserved for durations.
    Duration,
    /// Reserved for date-times.
    DateTime,
    /// Reserved for dates.
    Date,
    /// Reserved for times.
    Time,
    /// Sentinel for zero-length text.
    EmptyString,
    /// Reserved for numbers.
    Number,
    /// Reserved for negative numbers.
    NegativeNumber,
    /// Reserved for arrays.
    Array,
    /// Reserved sentinel for empty arrays.
    EmptyArray,
    /// Reserved for `true`.
    True,
    /// Reserved for `false`.
    False,
    /// Reserved for `null`.
    Null,
}

impl Marker {
    /// Number of markers.
    pub const COUNT: usize = 26;

    /// Every marker, in bootstrap order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Document,
        Self::DocumentName,
        Self::Element,
        Self::ElementChildrenNodes,
        Self::EmptyElementChildrenNodes,
        Self::DocumentChildrenNodes,
        Self::TextNode,
        Self::AttributeNode,
        Self::Object,
        Self::Member,
        Self::Value,
        Self::String,
        Self::Integer,
        Self::Decimal,
        Self::Duration,
        Self::DateTime,
        Self::Date,
        Self::Time,
        Self::EmptyString,
        Self::Number,
        Self::NegativeNumber,
        Self::Array,
        Self::EmptyArray,
        Self::True,
        Self::False,
        Self::Null,
    ];

    /// Stable schema key. Changing a key changes the marker's identity.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Document => "DocumentType",
            Self::DocumentName => "DocumentNameType",
            Self::Element => "ElementType",
            Self::ElementChildrenNodes => "ElementChildrenNodesType",
            Self::EmptyElementChildrenNodes => "EmptyElementChildrenNodesType",
            Self::DocumentChildrenNodes => "DocumentChildrenNodesType",
            Self::TextNode => "TextNodeType",
            Self::AttributeNode => "AttributeNodeType",
            Self::Object => "ObjectType",
            Self::Member => "MemberType",
            Self::Value => "ValueType",
            Self::String => "StringType",
            Self::Integer => "IntegerType",
            Self::Decimal => "DecimalType",
            Self::Duration => "DurationType",
            Self::DateTime => "DateTimeType",
            Self::Date => "DateType",
            Self::Time => "TimeType",
            Self::EmptyString => "EmptyStringType",
            Self::Number => "NumberType",
            Self::NegativeNumber => "NegativeNumberType",
            Self::Array => "ArrayType",
            Self::EmptyArray => "EmptyArrayType",
            Self::True => "TrueType",
            Self::False => "FalseType",
            Self::Null => "NullType",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Addresses the unicode codec depends on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CodecMarkers {
    /// The `Type` root every marker hangs off.
    pub type_root: LinkAddress,
    /// Target of every symbol link.
    pub symbol: LinkAddress,
    /// Target of every unicode sequence link.
    pub sequence: LinkAddress,
}

impl CodecMarkers {
    /// Resolve (creating on first use) the type root and the codec markers.
    pub fn bootstrap<S: LinkStore + ?Sized>(store: &mut S) -> Result<Self> {
        let type_root = store.get_or_create(TYPE_ROOT, TYPE_ROOT)?;
        let symbol = store.get_or_create(type_root, LinkAddress::raw(UNICODE_SYMBOL_KEY))?;
        let sequence = store.get_or_create(type_root, LinkAddress::raw(UNICODE_SEQUENCE_KEY))?;
        Ok(Self {
            type_root,
            symbol,
            sequence,
        })
    }
}

/// Resolved marker addresses for one store.
#[derive(Clone, Debug)]
pub struct Schema {
    codec: CodecMarkers,
    version_marker: LinkAddress,
    markers: [LinkAddress; Marker::COUNT],
    by_address: FxHashMap<LinkAddress, Marker>,
}

impl Schema {
    /// Resolve every marker, creating the missing ones.
    ///
    /// Idempotent: a second run against the same store returns identical
    /// addresses and leaves the store untouched.
    #[instrument(skip_all)]
    pub fn bootstrap<S: LinkStore + ?Sized>(store: &mut S, codec: &UnicodeCodec) -> Result<Self> {
        let before = store.len();
        let markers_in = codec.markers();
        let type_root = markers_in.type_root;
        let version_marker =
            store.get_or_create(type_root, LinkAddress::raw(SCHEMA_VERSION_KEY))?;
        store.get_or_create(version_marker, LinkAddress::raw(SCHEMA_VERSION))?;

        let mut markers = [LinkAddress::NULL; Marker::COUNT];
        let mut by_address = FxHashMap::default();
        for marker in Marker::ALL {
            let name = codec.text_to_sequence(store, marker.key())?;
            let address = store.get_or_create(type_root, name)?;
            markers[marker.slot()] = address;
            by_address.insert(address, marker);
        }
        debug!(
            created = store.len() - before,
            version = SCHEMA_VERSION,
            "schema bootstrapped"
        );
        Ok(Self {
            codec: markers_in,
            version_marker,
            markers,
            by_address,
        })
    }

    /// Address of `marker`.
    pub fn get(&self, marker: Marker) -> LinkAddress {
        self.markers[marker.slot()]
    }

    /// The `Type` root.
    pub fn type_root(&self) -> LinkAddress {
        self.codec.type_root
    }

    /// The codec markers this schema was bootstrapped with.
    pub fn codec_markers(&self) -> CodecMarkers {
        self.codec
    }

    /// The marker an address *is*, if it is one.
    pub fn marker_at(&self, address: LinkAddress) -> Option<Marker> {
        self.by_address.get(&address).copied()
    }

    /// The marker an entity is tagged with (its source), if any.
    pub fn tag_of<S: LinkStore + ?Sized>(&self, store: &S, address: LinkAddress) -> Option<Marker> {
        store
            .get(address)
            .and_then(|link| self.marker_at(link.source))
    }

    /// Every schema version ever bootstrapped into `store`, in the order they
    /// were first recorded.
    pub fn recorded_versions<S: LinkStore + ?Sized>(&self, store: &S) -> Vec<u64> {
        store
            .matching(Pattern::outgoing(self.version_marker))
            .filter_map(|link| link.target.as_raw())
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use doublet_store::MemoryLinks;
    use std::collections::HashSet;
    use std::num::NonZeroUsize;

    fn bootstrap(store: &mut MemoryLinks) -> Schema {
        let markers = CodecMarkers::bootstrap(store).unwrap();
        let codec = UnicodeCodec::new(markers, NonZeroUsize::MIN, NonZeroUsize::MIN);
        Schema::bootstrap(store, &codec).unwrap()
    }

    #[test]
    fn type_root_is_a_point_on_fresh_store() {
        let mut store = MemoryLinks::new();
        let schema = bootstrap(&mut store);
        assert_eq!(schema.type_root(), TYPE_ROOT);
        assert!(store.get(TYPE_ROOT).unwrap().is_point());
    }

    #[test]
    fn bootstrap_is_idempotent() {
        let mut store = MemoryLinks::new();
        let first = bootstrap(&mut store);
        let len = store.len();
        let second = bootstrap(&mut store);
        assert_eq!(store.len(), len);
        for marker in Marker::ALL {
            assert_eq!(first.get(marker), second.get(marker), "{marker}");
        }
        assert_eq!(second.recorded_versions(&store), vec![u64::from(SCHEMA_VERSION)]);
    }

    #[test]
    fn markers_are_distinct_and_tagged_by_type() {
        let mut store = MemoryLinks::new();
        let schema = bootstrap(&mut store);
        let addresses: HashSet<_> = Marker::ALL.iter().map(|m| schema.get(*m)).collect();
        assert_eq!(addresses.len(), Marker::COUNT);
        for marker in Marker::ALL {
            let address = schema.get(marker);
            assert_eq!(store.source(address).unwrap(), schema.type_root());
            assert_eq!(schema.marker_at(address), Some(marker));
        }
    }

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<_> = Marker::ALL.iter().map(|m| m.key()).collect();
        assert_eq!(keys.len(), Marker::COUNT);
        for (slot, marker) in Marker::ALL.iter().enumerate() {
            assert_eq!(marker.slot(), slot);
        }
    }
}
