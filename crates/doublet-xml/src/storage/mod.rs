// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Document model codec.
//!
//! [`XmlStorage`] owns a [`LinkStore`], bootstraps the [`Schema`] into it and
//! exposes get-or-create / get / validate operations for strings, documents,
//! elements, text nodes and attribute nodes. Every `create_*` is idempotent
//! and content-addressed; every `is_*` classifies by the link's source tag and
//! every `ensure_is_*` turns a failed classification into
//! [`XmlError::TypeMismatch`].
//!
//! Operations are split by entity across the submodules; all of them are
//! inherent methods on [`XmlStorage`].

mod attribute;
mod document;
mod element;
mod string;
mod text;

pub use attribute::Attribute;

use doublet_store::{LinkAddress, LinkStore, MemoryLinks, Pattern};
use tracing::{info, instrument};

use crate::codec::{balanced_sequence, UnicodeCodec};
use crate::config::{ConfigService, ConfigStore, StorageConfig, STORAGE_CONFIG_KEY};
use crate::error::{Result, XmlError};
use crate::schema::{CodecMarkers, Marker, Schema};
use crate::walker::SequenceWalker;

/// Document trees stored as links.
#[derive(Debug)]
pub struct XmlStorage<S> {
    store: S,
    codec: UnicodeCodec,
    schema: Schema,
}

impl XmlStorage<MemoryLinks> {
    /// Open a fresh in-memory store sized by `config`.
    pub fn in_memory(config: &StorageConfig) -> Result<Self> {
        let store = config
            .max_links
            .map_or_else(MemoryLinks::new, MemoryLinks::with_limits);
        Self::with_config(store, config)
    }

    /// Open a fresh in-memory store sized by the settings `service` holds
    /// under [`STORAGE_CONFIG_KEY`]; defaults if none are stored.
    ///
    /// # Errors
    ///
    /// [`XmlError::Config`] if the settings cannot be read or parsed.
    pub fn from_config<C: ConfigStore>(service: &ConfigService<C>) -> Result<Self> {
        let config = service.load(STORAGE_CONFIG_KEY)?;
        Self::in_memory(&config)
    }
}

impl<S: LinkStore> XmlStorage<S> {
    /// Wrap `store` using the default configuration.
    pub fn new(store: S) -> Result<Self> {
        Self::with_config(store, &StorageConfig::default())
    }

    /// Wrap `store`, bootstrapping the codec markers and the schema.
    ///
    /// Opening the same store twice yields the same marker addresses.
    #[instrument(skip_all)]
    pub fn with_config(mut store: S, config: &StorageConfig) -> Result<Self> {
        let markers = CodecMarkers::bootstrap(&mut store)?;
        let codec = UnicodeCodec::new(
            markers,
            config.text_cache_capacity,
            config.sequence_cache_capacity,
        );
        let schema = Schema::bootstrap(&mut store, &codec)?;
        info!(links = store.len(), "xml storage ready");
        Ok(Self {
            store,
            codec,
            schema,
        })
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the storage and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// The bootstrapped schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The unicode codec bound to this store.
    pub fn codec(&self) -> &UnicodeCodec {
        &self.codec
    }

    /// Address of a schema marker.
    pub fn marker(&self, marker: Marker) -> LinkAddress {
        self.schema.get(marker)
    }

    /// The marker `address` is tagged with, if any.
    pub fn tag_of(&self, address: LinkAddress) -> Option<Marker> {
        self.schema.tag_of(&self.store, address)
    }

    /// Get or create the unicode sequence for non-empty `text`.
    pub fn text_to_sequence(&mut self, text: &str) -> Result<LinkAddress> {
        self.codec.text_to_sequence(&mut self.store, text)
    }

    /// Decode a unicode sequence.
    pub fn sequence_to_text(&self, sequence: LinkAddress) -> Result<String> {
        self.codec.sequence_to_text(&self.store, sequence)
    }

    /// Fold `records` into one balanced sequence link.
    pub fn sequence_of_records(&mut self, records: &[LinkAddress]) -> Result<LinkAddress> {
        balanced_sequence(&mut self.store, records)
    }

    /// Returns `true` iff `address` is an element, text or attribute node.
    pub fn is_node(&self, address: LinkAddress) -> bool {
        self.is_element_node(address) || self.is_text_node(address) || self.is_attribute_node(address)
    }

    /// Encode an ordered node list as a children sequence.
    ///
    /// Returns `None` for an empty list: a sequence cannot hold zero
    /// elements, so callers choose between the empty-children sentinel and
    /// omitting the relation.
    ///
    /// # Errors
    ///
    /// [`XmlError::InvalidArgument`] if any item is not a node.
    pub fn create_children_sequence(&mut self, nodes: &[LinkAddress]) -> Result<Option<LinkAddress>> {
        if let Some(bad) = nodes.iter().find(|node| !self.is_node(**node)) {
            return Err(XmlError::InvalidArgument(format!(
                "{bad} is not an element, text or attribute node"
            )));
        }
        if nodes.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.sequence_of_records(nodes)?))
    }

    /// Decode a children sequence into its nodes, in insertion order.
    pub fn children_sequence_nodes(&self, sequence: LinkAddress) -> Vec<LinkAddress> {
        SequenceWalker::new(&self.store, sequence, |address| self.is_node(address)).collect()
    }

    pub(crate) fn has_tag(&self, address: LinkAddress, marker: Marker) -> bool {
        self.store
            .get(address)
            .is_some_and(|link| link.source == self.schema.get(marker))
    }

    pub(crate) fn ensure_tag(&self, address: LinkAddress, marker: Marker) -> Result<()> {
        if address.is_null() {
            return Err(XmlError::InvalidArgument(format!(
                "null address where {marker} was required"
            )));
        }
        if self.has_tag(address, marker) {
            Ok(())
        } else {
            Err(XmlError::TypeMismatch {
                address,
                expected: marker,
            })
        }
    }

    /// First outgoing relation of `owner` whose target satisfies `accept`.
    ///
    /// Scans in store enumeration order; with several matches the first one
    /// wins. [`MemoryLinks`] enumerates in creation order.
    pub(crate) fn first_outgoing_target(
        &self,
        owner: LinkAddress,
        mut accept: impl FnMut(LinkAddress) -> bool,
    ) -> Option<LinkAddress> {
        self.store
            .matching(Pattern::outgoing(owner))
            .map(|link| link.target)
            .find(|target| accept(*target))
    }

    /// Unicode sequence for `text`, or the empty-string sentinel for `""`.
    pub(crate) fn text_or_sentinel(&mut self, text: &str) -> Result<LinkAddress> {
        if text.is_empty() {
            Ok(self.schema.get(Marker::EmptyString))
        } else {
            self.text_to_sequence(text)
        }
    }

    /// Inverse of [`text_or_sentinel`](Self::text_or_sentinel).
    pub(crate) fn sentinel_or_text(&self, sequence: LinkAddress) -> Result<String> {
        if sequence == self.schema.get(Marker::EmptyString) {
            Ok(String::new())
        } else {
            self.sequence_to_text(sequence)
        }
    }

    pub(crate) fn get_or_create(
        &mut self,
        source: LinkAddress,
        target: LinkAddress,
    ) -> Result<LinkAddress> {
        Ok(self.store.get_or_create(source, target)?)
    }
}
