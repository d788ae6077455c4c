// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Frequency indexer scaffold.
//!
//! Records how often each adjacent symbol pair occurs in indexed names and
//! text so a future encoder can prefer reusing frequent sub-sequences over
//! building fresh balanced sequences. Only recording is implemented; the
//! query and attach paths return [`XmlError::NotImplemented`].

use doublet_store::{LinkAddress, LinkStore};
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use crate::error::{Result, XmlError};
use crate::codec::UnicodeCodec;
use crate::config::StorageConfig;
use crate::schema::CodecMarkers;

/// Occurrence counts of adjacent `(left, right)` pairs.
#[derive(Clone, Debug, Default)]
pub struct FrequencyCache {
    frequencies: FxHashMap<(LinkAddress, LinkAddress), u64>,
}

impl FrequencyCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// How often `(left, right)` has been seen; `0` if never.
    pub fn frequency(&self, left: LinkAddress, right: LinkAddress) -> u64 {
        self.frequencies.get(&(left, right)).copied().unwrap_or(0)
    }

    /// Count one more occurrence of `(left, right)` and return the new count.
    pub fn increment(&mut self, left: LinkAddress, right: LinkAddress) -> u64 {
        let count = self.frequencies.entry((left, right)).or_insert(0);
        *count += 1;
        *count
    }

    /// Number of distinct pairs seen.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// The pair seen most often, ties broken by the smaller pair.
    pub fn most_frequent(&self) -> Option<((LinkAddress, LinkAddress), u64)> {
        self.frequencies
            .iter()
            .map(|(pair, count)| (*pair, *count))
            .max_by(|(pair_a, a), (pair_b, b)| a.cmp(b).then_with(|| pair_b.cmp(pair_a)))
    }
}

/// Records symbol-pair frequencies for document, element and text content.
#[derive(Debug)]
pub struct XmlIndexer {
    codec: UnicodeCodec,
    cache: FrequencyCache,
}

impl XmlIndexer {
    /// Bootstrap the codec markers in `store` and start with an empty cache.
    #[instrument(skip_all)]
    pub fn new<S: LinkStore + ?Sized>(store: &mut S) -> Result<Self> {
        let config = StorageConfig::default();
        let markers = CodecMarkers::bootstrap(store)?;
        debug!(symbol = %markers.symbol, "indexer ready");
        Ok(Self::with_codec(UnicodeCodec::new(
            markers,
            config.text_cache_capacity,
            config.sequence_cache_capacity,
        )))
    }

    /// Index with a codec built over markers already bootstrapped in the
    /// store that will be passed to the indexing calls.
    pub fn with_codec(codec: UnicodeCodec) -> Self {
        Self {
            codec,
            cache: FrequencyCache::new(),
        }
    }

    /// The codec names and text are converted with.
    pub fn codec(&self) -> &UnicodeCodec {
        &self.codec
    }

    /// The frequency cache.
    pub fn cache(&self) -> &FrequencyCache {
        &self.cache
    }

    /// Convert `text` into its symbol links.
    pub fn to_elements<S: LinkStore + ?Sized>(&self, store: &mut S, text: &str) -> Result<Vec<LinkAddress>> {
        self.codec.text_to_symbols(store, text)
    }

    /// Record every adjacent pair of `sequence` once.
    ///
    /// Returns `true` if every pair had been seen before, i.e. the sequence
    /// was already fully indexed. Sequences shorter than two elements have no
    /// pairs and count as indexed.
    pub fn add(&mut self, sequence: &[LinkAddress]) -> bool {
        let indexed = self.might_contain(sequence);
        for pair in sequence.windows(2) {
            self.cache.increment(pair[0], pair[1]);
        }
        indexed
    }

    /// Returns `true` if every adjacent pair of `sequence` has been seen.
    pub fn might_contain(&self, sequence: &[LinkAddress]) -> bool {
        sequence
            .windows(2)
            .all(|pair| self.cache.frequency(pair[0], pair[1]) > 0)
    }

    /// Index a document name.
    pub fn create_document<S: LinkStore + ?Sized>(&mut self, store: &mut S, name: &str) -> Result<bool> {
        self.index_text(store, name)
    }

    /// Index an element name.
    pub fn create_element<S: LinkStore + ?Sized>(&mut self, store: &mut S, name: &str) -> Result<bool> {
        self.index_text(store, name)
    }

    /// Index text content.
    pub fn create_text_element<S: LinkStore + ?Sized>(
        &mut self,
        store: &mut S,
        content: &str,
    ) -> Result<bool> {
        self.index_text(store, content)
    }

    fn index_text<S: LinkStore + ?Sized>(&mut self, store: &mut S, text: &str) -> Result<bool> {
        let elements = self.to_elements(store, text)?;
        Ok(self.add(&elements))
    }

    /// Look up an indexed document.
    pub fn get_document(&self, _name: &str) -> Result<LinkAddress> {
        Err(XmlError::NotImplemented("XmlIndexer::get_document"))
    }

    /// Look up an indexed element.
    pub fn get_element(&self, _name: &str) -> Result<LinkAddress> {
        Err(XmlError::NotImplemented("XmlIndexer::get_element"))
    }

    /// Look up indexed text content.
    pub fn get_text_element(&self, _content: &str) -> Result<LinkAddress> {
        Err(XmlError::NotImplemented("XmlIndexer::get_text_element"))
    }

    /// Child sequences of an indexed parent.
    pub fn get_children(&self, _parent: LinkAddress) -> Result<Vec<Vec<LinkAddress>>> {
        Err(XmlError::NotImplemented("XmlIndexer::get_children"))
    }

    /// Attach an indexed element to its parent.
    pub fn attach_element_to_parent(
        &mut self,
        _element: LinkAddress,
        _parent: LinkAddress,
    ) -> Result<()> {
        Err(XmlError::NotImplemented("XmlIndexer::attach_element_to_parent"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use doublet_store::MemoryLinks;
    use std::num::NonZeroUsize;

    #[test]
    fn second_add_reports_indexed() {
        let mut store = MemoryLinks::new();
        let mut indexer = XmlIndexer::new(&mut store).unwrap();
        assert!(!indexer.create_element(&mut store, "item").unwrap());
        assert!(indexer.create_element(&mut store, "item").unwrap());
        let symbols = indexer.to_elements(&mut store, "it").unwrap();
        assert_eq!(indexer.cache().frequency(symbols[0], symbols[1]), 2);
    }

    #[test]
    fn repeated_pairs_count_every_occurrence() {
        let mut store = MemoryLinks::new();
        let mut indexer = XmlIndexer::new(&mut store).unwrap();
        indexer.create_text_element(&mut store, "aaa").unwrap();
        let a = indexer.to_elements(&mut store, "a").unwrap()[0];
        assert_eq!(indexer.cache().frequency(a, a), 2);
        assert_eq!(indexer.cache().len(), 1);
        assert_eq!(indexer.cache().most_frequent(), Some(((a, a), 2)));
    }

    #[test]
    fn short_sequences_are_trivially_indexed() {
        let mut store = MemoryLinks::new();
        let mut indexer = XmlIndexer::new(&mut store).unwrap();
        assert!(indexer.create_document(&mut store, "").unwrap());
        assert!(indexer.create_document(&mut store, "x").unwrap());
        assert!(indexer.cache().is_empty());
    }

    #[test]
    fn might_contain_is_read_only() {
        let mut store = MemoryLinks::new();
        let mut indexer = XmlIndexer::new(&mut store).unwrap();
        let symbols = indexer.to_elements(&mut store, "ab").unwrap();
        assert!(!indexer.might_contain(&symbols));
        assert!(indexer.cache().is_empty());
        indexer.add(&symbols);
        assert!(indexer.might_contain(&symbols));
    }

    #[test]
    fn symbols_match_the_storage_codec() {
        let storage = crate::XmlStorage::new(MemoryLinks::new()).unwrap();
        let storage_codec = UnicodeCodec::new(
            storage.codec().markers(),
            NonZeroUsize::MIN,
            NonZeroUsize::MIN,
        );
        let mut store = storage.into_inner();
        let expected = storage_codec.char_to_symbol(&mut store, 'q').unwrap();
        let len = store.len();
        let indexer = XmlIndexer::new(&mut store).unwrap();
        assert_eq!(indexer.to_elements(&mut store, "q").unwrap(), vec![expected]);
        assert_eq!(store.len(), len);
        assert_eq!(indexer.codec().markers(), storage_codec.markers());
    }

    #[test]
    fn query_paths_are_not_implemented() {
        let mut store = MemoryLinks::new();
        let mut indexer = XmlIndexer::new(&mut store).unwrap();
        assert!(matches!(indexer.get_document("d"), Err(XmlError::NotImplemented(_))));
        assert!(matches!(indexer.get_element("e"), Err(XmlError::NotImplemented(_))));
        assert!(matches!(indexer.get_text_element("t"), Err(XmlError::NotImplemented(_))));
        assert!(matches!(
            indexer.get_children(LinkAddress::new(1)),
            Err(XmlError::NotImplemented(_))
        ));
        assert!(matches!(
            indexer.attach_element_to_parent(LinkAddress::new(1), LinkAddress::new(1)),
            Err(XmlError::NotImplemented(_))
        ));
    }
}
