// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Text ↔ unicode sequence conversion with bounded caches.
//!
//! A character is stored as the symbol link `(raw(code_point), SymbolMarker)`.
//! A non-empty string is stored as `(balanced(symbols), SequenceMarker)`.

use std::cell::RefCell;
use std::num::NonZeroUsize;

use doublet_store::{LinkAddress, LinkStore};
use lru::LruCache;
use tracing::trace;

use super::balanced::balanced_sequence;
use crate::error::{Result, XmlError};
use crate::schema::CodecMarkers;
use crate::walker::SequenceWalker;

/// Converts between native text and unicode sequence links.
///
/// Both directions are memoised in LRU caches. Links are immutable, so a
/// cached mapping stays valid for the lifetime of the store the codec was
/// bootstrapped against; the codec must not be shared between stores.
pub struct UnicodeCodec {
    markers: CodecMarkers,
    to_sequence: RefCell<LruCache<String, LinkAddress>>,
    to_text: RefCell<LruCache<LinkAddress, String>>,
}

impl UnicodeCodec {
    /// Create a codec over previously bootstrapped markers.
    pub fn new(
        markers: CodecMarkers,
        text_cache_capacity: NonZeroUsize,
        sequence_cache_capacity: NonZeroUsize,
    ) -> Self {
        Self {
            markers,
            to_sequence: RefCell::new(LruCache::new(text_cache_capacity)),
            to_text: RefCell::new(LruCache::new(sequence_cache_capacity)),
        }
    }

    /// Markers this codec tags symbols and sequences with.
    pub fn markers(&self) -> CodecMarkers {
        self.markers
    }

    /// Returns `true` if `address` is a unicode symbol link.
    pub fn is_symbol<S: LinkStore + ?Sized>(&self, store: &S, address: LinkAddress) -> bool {
        store
            .get(address)
            .is_some_and(|link| link.target == self.markers.symbol && link.source.is_raw())
    }

    /// Returns `true` if `address` is a unicode sequence link.
    pub fn is_sequence<S: LinkStore + ?Sized>(&self, store: &S, address: LinkAddress) -> bool {
        store
            .get(address)
            .is_some_and(|link| link.target == self.markers.sequence)
    }

    /// Get or create the symbol link for `ch`.
    pub fn char_to_symbol<S: LinkStore + ?Sized>(
        &self,
        store: &mut S,
        ch: char,
    ) -> Result<LinkAddress> {
        Ok(store.get_or_create(LinkAddress::raw(u32::from(ch)), self.markers.symbol)?)
    }

    /// Decode a symbol link back into its character.
    pub fn symbol_to_char<S: LinkStore + ?Sized>(
        &self,
        store: &S,
        symbol: LinkAddress,
    ) -> Result<char> {
        let link = store
            .get(symbol)
            .filter(|link| link.target == self.markers.symbol)
            .ok_or(XmlError::InvalidSymbol(symbol))?;
        link.source
            .as_raw()
            .and_then(|code| u32::try_from(code).ok())
            .and_then(char::from_u32)
            .ok_or(XmlError::InvalidSymbol(symbol))
    }

    /// Convert every character of `text` into its symbol link.
    pub fn text_to_symbols<S: LinkStore + ?Sized>(
        &self,
        store: &mut S,
        text: &str,
    ) -> Result<Vec<LinkAddress>> {
        text.chars()
            .map(|ch| self.char_to_symbol(store, ch))
            .collect()
    }

    /// Get or create the unicode sequence for `text`.
    ///
    /// # Errors
    ///
    /// [`XmlError::EmptySequence`] for `""`; callers that accept empty text
    /// substitute a sentinel first.
    pub fn text_to_sequence<S: LinkStore + ?Sized>(
        &self,
        store: &mut S,
        text: &str,
    ) -> Result<LinkAddress> {
        if let Some(hit) = self.to_sequence.borrow_mut().get(text) {
            return Ok(*hit);
        }
        trace!(len = text.len(), "text cache miss");
        let symbols = self.text_to_symbols(store, text)?;
        let body = balanced_sequence(store, &symbols)?;
        let sequence = store.get_or_create(body, self.markers.sequence)?;
        self.to_sequence.borrow_mut().put(text.to_owned(), sequence);
        Ok(sequence)
    }

    /// Find the unicode sequence for `text` without creating anything.
    pub fn search_sequence<S: LinkStore + ?Sized>(&self, store: &S, text: &str) -> Option<LinkAddress> {
        if let Some(hit) = self.to_sequence.borrow_mut().get(text) {
            return Some(*hit);
        }
        let mut level = Vec::with_capacity(text.len());
        for ch in text.chars() {
            level.push(store.search(LinkAddress::raw(u32::from(ch)), self.markers.symbol)?);
        }
        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            for pair in level.chunks(2) {
                match *pair {
                    [left, right] => next.push(store.search(left, right)?),
                    [single] => next.push(single),
                    _ => {}
                }
            }
            level = next;
        }
        let body = level.first().copied()?;
        store.search(body, self.markers.sequence)
    }

    /// Decode a unicode sequence back into text.
    pub fn sequence_to_text<S: LinkStore + ?Sized>(
        &self,
        store: &S,
        sequence: LinkAddress,
    ) -> Result<String> {
        if let Some(hit) = self.to_text.borrow_mut().get(&sequence) {
            return Ok(hit.clone());
        }
        let body = store
            .get(sequence)
            .filter(|link| link.target == self.markers.sequence)
            .ok_or(XmlError::NotASequence(sequence))?
            .source;
        trace!(%sequence, "sequence cache miss");
        let text = SequenceWalker::new(store, body, |address| self.is_symbol(store, address))
            .map(|symbol| self.symbol_to_char(store, symbol))
            .collect::<Result<String>>()?;
        self.to_text.borrow_mut().put(sequence, text.clone());
        Ok(text)
    }
}

impl std::fmt::Debug for UnicodeCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnicodeCodec")
            .field("markers", &self.markers)
            .field("cached_texts", &self.to_sequence.borrow().len())
            .field("cached_sequences", &self.to_text.borrow().len())
            .finish()
    }
}
