// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Strings: `(String, sequence | EmptyString)`.

use doublet_store::{LinkAddress, LinkStore};

use super::XmlStorage;
use crate::error::Result;
use crate::schema::Marker;

impl<S: LinkStore> XmlStorage<S> {
    /// Get or create the string record for `text`.
    ///
    /// Zero-length text is stored against the `EmptyString` sentinel.
    pub fn create_string(&mut self, text: &str) -> Result<LinkAddress> {
        let sequence = self.text_or_sentinel(text)?;
        self.get_or_create(self.marker(Marker::String), sequence)
    }

    /// Find the string record for `text` without creating anything.
    pub fn get_string_or_default(&self, text: &str) -> Option<LinkAddress> {
        let sequence = if text.is_empty() {
            self.marker(Marker::EmptyString)
        } else {
            self.codec.search_sequence(&self.store, text)?
        };
        self.store.search(self.marker(Marker::String), sequence)
    }

    /// Returns `true` if a string record for `text` exists.
    pub fn string_exists(&self, text: &str) -> bool {
        self.get_string_or_default(text).is_some()
    }

    /// Returns `true` if `address` is tagged `String`.
    pub fn is_string(&self, address: LinkAddress) -> bool {
        self.has_tag(address, Marker::String)
    }

    /// Fail unless `address` is tagged `String`.
    pub fn ensure_is_string(&self, address: LinkAddress) -> Result<()> {
        self.ensure_tag(address, Marker::String)
    }

    /// Decode a string record.
    pub fn get_string(&self, address: LinkAddress) -> Result<String> {
        self.ensure_is_string(address)?;
        let sequence = self.store.target(address)?;
        self.sentinel_or_text(sequence)
    }
}
