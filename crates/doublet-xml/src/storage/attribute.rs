// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Attribute nodes: `(AttributeNode, (name_sequence, value_sequence))`.
//!
//! Name and value are raw unicode sequences, not `String` records, so
//! decoding reads through one fewer tag level than [`get_string`]. Empty names
//! and values use the `EmptyString` sentinel.
//!
//! [`get_string`]: XmlStorage::get_string

use doublet_store::{LinkAddress, LinkStore};
use serde::{Deserialize, Serialize};

use super::XmlStorage;
use crate::error::Result;
use crate::schema::Marker;

/// A decoded attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

impl Attribute {
    /// Build an attribute from its parts.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<S: LinkStore> XmlStorage<S> {
    /// Get or create the attribute node `name="value"`.
    pub fn create_attribute_node(&mut self, name: &str, value: &str) -> Result<LinkAddress> {
        let name = self.text_or_sentinel(name)?;
        let value = self.text_or_sentinel(value)?;
        self.encode_attribute(name, value)
    }

    /// Get or create the attribute node for an already decoded attribute.
    pub fn create_attribute_node_from(&mut self, attribute: &Attribute) -> Result<LinkAddress> {
        self.create_attribute_node(&attribute.name, &attribute.value)
    }

    fn encode_attribute(&mut self, name: LinkAddress, value: LinkAddress) -> Result<LinkAddress> {
        let pair = self.get_or_create(name, value)?;
        self.get_or_create(self.marker(Marker::AttributeNode), pair)
    }

    /// Decode an attribute node.
    pub fn get_attribute(&self, attribute: LinkAddress) -> Result<Attribute> {
        let (name, value) = self.attribute_sequences(attribute)?;
        Ok(Attribute {
            name: self.sentinel_or_text(name)?,
            value: self.sentinel_or_text(value)?,
        })
    }

    /// Decode only the attribute's name.
    pub fn attribute_name(&self, attribute: LinkAddress) -> Result<String> {
        let (name, _) = self.attribute_sequences(attribute)?;
        self.sentinel_or_text(name)
    }

    /// Decode only the attribute's value.
    pub fn attribute_value(&self, attribute: LinkAddress) -> Result<String> {
        let (_, value) = self.attribute_sequences(attribute)?;
        self.sentinel_or_text(value)
    }

    fn attribute_sequences(&self, attribute: LinkAddress) -> Result<(LinkAddress, LinkAddress)> {
        self.ensure_is_attribute_node(attribute)?;
        let pair = self.store.target(attribute)?;
        Ok((self.store.source(pair)?, self.store.target(pair)?))
    }

    /// Returns `true` if `address` is tagged `AttributeNode`.
    pub fn is_attribute_node(&self, address: LinkAddress) -> bool {
        self.has_tag(address, Marker::AttributeNode)
    }

    /// Fail unless `address` is tagged `AttributeNode`.
    pub fn ensure_is_attribute_node(&self, address: LinkAddress) -> Result<()> {
        self.ensure_tag(address, Marker::AttributeNode)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use doublet_store::MemoryLinks;

    use super::*;
    use crate::error::XmlError;

    fn storage() -> XmlStorage<MemoryLinks> {
        XmlStorage::new(MemoryLinks::new()).unwrap()
    }

    #[test]
    fn both_entry_points_share_one_encoding() {
        let mut storage = storage();
        let by_parts = storage.create_attribute_node("name", "x").unwrap();
        let by_value = storage
            .create_attribute_node_from(&Attribute::new("name", "x"))
            .unwrap();
        assert_eq!(by_parts, by_value);
        assert_eq!(storage.get_attribute(by_parts).unwrap(), Attribute::new("name", "x"));
    }

    #[test]
    fn name_and_value_are_read_separately() {
        let mut storage = storage();
        let attribute = storage.create_attribute_node("lang", "en").unwrap();
        assert_eq!(storage.attribute_name(attribute).unwrap(), "lang");
        assert_eq!(storage.attribute_value(attribute).unwrap(), "en");
    }

    #[test]
    fn swapped_name_and_value_are_different_attributes() {
        let mut storage = storage();
        let ab = storage.create_attribute_node("a", "b").unwrap();
        let ba = storage.create_attribute_node("b", "a").unwrap();
        assert_ne!(ab, ba);
        assert_eq!(storage.get_attribute(ba).unwrap(), Attribute::new("b", "a"));
    }

    #[test]
    fn empty_value_round_trips() {
        let mut storage = storage();
        let attribute = storage.create_attribute_node("checked", "").unwrap();
        assert_eq!(storage.get_attribute(attribute).unwrap(), Attribute::new("checked", ""));
    }

    #[test]
    fn attribute_uses_raw_sequences() {
        let mut storage = storage();
        let attribute = storage.create_attribute_node("k", "v").unwrap();
        let pair = storage.store().target(attribute).unwrap();
        let name = storage.store().source(pair).unwrap();
        assert!(!storage.is_string(name));
        assert!(storage.codec().is_sequence(storage.store(), name));
    }

    #[test]
    fn decoding_rejects_non_attributes() {
        let mut storage = storage();
        let text = storage.create_text_node("t").unwrap();
        assert!(matches!(
            storage.attribute_value(text),
            Err(XmlError::TypeMismatch {
                expected: Marker::AttributeNode,
                ..
            })
        ));
    }
}
