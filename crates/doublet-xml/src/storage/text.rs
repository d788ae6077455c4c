// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Text nodes: `(TextNode, String)`.

use doublet_store::{LinkAddress, LinkStore};

use super::XmlStorage;
use crate::error::Result;
use crate::schema::Marker;

impl<S: LinkStore> XmlStorage<S> {
    /// Get or create the text node holding `text`.
    pub fn create_text_node(&mut self, text: &str) -> Result<LinkAddress> {
        let string = self.create_string(text)?;
        self.get_or_create(self.marker(Marker::TextNode), string)
    }

    /// Decode a text node.
    pub fn get_text_node(&self, text_node: LinkAddress) -> Result<String> {
        self.ensure_is_text_node(text_node)?;
        let string = self.store.target(text_node)?;
        self.get_string(string)
    }

    /// Returns `true` if `address` is tagged `TextNode`.
    pub fn is_text_node(&self, address: LinkAddress) -> bool {
        self.has_tag(address, Marker::TextNode)
    }

    /// Fail unless `address` is tagged `TextNode`.
    pub fn ensure_is_text_node(&self, address: LinkAddress) -> Result<()> {
        self.ensure_tag(address, Marker::TextNode)
    }
}
