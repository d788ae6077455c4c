// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Elements: `(Element, String)` with an optional children relation.
//!
//! An element has three distinguishable children states:
//!
//! - no children relation at all ("not represented");
//! - `(element, EmptyElementChildrenNodes)` ("known to be empty");
//! - `(element, (ElementChildrenNodes, sequence))`.

use doublet_store::{LinkAddress, LinkStore};
use tracing::debug;

use super::XmlStorage;
use crate::error::{Result, XmlError};
use crate::schema::Marker;

impl<S: LinkStore> XmlStorage<S> {
    /// Get or create the element named `name`, without touching children.
    pub fn create_element(&mut self, name: &str) -> Result<LinkAddress> {
        let string = self.create_string(name)?;
        self.get_or_create(self.marker(Marker::Element), string)
    }

    /// Get or create the element named `name` and attach its children.
    ///
    /// `None` (or a null sequence) records the element as explicitly empty.
    pub fn create_element_with_children(
        &mut self,
        name: &str,
        sequence: Option<LinkAddress>,
    ) -> Result<LinkAddress> {
        let element = self.create_element(name)?;
        let children_nodes = self.create_element_children_nodes(sequence)?;
        self.get_or_create(element, children_nodes)?;
        debug!(%element, %children_nodes, "element children attached");
        Ok(element)
    }

    /// Wrap a children sequence, mapping absence to the empty sentinel.
    pub fn create_element_children_nodes(&mut self, sequence: Option<LinkAddress>) -> Result<LinkAddress> {
        match sequence.filter(|sequence| !sequence.is_null()) {
            None => Ok(self.marker(Marker::EmptyElementChildrenNodes)),
            Some(sequence) => {
                self.get_or_create(self.marker(Marker::ElementChildrenNodes), sequence)
            }
        }
    }

    /// Attach an existing children link (or the empty sentinel) to `element`.
    pub fn attach_element_children_nodes(
        &mut self,
        element: LinkAddress,
        children_nodes: LinkAddress,
    ) -> Result<LinkAddress> {
        self.ensure_is_element(element)?;
        if !self.is_any_element_children_nodes(children_nodes) {
            return Err(XmlError::TypeMismatch {
                address: children_nodes,
                expected: Marker::ElementChildrenNodes,
            });
        }
        self.get_or_create(element, children_nodes)
    }

    /// Decode the name of `element`.
    pub fn element_name(&self, element: LinkAddress) -> Result<String> {
        self.ensure_is_element(element)?;
        let string = self.store.target(element)?;
        self.get_string(string)
    }

    /// The element's children link, or `None` if it has none attached.
    ///
    /// The result is either the `EmptyElementChildrenNodes` sentinel or an
    /// `ElementChildrenNodes` link. With several attached, the first in store
    /// enumeration order wins.
    pub fn element_children_nodes_link_or_default(
        &self,
        element: LinkAddress,
    ) -> Result<Option<LinkAddress>> {
        self.ensure_is_element(element)?;
        Ok(self.first_outgoing_target(element, |target| {
            self.is_any_element_children_nodes(target)
        }))
    }

    /// The sequence behind a children link; `None` for the empty sentinel.
    pub fn element_children_nodes_sequence(
        &self,
        children_nodes: LinkAddress,
    ) -> Result<Option<LinkAddress>> {
        if self.is_empty_element_children_nodes(children_nodes) {
            return Ok(None);
        }
        self.ensure_tag(children_nodes, Marker::ElementChildrenNodes)?;
        Ok(Some(self.store.target(children_nodes)?))
    }

    /// The element's child nodes, in insertion order.
    ///
    /// # Errors
    ///
    /// [`XmlError::TypeMismatch`] if `element` is not an element;
    /// [`XmlError::MissingChildren`] if no children relation is attached.
    /// An explicitly empty element yields an empty list.
    pub fn element_children_nodes(&self, element: LinkAddress) -> Result<Vec<LinkAddress>> {
        let children_nodes = self
            .element_children_nodes_link_or_default(element)?
            .ok_or(XmlError::MissingChildren(element))?;
        Ok(self
            .element_children_nodes_sequence(children_nodes)?
            .map(|sequence| self.children_sequence_nodes(sequence))
            .unwrap_or_default())
    }

    /// Returns `true` if `address` is tagged `Element`.
    pub fn is_element_node(&self, address: LinkAddress) -> bool {
        self.has_tag(address, Marker::Element)
    }

    /// Fail unless `address` is tagged `Element`.
    pub fn ensure_is_element(&self, address: LinkAddress) -> Result<()> {
        self.ensure_tag(address, Marker::Element)
    }

    /// Returns `true` if `address` is tagged `ElementChildrenNodes`.
    pub fn is_element_children_nodes(&self, address: LinkAddress) -> bool {
        self.has_tag(address, Marker::ElementChildrenNodes)
    }

    /// Returns `true` if `address` is the empty-children sentinel.
    pub fn is_empty_element_children_nodes(&self, address: LinkAddress) -> bool {
        address == self.marker(Marker::EmptyElementChildrenNodes)
    }

    fn is_any_element_children_nodes(&self, address: LinkAddress) -> bool {
        self.is_empty_element_children_nodes(address) || self.is_element_children_nodes(address)
    }
}
