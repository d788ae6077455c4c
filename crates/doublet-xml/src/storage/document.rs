// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Documents: `(Document, (DocumentName, String))`, with children attached
//! as a separate `(document, (DocumentChildrenNodes, sequence))` relation.

use doublet_store::{LinkAddress, LinkStore};
use tracing::debug;

use super::XmlStorage;
use crate::error::{Result, XmlError};
use crate::schema::Marker;

impl<S: LinkStore> XmlStorage<S> {
    /// Get or create the document named `name` (without children).
    pub fn create_document(&mut self, name: &str) -> Result<LinkAddress> {
        let document_name = self.create_document_name(name)?;
        let document = self.get_or_create(self.marker(Marker::Document), document_name)?;
        debug!(%document, document_name = name, "document");
        Ok(document)
    }

    /// Get or create the document named `name` and attach `children_nodes`.
    ///
    /// # Errors
    ///
    /// [`XmlError::InvalidArgument`] unless `children_nodes` is tagged
    /// `DocumentChildrenNodes`. Validation happens before anything is created.
    pub fn create_document_with_children(
        &mut self,
        name: &str,
        children_nodes: LinkAddress,
    ) -> Result<LinkAddress> {
        if !self.is_document_children_nodes(children_nodes) {
            return Err(XmlError::InvalidArgument(format!(
                "{children_nodes} is not a document children nodes link"
            )));
        }
        let document = self.create_document(name)?;
        self.get_or_create(document, children_nodes)?;
        Ok(document)
    }

    /// Get or create the `(DocumentName, String)` record for `name`.
    pub fn create_document_name(&mut self, name: &str) -> Result<LinkAddress> {
        let string = self.create_string(name)?;
        self.get_or_create(self.marker(Marker::DocumentName), string)
    }

    /// Wrap a children sequence as `(DocumentChildrenNodes, sequence)`.
    pub fn create_document_children_nodes(&mut self, sequence: LinkAddress) -> Result<LinkAddress> {
        if sequence.is_null() {
            return Err(XmlError::InvalidArgument(
                "document children nodes need a non-null sequence".into(),
            ));
        }
        self.get_or_create(self.marker(Marker::DocumentChildrenNodes), sequence)
    }

    /// Attach `children_nodes` to `document`, returning the relation.
    pub fn attach_document_children_nodes(
        &mut self,
        document: LinkAddress,
        children_nodes: LinkAddress,
    ) -> Result<LinkAddress> {
        self.ensure_is_document(document)?;
        self.ensure_is_document_children_nodes(children_nodes)?;
        self.get_or_create(document, children_nodes)
    }

    /// The sequence wrapped by a document children nodes link.
    pub fn document_children_nodes_sequence(&self, children_nodes: LinkAddress) -> Result<LinkAddress> {
        self.ensure_is_document_children_nodes(children_nodes)?;
        Ok(self.store.target(children_nodes)?)
    }

    /// The first children nodes link attached to `document`, if any.
    pub fn document_children_nodes_or_default(&self, document: LinkAddress) -> Result<Option<LinkAddress>> {
        self.ensure_is_document(document)?;
        Ok(self.first_outgoing_target(document, |target| {
            self.is_document_children_nodes(target)
        }))
    }

    /// The document's child nodes, in insertion order.
    ///
    /// If several children relations were attached, the first one in store
    /// enumeration order is used.
    ///
    /// # Errors
    ///
    /// [`XmlError::NotFound`] if `document` is not a document;
    /// [`XmlError::MissingChildren`] if it has no children relation.
    pub fn document_child_node_link_addresses(&self, document: LinkAddress) -> Result<Vec<LinkAddress>> {
        if !self.is_document(document) {
            return Err(XmlError::NotFound(format!("{document} is not a document")));
        }
        let children_nodes = self
            .document_children_nodes_or_default(document)?
            .ok_or(XmlError::MissingChildren(document))?;
        let sequence = self.document_children_nodes_sequence(children_nodes)?;
        Ok(self.children_sequence_nodes(sequence))
    }

    /// Find the document name record for `name` without creating anything.
    pub fn get_document_name_or_default(&self, name: &str) -> Option<LinkAddress> {
        let string = self.get_string_or_default(name)?;
        self.store.search(self.marker(Marker::DocumentName), string)
    }

    /// Find the document named `name` without creating anything.
    pub fn get_document_or_default(&self, name: &str) -> Option<LinkAddress> {
        let document_name = self.get_document_name_or_default(name)?;
        self.store.search(self.marker(Marker::Document), document_name)
    }

    /// Find the document named `name`.
    pub fn get_document(&self, name: &str) -> Result<LinkAddress> {
        self.get_document_or_default(name)
            .ok_or_else(|| XmlError::NotFound(format!("document with name {name:?}")))
    }

    /// Decode the name of `document`.
    pub fn document_name(&self, document: LinkAddress) -> Result<String> {
        self.ensure_is_document(document)?;
        let document_name = self.store.target(document)?;
        self.document_name_text(document_name)
    }

    /// Decode a `(DocumentName, String)` record.
    pub fn document_name_text(&self, document_name: LinkAddress) -> Result<String> {
        self.ensure_is_document_name(document_name)?;
        let string = self.store.target(document_name)?;
        self.get_string(string)
    }

    /// Returns `true` if `address` is tagged `Document`.
    pub fn is_document(&self, address: LinkAddress) -> bool {
        self.has_tag(address, Marker::Document)
    }

    /// Fail unless `address` is tagged `Document`.
    pub fn ensure_is_document(&self, address: LinkAddress) -> Result<()> {
        self.ensure_tag(address, Marker::Document)
    }

    /// Returns `true` if `address` is tagged `DocumentName`.
    pub fn is_document_name(&self, address: LinkAddress) -> bool {
        self.has_tag(address, Marker::DocumentName)
    }

    /// Fail unless `address` is tagged `DocumentName`.
    pub fn ensure_is_document_name(&self, address: LinkAddress) -> Result<()> {
        self.ensure_tag(address, Marker::DocumentName)
    }

    /// Returns `true` if `address` is tagged `DocumentChildrenNodes`.
    pub fn is_document_children_nodes(&self, address: LinkAddress) -> bool {
        self.has_tag(address, Marker::DocumentChildrenNodes)
    }

    /// Fail unless `address` is tagged `DocumentChildrenNodes`.
    pub fn ensure_is_document_children_nodes(&self, address: LinkAddress) -> Result<()> {
        self.ensure_tag(address, Marker::DocumentChildrenNodes)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use doublet_store::MemoryLinks;

    use super::*;

    fn storage() -> XmlStorage<MemoryLinks> {
        XmlStorage::new(MemoryLinks::new()).unwrap()
    }

    #[test]
    fn document_round_trip_by_name() {
        let mut storage = storage();
        assert_eq!(storage.get_document_or_default("doc"), None);
        let document = storage.create_document("doc").unwrap();
        assert_eq!(storage.create_document("doc").unwrap(), document);
        assert_eq!(storage.get_document("doc").unwrap(), document);
        assert_eq!(storage.document_name(document).unwrap(), "doc");
        assert!(matches!(
            storage.get_document("missing"),
            Err(XmlError::NotFound(_))
        ));
    }

    #[test]
    fn with_children_rejects_untagged_sequence() {
        let mut storage = storage();
        let text = storage.create_text_node("x").unwrap();
        let len = storage.store().len();
        let err = storage.create_document_with_children("doc", text).unwrap_err();
        assert!(matches!(err, XmlError::InvalidArgument(_)));
        assert_eq!(storage.store().len(), len);
        assert_eq!(storage.get_document_or_default("doc"), None);
    }

    #[test]
    fn children_lookup_requires_a_document() {
        let mut storage = storage();
        let element = storage.create_element("e").unwrap();
        assert!(matches!(
            storage.document_child_node_link_addresses(element),
            Err(XmlError::NotFound(_))
        ));
    }

    #[test]
    fn document_without_children_relation_is_a_logical_error() {
        let mut storage = storage();
        let document = storage.create_document("bare").unwrap();
        assert_eq!(
            storage.document_child_node_link_addresses(document),
            Err(XmlError::MissingChildren(document))
        );
    }

    #[test]
    fn attach_validates_both_sides() {
        let mut storage = storage();
        let document = storage.create_document("doc").unwrap();
        let text = storage.create_text_node("t").unwrap();
        let children = storage.create_document_children_nodes(text).unwrap();

        assert!(matches!(
            storage.attach_document_children_nodes(text, children),
            Err(XmlError::TypeMismatch { expected: Marker::Document, .. })
        ));
        assert!(matches!(
            storage.attach_document_children_nodes(document, text),
            Err(XmlError::TypeMismatch {
                expected: Marker::DocumentChildrenNodes,
                ..
            })
        ));
        storage.attach_document_children_nodes(document, children).unwrap();
        assert_eq!(
            storage.document_child_node_link_addresses(document).unwrap(),
            vec![text]
        );
    }

    #[test]
    fn first_attached_children_relation_wins() {
        let mut storage = storage();
        let document = storage.create_document("doc").unwrap();
        let first = storage.create_text_node("first").unwrap();
        let second = storage.create_text_node("second").unwrap();
        let first_children = storage.create_document_children_nodes(first).unwrap();
        let second_children = storage.create_document_children_nodes(second).unwrap();
        storage.attach_document_children_nodes(document, first_children).unwrap();
        storage.attach_document_children_nodes(document, second_children).unwrap();
        assert_eq!(
            storage.document_child_node_link_addresses(document).unwrap(),
            vec![first]
        );
    }

    #[test]
    fn document_name_records_are_distinct_from_strings() {
        let mut storage = storage();
        let document = storage.create_document("doc").unwrap();
        let name = storage.store().target(document).unwrap();
        assert!(storage.is_document_name(name));
        assert_eq!(storage.document_name_text(name).unwrap(), "doc");
        let string = storage.create_string("doc").unwrap();
        assert!(matches!(
            storage.document_name_text(string),
            Err(XmlError::TypeMismatch { .. })
        ));
        assert_eq!(storage.get_document_name_or_default("doc"), Some(name));
    }
}
