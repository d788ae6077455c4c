// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Native document trees and their import into / export from link storage.
//!
//! Elements are content-addressed by name: two elements with the same name
//! are the *same* link. Storing two same-named elements with different
//! children attaches two children relations to that one link, and loading
//! then returns the first relation for both. Trees round-trip exactly when
//! every element name maps to one children list.

use doublet_store::{LinkAddress, LinkStore};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{Result, XmlError};
use crate::schema::Marker;
use crate::storage::{Attribute, XmlStorage};

/// A named document and its top-level nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document name.
    pub name: String,
    /// Top-level nodes, in order. Empty means no children relation is stored.
    pub children: Vec<Node>,
}

/// An element and, if represented, its children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Tag name.
    pub name: String,
    /// `None`: children not represented. `Some(vec![])`: explicitly empty.
    pub children: Option<Vec<Node>>,
}

/// One node of a document tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// An element.
    Element(Element),
    /// Character data.
    Text(String),
    /// An attribute, positioned among its element's children.
    Attribute(Attribute),
}

/// Pending work while storing a tree bottom-up.
enum StoreTask<'t> {
    Visit(&'t Node),
    /// All `count` children of the element `name` are on the output stack.
    Finish { name: &'t str, count: usize },
}

/// Pending work while loading a tree.
enum LoadTask {
    Visit(LinkAddress),
    /// All `count` children of `element` are on the output stack.
    Finish {
        element: LinkAddress,
        name: String,
        count: usize,
    },
}

impl<S: LinkStore> XmlStorage<S> {
    /// Store `document` and return its address.
    pub fn store_document(&mut self, document: &Document) -> Result<LinkAddress> {
        let children = self.store_nodes(&document.children)?;
        match self.create_children_sequence(&children)? {
            None => self.create_document(&document.name),
            Some(sequence) => {
                let children_nodes = self.create_document_children_nodes(sequence)?;
                self.create_document_with_children(&document.name, children_nodes)
            }
        }
    }

    /// Store one node (and everything below it) and return its address.
    pub fn store_node(&mut self, node: &Node) -> Result<LinkAddress> {
        let mut stored = self.store_nodes(std::slice::from_ref(node))?;
        stored.pop().ok_or(XmlError::EmptySequence)
    }

    /// Children are stored before their parent; the work stack keeps native
    /// stack usage flat however deep the tree is.
    fn store_nodes(&mut self, nodes: &[Node]) -> Result<Vec<LinkAddress>> {
        let mut tasks: Vec<StoreTask<'_>> = nodes.iter().rev().map(StoreTask::Visit).collect();
        let mut stored = Vec::with_capacity(nodes.len());
        while let Some(task) = tasks.pop() {
            match task {
                StoreTask::Visit(Node::Text(text)) => stored.push(self.create_text_node(text)?),
                StoreTask::Visit(Node::Attribute(attribute)) => {
                    stored.push(self.create_attribute_node_from(attribute)?);
                }
                StoreTask::Visit(Node::Element(Element { name, children: None })) => {
                    stored.push(self.create_element(name)?);
                }
                StoreTask::Visit(Node::Element(Element {
                    name,
                    children: Some(children),
                })) => {
                    tasks.push(StoreTask::Finish {
                        name,
                        count: children.len(),
                    });
                    tasks.extend(children.iter().rev().map(StoreTask::Visit));
                }
                StoreTask::Finish { name, count } => {
                    let children = stored.split_off(stored.len() - count);
                    let sequence = self.create_children_sequence(&children)?;
                    stored.push(self.create_element_with_children(name, sequence)?);
                }
            }
        }
        Ok(stored)
    }

    /// Load the document at `document`.
    ///
    /// # Errors
    ///
    /// [`XmlError::CyclicElement`] if an element below the document contains
    /// itself, which happens when an element was stored inside a same-named
    /// element.
    pub fn load_document(&self, document: LinkAddress) -> Result<Document> {
        let name = self.document_name(document)?;
        let children = match self.document_child_node_link_addresses(document) {
            Ok(children) => children,
            Err(XmlError::MissingChildren(_)) => Vec::new(),
            Err(err) => return Err(err),
        };
        Ok(Document {
            name,
            children: self.load_nodes(&children)?,
        })
    }

    /// Load the node at `node` and everything below it.
    pub fn load_node(&self, node: LinkAddress) -> Result<Node> {
        let mut loaded = self.load_nodes(&[node])?;
        loaded.pop().ok_or(XmlError::EmptySequence)
    }

    /// Mirror of [`store_nodes`](Self::store_nodes). `ancestors` holds the
    /// elements currently open, so an element reachable from itself is
    /// reported instead of expanded forever.
    fn load_nodes(&self, nodes: &[LinkAddress]) -> Result<Vec<Node>> {
        let mut tasks: Vec<LoadTask> = nodes.iter().rev().copied().map(LoadTask::Visit).collect();
        let mut ancestors = FxHashSet::default();
        let mut loaded = Vec::with_capacity(nodes.len());
        while let Some(task) = tasks.pop() {
            match task {
                LoadTask::Visit(node) => match self.tag_of(node) {
                    Some(Marker::TextNode) => loaded.push(Node::Text(self.get_text_node(node)?)),
                    Some(Marker::AttributeNode) => {
                        loaded.push(Node::Attribute(self.get_attribute(node)?));
                    }
                    Some(Marker::Element) => {
                        let name = self.element_name(node)?;
                        if self.element_children_nodes_link_or_default(node)?.is_none() {
                            loaded.push(Node::Element(Element { name, children: None }));
                            continue;
                        }
                        if !ancestors.insert(node) {
                            return Err(XmlError::CyclicElement(node));
                        }
                        let children = self.element_children_nodes(node)?;
                        tasks.push(LoadTask::Finish {
                            element: node,
                            name,
                            count: children.len(),
                        });
                        tasks.extend(children.into_iter().rev().map(LoadTask::Visit));
                    }
                    _ => {
                        return Err(XmlError::InvalidArgument(format!(
                            "{node} is not an element, text or attribute node"
                        )))
                    }
                },
                LoadTask::Finish {
                    element,
                    name,
                    count,
                } => {
                    ancestors.remove(&element);
                    let children = loaded.split_off(loaded.len() - count);
                    loaded.push(Node::Element(Element {
                        name,
                        children: Some(children),
                    }));
                }
            }
        }
        Ok(loaded)
    }
}
