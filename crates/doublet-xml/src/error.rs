// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error taxonomy for the document codec.

use doublet_store::{LinkAddress, StoreError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::schema::Marker;

/// Errors returned by [`XmlStorage`](crate::XmlStorage), the unicode codec
/// and the frequency indexer.
///
/// Validation is eager: every public operation checks its arguments before
/// touching the store, so a returned error means nothing was created.
/// Store failures (for example an exhausted link budget) pass through
/// unchanged as [`XmlError::Store`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlError {
    /// A link was passed where a link with a specific tag was required.
    #[error("[XML_TYPE_MISMATCH] {address} is not tagged {expected}")]
    TypeMismatch {
        /// The offending address.
        address: LinkAddress,
        /// The tag the operation required.
        expected: Marker,
    },
    /// A required entity does not exist.
    #[error("[XML_NOT_FOUND] {0}")]
    NotFound(String),
    /// A null address, sentinel or wrongly tagged composite was passed in.
    #[error("[XML_INVALID_ARGUMENT] {0}")]
    InvalidArgument(String),
    /// A container has no children-nodes relation at all.
    #[error("[XML_MISSING_CHILDREN] {0} has no children nodes relation")]
    MissingChildren(LinkAddress),
    /// The operation is declared but has no implementation yet.
    #[error("[XML_NOT_IMPLEMENTED] {0} is not implemented")]
    NotImplemented(&'static str),
    /// A balanced sequence cannot encode zero elements.
    #[error("[XML_EMPTY_SEQUENCE] a sequence needs at least one element")]
    EmptySequence,
    /// The address is not a unicode sequence.
    #[error("[XML_NOT_A_SEQUENCE] {0} is not a unicode sequence")]
    NotASequence(LinkAddress),
    /// The address does not decode to a unicode scalar value.
    #[error("[XML_INVALID_SYMBOL] {0} is not a unicode symbol")]
    InvalidSymbol(LinkAddress),
    /// An element's children contain the element itself, directly or
    /// through descendants, so the tree cannot be materialized.
    #[error("[XML_CYCLIC_ELEMENT] element {0} is its own ancestor")]
    CyclicElement(LinkAddress),
    /// Storage settings could not be loaded.
    #[error("[XML_CONFIG] {0}")]
    Config(String),
    /// Failure inherited from the relation store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ConfigError> for XmlError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = XmlError> = std::result::Result<T, E>;
