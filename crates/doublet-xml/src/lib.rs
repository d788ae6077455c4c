// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Document trees encoded as content-addressed doublets.
//!
//! `doublet-xml` maps an already-parsed document model (documents, elements,
//! text nodes, attribute nodes, strings and ordered child lists) onto a
//! [`LinkStore`](doublet_store::LinkStore) and back. Every compound structure
//! is built from nested `(source, target)` links, tagged by schema markers:
//!
//! ```text
//! document   = (Document, (DocumentName, string))
//!              + (document, (DocumentChildrenNodes, children))
//! element    = (Element, string) + optional (element, children_marker)
//! text       = (TextNode, string)
//! attribute  = (AttributeNode, (name_sequence, value_sequence))
//! string     = (String, unicode_sequence | EmptyString)
//! ```
//!
//! This is not an XML parser: no tag-soup recovery, namespaces or schema
//! validation. [`tree`] offers a small native tree type for importing and
//! exporting whole documents.
//!
//! # Determinism Invariant
//!
//! Equal inputs always produce equal addresses within one store. Child order
//! is preserved exactly. Where several relations could answer a lookup (for
//! example two children relations on one element), the first one in store
//! enumeration order wins.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::use_self
)]

pub mod codec;
pub mod config;
mod error;
pub mod indexer;
pub mod schema;
mod storage;
pub mod tree;
pub mod walker;

pub use codec::UnicodeCodec;
pub use config::StorageConfig;
pub use error::{Result, XmlError};
pub use indexer::{FrequencyCache, XmlIndexer};
pub use schema::{Marker, Schema, SCHEMA_VERSION};
pub use storage::{Attribute, XmlStorage};
pub use walker::SequenceWalker;

pub use doublet_store::{LinkAddress, LinkStore, MemoryLinks};
