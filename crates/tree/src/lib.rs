//! Mutable document tree.
//!
//! Nodes live in a [`Document`] arena and are addressed by [`NodeId`] handles.
//! Elements and the document node implement the [`Branch`] contract: positional
//! access, a live content view, processing-instruction lookup and kind-dispatched
//! `add`/`remove` that keep parent links consistent.

pub mod branch;
pub mod document;
pub mod error;
pub mod node;
pub mod qname;

pub use branch::{Branch, BranchMut, BranchRef, ContentMut};
pub use document::{Ancestors, Descendants, Document};
pub use error::TreeError;
pub use node::{NodeId, NodeKind, NodeType, PiData};
pub use qname::{QName, XML_NAMESPACE};
