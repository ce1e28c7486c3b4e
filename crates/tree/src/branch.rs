//! The branch contract: navigation and mutation of a node that owns children.
//!
//! Elements and the document node are branches. The read side is the [`Branch`]
//! trait, shared by [`BranchRef`] and [`BranchMut`]; structural changes go through
//! [`BranchMut`] and its live [`ContentMut`] view. Both keep child lists and parent
//! links in step, so the branch stays the single source of truth for linkage.

use crate::document::Document;
use crate::error::TreeError;
use crate::node::{NodeId, NodeType, PiData};
use crate::qname::QName;
use log::debug;
use std::iter::Copied;
use std::slice::Iter;

/// Read access to a node that owns an ordered sequence of children.
pub trait Branch {
    fn document(&self) -> &Document;

    /// The element or document node this branch wraps.
    fn id(&self) -> NodeId;

    fn node_type(&self) -> NodeType {
        self.document().node_type(self.id())
    }

    /// The children in document order. This is a view of the owned sequence, not a copy.
    fn content(&self) -> &[NodeId] {
        self.document().children(self.id())
    }

    fn node_count(&self) -> usize {
        self.content().len()
    }

    /// The child at `index`.
    fn node(&self, index: usize) -> Result<NodeId, TreeError> {
        let content = self.content();
        content
            .get(index)
            .copied()
            .ok_or(TreeError::IndexOutOfRange {
                index,
                len: content.len(),
            })
    }

    /// Position of `node` among the direct children, `None` if it is not one of them.
    fn index_of(&self, node: NodeId) -> Option<usize> {
        self.content().iter().position(|c| *c == node)
    }

    fn node_iter(&self) -> Copied<Iter<'_, NodeId>> {
        self.content().iter().copied()
    }

    /// Child processing instructions in document order.
    fn processing_instructions(&self) -> impl Iterator<Item = NodeId> {
        let doc = self.document();
        self.content()
            .iter()
            .copied()
            .filter(move |n| doc.node_type(*n) == NodeType::ProcessingInstruction)
    }

    /// Child processing instructions with the given target.
    fn processing_instructions_by_target(&self, target: &str) -> impl Iterator<Item = NodeId> {
        let doc = self.document();
        self.content()
            .iter()
            .copied()
            .filter(move |n| doc.pi_target(*n) == Some(target))
    }

    /// The first child processing instruction with the given target.
    fn processing_instruction(&self, target: &str) -> Option<NodeId> {
        self.processing_instructions_by_target(target).next()
    }
}

/// A shared borrow of a branch.
#[derive(Debug, Clone, Copy)]
pub struct BranchRef<'d> {
    doc: &'d Document,
    id: NodeId,
}

impl<'d> BranchRef<'d> {
    pub(crate) fn new(doc: &'d Document, id: NodeId) -> Self {
        Self { doc, id }
    }
}

impl Branch for BranchRef<'_> {
    fn document(&self) -> &Document {
        self.doc
    }

    fn id(&self) -> NodeId {
        self.id
    }
}

/// An exclusive borrow of a branch, used for structural mutation.
#[derive(Debug)]
pub struct BranchMut<'d> {
    doc: &'d mut Document,
    id: NodeId,
}

impl Branch for BranchMut<'_> {
    fn document(&self) -> &Document {
        self.doc
    }

    fn id(&self) -> NodeId {
        self.id
    }
}

impl<'d> BranchMut<'d> {
    pub(crate) fn new(doc: &'d mut Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    /// A live, mutable view of the children.
    pub fn content_mut(&mut self) -> ContentMut<'_> {
        ContentMut {
            doc: self.doc,
            branch: self.id,
        }
    }

    /// Replaces all children at once. Previous children are detached.
    ///
    /// Every new node is validated before anything changes, so on error the branch
    /// and all nodes are left as they were.
    pub fn set_content(&mut self, content: Vec<NodeId>) -> Result<(), TreeError> {
        self.doc.replace_children(self.id, content)
    }

    pub fn clear_content(&mut self) {
        self.content_mut().clear();
    }

    /// Replaces the child processing instructions, keeping all other children.
    /// The new instructions are appended after the remaining content.
    pub fn set_processing_instructions(&mut self, instructions: Vec<NodeId>) -> Result<(), TreeError> {
        if let Some(&bad) = instructions
            .iter()
            .find(|n| self.doc.node_type(**n) != NodeType::ProcessingInstruction)
        {
            return Err(TreeError::InvalidNodeKind {
                operation: "set_processing_instructions",
                found: self.doc.node_type(bad),
            });
        }
        let mut content: Vec<NodeId> = self
            .content()
            .iter()
            .copied()
            .filter(|n| self.doc.node_type(*n) != NodeType::ProcessingInstruction)
            .collect();
        content.extend(instructions);
        self.set_content(content)
    }

    /// Appends a freshly created node. Fresh nodes have no parent and no children,
    /// so only the kind rules can reject them.
    fn append_new(&mut self, node: NodeId) -> Result<NodeId, TreeError> {
        self.doc.check_insertable(self.id, node)?;
        let index = self.node_count();
        self.doc.link_child(self.id, index, node);
        Ok(node)
    }

    /// Creates an element and appends it.
    pub fn add_element(&mut self, name: impl Into<QName>) -> Result<NodeId, TreeError> {
        let element = self.doc.create_element(name);
        self.append_new(element)
    }

    /// Creates an element with attributes and appends it.
    pub fn add_element_with_attributes<I, N, V>(
        &mut self,
        name: impl Into<QName>,
        attributes: I,
    ) -> Result<NodeId, TreeError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<QName>,
        V: Into<String>,
    {
        let element = self.doc.create_element_with_attributes(name, attributes);
        self.append_new(element)
    }

    /// Creates a text node and appends it. Only elements accept text.
    pub fn add_text(&mut self, text: impl Into<String>) -> Result<NodeId, TreeError> {
        let node = self.doc.create_text(text);
        self.append_new(node)
    }

    pub fn add_comment(&mut self, text: impl Into<String>) -> NodeId {
        let node = self.doc.create_comment(text);
        let index = self.node_count();
        self.doc.link_child(self.id, index, node);
        node
    }

    pub fn add_processing_instruction(
        &mut self,
        target: impl Into<String>,
        text: impl Into<String>,
    ) -> NodeId {
        self.push_processing_instruction(target.into(), PiData::from_text(text))
    }

    /// Creates a processing instruction whose data block holds `key="value"` pairs.
    pub fn add_processing_instruction_with_values<I, K, V>(
        &mut self,
        target: impl Into<String>,
        values: I,
    ) -> NodeId
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.push_processing_instruction(target.into(), PiData::from_values(values))
    }

    fn push_processing_instruction(&mut self, target: String, data: PiData) -> NodeId {
        let node = self.doc.create_processing_instruction(target, data);
        let index = self.node_count();
        self.doc.link_child(self.id, index, node);
        node
    }

    /// Removes the first processing instruction with the given target.
    pub fn remove_processing_instruction(&mut self, target: &str) -> bool {
        match self.processing_instruction(target) {
            Some(pi) => self.remove_child(pi),
            None => false,
        }
    }

    /// Appends an existing node, dispatching on its kind.
    pub fn add(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.doc.ensure_contains(node)?;
        match self.doc.node_type(node) {
            NodeType::Element => self.add_element_node(node),
            NodeType::Text => self.add_text_node(node),
            NodeType::Comment | NodeType::ProcessingInstruction => self.add_leaf_node(node),
            found @ (NodeType::Document | NodeType::Attribute) => {
                Err(TreeError::InvalidNodeKind {
                    operation: "add",
                    found,
                })
            }
        }
    }

    fn add_element_node(&mut self, element: NodeId) -> Result<(), TreeError> {
        self.content_mut().push(element)
    }

    fn add_text_node(&mut self, text: NodeId) -> Result<(), TreeError> {
        if self.node_type() == NodeType::Document {
            return Err(TreeError::InvalidNodeKind {
                operation: "add to document",
                found: NodeType::Text,
            });
        }
        self.content_mut().push(text)
    }

    fn add_leaf_node(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.content_mut().push(node)
    }

    /// Removes a direct child, dispatching on its kind. Returns whether the node was
    /// found; on success its parent link is cleared.
    pub fn remove(&mut self, node: NodeId) -> bool {
        if !self.doc.contains(node) {
            return false;
        }
        match self.doc.node_type(node) {
            NodeType::Element
            | NodeType::Text
            | NodeType::Comment
            | NodeType::ProcessingInstruction => self.remove_child(node),
            // Attributes and documents are never part of a branch's content.
            NodeType::Attribute | NodeType::Document => false,
        }
    }

    fn remove_child(&mut self, node: NodeId) -> bool {
        match self.index_of(node) {
            Some(index) => {
                self.doc.unlink_child(self.id, index);
                true
            }
            None => false,
        }
    }
}

/// A live view of a branch's children.
///
/// Changes made here are changes to the branch itself: inserted nodes get the
/// branch as parent, removed nodes lose it. The same kind and parentage rules as
/// [`BranchMut::add`] apply.
#[derive(Debug)]
pub struct ContentMut<'b> {
    doc: &'b mut Document,
    branch: NodeId,
}

impl ContentMut<'_> {
    pub fn len(&self) -> usize {
        self.doc.children(self.branch).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.doc.children(self.branch).get(index).copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        self.doc.children(self.branch)
    }

    pub fn iter(&self) -> Copied<Iter<'_, NodeId>> {
        self.as_slice().iter().copied()
    }

    pub fn push(&mut self, node: NodeId) -> Result<(), TreeError> {
        let len = self.len();
        self.insert(len, node)
    }

    pub fn insert(&mut self, index: usize, node: NodeId) -> Result<(), TreeError> {
        let len = self.len();
        if index > len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        self.doc.check_insertable(self.branch, node)?;
        self.doc.link_child(self.branch, index, node);
        Ok(())
    }

    /// Detaches and returns the child at `index`.
    pub fn remove(&mut self, index: usize) -> Result<NodeId, TreeError> {
        let len = self.len();
        if index >= len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        Ok(self.doc.unlink_child(self.branch, index))
    }

    /// Detaches every child.
    pub fn clear(&mut self) {
        debug!("Clearing content of {}", self.branch);
        while !self.is_empty() {
            let last = self.len() - 1;
            self.doc.unlink_child(self.branch, last);
        }
    }

    /// Keeps only the children for which `keep` returns true; the rest are detached.
    pub fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        let mut index = 0;
        while index < self.len() {
            let node = self.doc.children(self.branch)[index];
            if keep(node) {
                index += 1;
            } else {
                self.doc.unlink_child(self.branch, index);
            }
        }
    }
}
