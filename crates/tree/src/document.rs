//! Arena-backed document tree.
//!
//! Every node lives in a `Vec` owned by the [`Document`] and is addressed by a
//! [`NodeId`]. A node records its parent as a plain handle, so the parent link never
//! owns anything; branches own their children through an ordered list of handles.
//! Detached nodes stay in the arena and can be attached again later.

use crate::branch::{BranchMut, BranchRef};
use crate::error::TreeError;
use crate::node::{NodeData, NodeId, NodeKind, NodeType, PiData};
use crate::qname::QName;
use log::debug;
use std::collections::HashMap;

/// An XML document: the arena plus the document node at slot 0.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document holding only its document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Document)],
        }
    }

    /// The document node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The single element child of the document node, if one has been added.
    pub fn root_element(&self) -> Option<NodeId> {
        self.element_child(self.root())
    }

    /// Number of nodes allocated in the arena, attached or not.
    pub fn allocated_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    // --- Construction ---

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(kind));
        id
    }

    /// Allocates a detached element.
    pub fn create_element(&mut self, name: impl Into<QName>) -> NodeId {
        self.alloc(NodeKind::Element {
            name: name.into(),
            attributes: Vec::new(),
        })
    }

    /// Allocates a detached element together with its attribute nodes.
    pub fn create_element_with_attributes<I, N, V>(
        &mut self,
        name: impl Into<QName>,
        attributes: I,
    ) -> NodeId
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<QName>,
        V: Into<String>,
    {
        let element = self.create_element(name);
        let attribute_ids: Vec<NodeId> = attributes
            .into_iter()
            .map(|(name, value)| {
                let attr = self.alloc(NodeKind::Attribute {
                    name: name.into(),
                    value: value.into(),
                });
                self.nodes[attr.0].parent = Some(element);
                attr
            })
            .collect();
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[element.0].kind {
            *attributes = attribute_ids;
        }
        element
    }

    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text {
            content: content.into(),
        })
    }

    pub fn create_comment(&mut self, content: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Comment {
            content: content.into(),
        })
    }

    pub fn create_processing_instruction(
        &mut self,
        target: impl Into<String>,
        data: PiData,
    ) -> NodeId {
        self.alloc(NodeKind::ProcessingInstruction {
            target: target.into(),
            data,
        })
    }

    // --- Read access ---

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.nodes[id.0].kind.node_type()
    }

    /// The parent of a node. `None` for the document node and for detached nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// The children of a node in document order. Empty for leaf nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// The attribute nodes of an element. Empty for every other kind.
    pub fn attributes(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Looks up an attribute value by its lexical name (`id`, `xml:lang`).
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let wanted = QName::parse(name);
        self.attributes(id)
            .iter()
            .find_map(|attr| match &self.nodes[attr.0].kind {
                NodeKind::Attribute { name, value } if *name == wanted => Some(value.as_str()),
                _ => None,
            })
    }

    /// The name of an element or attribute.
    pub fn name(&self, id: NodeId) -> Option<&QName> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { name, .. } | NodeKind::Attribute { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The target of a processing instruction.
    pub fn pi_target(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::ProcessingInstruction { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn pi_data(&self, id: NodeId) -> Option<&PiData> {
        match &self.nodes[id.0].kind {
            NodeKind::ProcessingInstruction { data, .. } => Some(data),
            _ => None,
        }
    }

    /// The string-value of a node as defined by XPath 1.0.
    /// - Element and document: the text of all descendant text nodes, in document order.
    /// - Text and comment: their content.
    /// - Attribute: its value.
    /// - Processing instruction: its data block.
    pub fn string_value(&self, id: NodeId) -> String {
        match &self.nodes[id.0].kind {
            NodeKind::Document | NodeKind::Element { .. } => self
                .descendants(id)
                .filter_map(|d| match &self.nodes[d.0].kind {
                    NodeKind::Text { content } => Some(content.as_str()),
                    _ => None,
                })
                .collect(),
            NodeKind::Text { content } | NodeKind::Comment { content } => content.clone(),
            NodeKind::Attribute { value, .. } => value.clone(),
            NodeKind::ProcessingInstruction { data, .. } => data.text().to_string(),
        }
    }

    // --- Navigation ---

    /// The top-most ancestor of a node: the document node for attached nodes,
    /// the root of the detached subtree otherwise.
    pub fn tree_root(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Ancestors from the parent upwards.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// Descendants in document order, excluding the node itself and attributes.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// True if `candidate` is `node` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        candidate == node || self.ancestors(node).any(|a| a == candidate)
    }

    fn element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|c| self.node_type(*c) == NodeType::Element)
    }

    // --- Document order ---

    /// A sort key whose lexicographic order is document order.
    ///
    /// The key starts with the arena slot of the tree root, then holds one
    /// `(marker, position)` pair per level, where the marker is 0 for an attribute
    /// and 1 for a child. An element therefore sorts before its attributes, which
    /// sort before its children.
    pub fn document_order_key(&self, id: NodeId) -> Vec<usize> {
        self.order_key(id, &mut HashMap::new())
    }

    /// Builds the key of `id`, filling `positions` with the index of every
    /// sibling list it has to look at. Each list is scanned once per cache.
    fn order_key(&self, id: NodeId, positions: &mut HashMap<NodeId, usize>) -> Vec<usize> {
        let mut key = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            let (marker, siblings) = match self.kind(current) {
                NodeKind::Attribute { .. } => (0, self.attributes(parent)),
                _ => (1, self.children(parent)),
            };
            if !positions.contains_key(&current) {
                positions.extend(siblings.iter().enumerate().map(|(i, s)| (*s, i)));
            }
            key.push(positions.get(&current).copied().unwrap_or(0));
            key.push(marker);
            current = parent;
        }
        key.push(current.0);
        key.reverse();
        key
    }

    /// Sorts handles into document order and removes duplicates.
    pub fn sort_document_order(&self, nodes: &mut Vec<NodeId>) {
        if nodes.len() < 2 {
            return;
        }
        let mut positions = HashMap::new();
        let mut keyed: Vec<(Vec<usize>, NodeId)> = nodes
            .iter()
            .map(|&n| (self.order_key(n, &mut positions), n))
            .collect();
        keyed.sort_unstable();
        nodes.clear();
        nodes.extend(keyed.into_iter().map(|(_, n)| n));
        nodes.dedup();
    }

    // --- Branch access ---

    /// Borrows an element or the document node through the read side of the
    /// branch contract.
    pub fn branch(&self, id: NodeId) -> Result<BranchRef<'_>, TreeError> {
        self.ensure_branch(id, "branch")?;
        Ok(BranchRef::new(self, id))
    }

    /// Borrows an element or the document node for structural mutation.
    pub fn branch_mut(&mut self, id: NodeId) -> Result<BranchMut<'_>, TreeError> {
        self.ensure_branch(id, "branch_mut")?;
        Ok(BranchMut::new(self, id))
    }

    fn ensure_branch(&self, id: NodeId, operation: &'static str) -> Result<(), TreeError> {
        self.ensure_contains(id)?;
        let found = self.node_type(id);
        if found.is_branch() {
            Ok(())
        } else {
            Err(TreeError::InvalidNodeKind { operation, found })
        }
    }

    /// Rejects handles that point past the end of this document's arena.
    pub(crate) fn ensure_contains(&self, id: NodeId) -> Result<(), TreeError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(TreeError::UnknownNode(id))
        }
    }

    // --- Structural mutation primitives shared by branches and content views ---

    /// Checks that `node` may become a child of `branch`.
    ///
    /// Kind rules: elements, comments and processing instructions may go anywhere,
    /// text only below elements, documents and attributes never. A document keeps at
    /// most one element child.
    pub(crate) fn check_insertable(&self, branch: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.ensure_contains(node)?;
        let branch_type = self.node_type(branch);
        let found = self.node_type(node);
        match found {
            NodeType::Element | NodeType::Comment | NodeType::ProcessingInstruction => {}
            NodeType::Text if branch_type == NodeType::Element => {}
            NodeType::Text => {
                return Err(TreeError::InvalidNodeKind {
                    operation: "add to document",
                    found,
                });
            }
            NodeType::Document | NodeType::Attribute => {
                return Err(TreeError::InvalidNodeKind {
                    operation: "add",
                    found,
                });
            }
        }
        if self.parent(node).is_some() {
            return Err(TreeError::NodeAlreadyParented(node));
        }
        if self.is_ancestor_or_self(node, branch) {
            return Err(TreeError::WouldCreateCycle(node));
        }
        if found == NodeType::Element
            && branch_type == NodeType::Document
            && self.element_child(branch).is_some()
        {
            return Err(TreeError::DuplicateRootElement);
        }
        Ok(())
    }

    /// Inserts an already validated node at `index` and links it to `branch`.
    pub(crate) fn link_child(&mut self, branch: NodeId, index: usize, node: NodeId) {
        debug!("Attaching node {} to {} at index {}", node, branch, index);
        self.nodes[branch.0].children.insert(index, node);
        self.nodes[node.0].parent = Some(branch);
    }

    /// Removes the child at `index` and clears its parent link.
    pub(crate) fn unlink_child(&mut self, branch: NodeId, index: usize) -> NodeId {
        let node = self.nodes[branch.0].children.remove(index);
        debug!("Detaching node {} from {}", node, branch);
        self.nodes[node.0].parent = None;
        node
    }

    /// Replaces the whole child list of `branch`.
    ///
    /// Every new node is validated before anything changes. Nodes that are already
    /// children of `branch` may be listed again; they are detached with the rest of
    /// the old content and reattached in their new position.
    pub(crate) fn replace_children(
        &mut self,
        branch: NodeId,
        content: Vec<NodeId>,
    ) -> Result<(), TreeError> {
        let is_document = self.node_type(branch) == NodeType::Document;
        let mut elements = 0;
        for (i, &node) in content.iter().enumerate() {
            self.ensure_contains(node)?;
            if content[..i].contains(&node) {
                return Err(TreeError::NodeAlreadyParented(node));
            }
            if self.parent(node) == Some(branch) {
                if self.node_type(node) == NodeType::Element {
                    elements += 1;
                }
            } else {
                match self.check_insertable(branch, node) {
                    Ok(()) | Err(TreeError::DuplicateRootElement) => {}
                    Err(e) => return Err(e),
                }
                if self.node_type(node) == NodeType::Element {
                    elements += 1;
                }
            }
            if is_document && elements > 1 {
                return Err(TreeError::DuplicateRootElement);
            }
        }

        let old = std::mem::take(&mut self.nodes[branch.0].children);
        debug!(
            "Replacing {} children of {} with {} nodes",
            old.len(),
            branch,
            content.len()
        );
        for node in old {
            self.nodes[node.0].parent = None;
        }
        for &node in &content {
            self.nodes[node.0].parent = Some(branch);
        }
        self.nodes[branch.0].children = content;
        Ok(())
    }
}

/// Iterator over the ancestors of a node, nearest first.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(current).iter().rev().copied());
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::Branch;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let catalog = doc.branch_mut(root).unwrap().add_element("catalog").unwrap();
        let mut catalog_branch = doc.branch_mut(catalog).unwrap();
        let first = catalog_branch.add_element("item").unwrap();
        let second = catalog_branch.add_element("item").unwrap();
        doc.branch_mut(first).unwrap().add_text("x").unwrap();
        doc.branch_mut(second).unwrap().add_text("y").unwrap();
        (doc, catalog, first, second)
    }

    #[test]
    fn test_new_document_has_only_document_node() {
        let doc = Document::new();
        assert_eq!(doc.node_type(doc.root()), NodeType::Document);
        assert_eq!(doc.root_element(), None);
        assert_eq!(doc.allocated_nodes(), 1);
    }

    #[test]
    fn test_string_value_by_kind() {
        let (mut doc, catalog, first, _) = sample();
        doc.branch_mut(catalog).unwrap().add_comment("ignored");
        doc.branch_mut(catalog)
            .unwrap()
            .add_processing_instruction("pi", "data");
        assert_eq!(doc.string_value(catalog), "xy");
        assert_eq!(doc.string_value(doc.root()), "xy");
        assert_eq!(doc.string_value(first), "x");

        let pi = doc.branch(catalog).unwrap().processing_instruction("pi").unwrap();
        assert_eq!(doc.string_value(pi), "data");

        let el = doc.create_element_with_attributes("e", [("id", "a1")]);
        let attr = doc.attributes(el)[0];
        assert_eq!(doc.string_value(attr), "a1");
        assert_eq!(doc.parent(attr), Some(el));
    }

    #[test]
    fn test_attribute_lookup_by_lexical_name() {
        let mut doc = Document::new();
        let el = doc.create_element_with_attributes("p", [("id", "p1"), ("xml:lang", "en")]);
        assert_eq!(doc.attribute(el, "id"), Some("p1"));
        assert_eq!(doc.attribute(el, "xml:lang"), Some("en"));
        assert_eq!(doc.attribute(el, "lang"), None);
    }

    #[test]
    fn test_descendants_in_document_order() {
        let (doc, catalog, first, second) = sample();
        let texts: Vec<_> = doc.descendants(catalog).collect();
        assert_eq!(texts.len(), 4);
        assert_eq!(texts[0], first);
        assert_eq!(texts[2], second);
        assert_eq!(doc.string_value(texts[1]), "x");
    }

    #[test]
    fn test_ancestors_and_tree_root() {
        let (doc, catalog, first, _) = sample();
        let text = doc.children(first)[0];
        let ancestors: Vec<_> = doc.ancestors(text).collect();
        assert_eq!(ancestors, vec![first, catalog, doc.root()]);
        assert_eq!(doc.tree_root(text), doc.root());

        let mut doc = doc;
        let loose = doc.create_element("loose");
        assert_eq!(doc.tree_root(loose), loose);
    }

    #[test]
    fn test_document_order_follows_tree_not_allocation() {
        let (mut doc, catalog, first, second) = sample();
        // Allocated last but inserted first.
        let early = doc.create_element("early");
        doc.branch_mut(catalog)
            .unwrap()
            .content_mut()
            .insert(0, early)
            .unwrap();

        let mut nodes = vec![second, early, first, second, catalog];
        doc.sort_document_order(&mut nodes);
        assert_eq!(nodes, vec![catalog, early, first, second]);
    }

    #[test]
    fn test_attributes_sort_between_element_and_children() {
        let mut doc = Document::new();
        let el = doc.create_element_with_attributes("e", [("a", "1"), ("b", "2")]);
        let text = doc.create_text("t");
        doc.branch_mut(el).unwrap().add(text).unwrap();
        let attrs = doc.attributes(el).to_vec();

        let mut nodes = vec![text, attrs[1], el, attrs[0]];
        doc.sort_document_order(&mut nodes);
        assert_eq!(nodes, vec![el, attrs[0], attrs[1], text]);
    }

    #[test]
    fn test_branch_access_rejects_leaf_nodes() {
        let mut doc = Document::new();
        let text = doc.create_text("t");
        assert!(matches!(
            doc.branch(text),
            Err(TreeError::InvalidNodeKind {
                found: NodeType::Text,
                ..
            })
        ));
        assert!(doc.branch_mut(text).is_err());
    }

    #[test]
    fn test_string_value_of_deeply_nested_elements() {
        let mut doc = Document::new();
        let mut current = doc.create_text("leaf");
        for _ in 0..100_000 {
            let wrapper = doc.create_element("nest");
            doc.branch_mut(wrapper).unwrap().add(current).unwrap();
            current = wrapper;
        }
        assert_eq!(doc.string_value(current), "leaf");
    }

    #[test]
    fn test_handles_from_another_document_are_rejected() {
        let mut big = Document::new();
        let foreign = big.create_element("far");
        for _ in 0..8 {
            big.create_comment("padding");
        }
        let foreign_last = big.create_element("last");
        assert_ne!(foreign, foreign_last);

        let mut small = Document::new();
        let root = small.root();
        assert_eq!(
            small.branch(foreign_last).err(),
            Some(TreeError::UnknownNode(foreign_last))
        );
        assert!(matches!(
            small.branch_mut(foreign_last),
            Err(TreeError::UnknownNode(_))
        ));
        let mut branch = small.branch_mut(root).unwrap();
        assert_eq!(branch.add(foreign_last), Err(TreeError::UnknownNode(foreign_last)));
        assert!(!branch.remove(foreign_last));
        assert_eq!(
            branch.set_content(vec![foreign_last]),
            Err(TreeError::UnknownNode(foreign_last))
        );
        assert_eq!(small.allocated_nodes(), 1);
    }

    #[test]
    fn test_sort_wide_branch_into_document_order() {
        let mut doc = Document::new();
        let wide = doc.create_element("wide");
        let mut children = Vec::new();
        {
            let mut branch = doc.branch_mut(wide).unwrap();
            for i in 0..10_000 {
                children.push(branch.add_text(i.to_string()).unwrap());
            }
        }
        let mut nodes: Vec<_> = children.iter().rev().copied().collect();
        nodes.push(children[17]);
        nodes.push(wide);
        doc.sort_document_order(&mut nodes);
        assert_eq!(nodes[0], wide);
        assert_eq!(&nodes[1..], children.as_slice());
    }
}
