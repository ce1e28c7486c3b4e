//! Contains pure functions for collecting nodes along each XPath axis.
//!
//! Attributes have a parent but are not its children, so they have no siblings.
//! Their `following` axis starts with the parent's descendants and their
//! `preceding` axis is the parent's.

use crate::ast::Axis;
use sylva_tree::{Document, NodeId, NodeType};

/// Collects the nodes on `axis` from `node`, in document order.
pub fn collect_axis(doc: &Document, axis: Axis, node: NodeId) -> Vec<NodeId> {
    let mut results = Vec::new();
    match axis {
        Axis::Child => collect_child_nodes(doc, node, &mut results),
        Axis::Descendant => collect_descendant_nodes(doc, node, &mut results),
        Axis::DescendantOrSelf => collect_descendant_or_self_nodes(doc, node, &mut results),
        Axis::Parent => collect_parent_nodes(doc, node, &mut results),
        Axis::Ancestor => collect_ancestor_nodes(doc, node, &mut results),
        Axis::AncestorOrSelf => {
            collect_ancestor_nodes(doc, node, &mut results);
            results.push(node);
        }
        Axis::FollowingSibling => collect_following_sibling_nodes(doc, node, &mut results),
        Axis::PrecedingSibling => collect_preceding_sibling_nodes(doc, node, &mut results),
        Axis::Following => collect_following_nodes(doc, node, &mut results),
        Axis::Preceding => collect_preceding_nodes(doc, node, &mut results),
        Axis::Attribute => collect_attribute_nodes(doc, node, &mut results),
        Axis::SelfAxis => results.push(node),
    }
    results
}

pub fn collect_child_nodes(doc: &Document, node: NodeId, results: &mut Vec<NodeId>) {
    results.extend_from_slice(doc.children(node));
}

pub fn collect_attribute_nodes(doc: &Document, node: NodeId, results: &mut Vec<NodeId>) {
    results.extend_from_slice(doc.attributes(node));
}

pub fn collect_descendant_nodes(doc: &Document, node: NodeId, results: &mut Vec<NodeId>) {
    results.extend(doc.descendants(node));
}

pub fn collect_descendant_or_self_nodes(doc: &Document, node: NodeId, results: &mut Vec<NodeId>) {
    results.push(node);
    collect_descendant_nodes(doc, node, results);
}

pub fn collect_parent_nodes(doc: &Document, node: NodeId, results: &mut Vec<NodeId>) {
    results.extend(doc.parent(node));
}

/// Ancestors from the root down to the parent.
pub fn collect_ancestor_nodes(doc: &Document, node: NodeId, results: &mut Vec<NodeId>) {
    let start = results.len();
    results.extend(doc.ancestors(node));
    results[start..].reverse();
}

pub fn collect_following_sibling_nodes(doc: &Document, node: NodeId, results: &mut Vec<NodeId>) {
    if let Some((siblings, index)) = sibling_position(doc, node) {
        results.extend_from_slice(&siblings[index + 1..]);
    }
}

pub fn collect_preceding_sibling_nodes(doc: &Document, node: NodeId, results: &mut Vec<NodeId>) {
    if let Some((siblings, index)) = sibling_position(doc, node) {
        results.extend_from_slice(&siblings[..index]);
    }
}

pub fn collect_following_nodes(doc: &Document, node: NodeId, results: &mut Vec<NodeId>) {
    let mut current = node;
    if doc.node_type(node) == NodeType::Attribute {
        match doc.parent(node) {
            Some(parent) => {
                collect_descendant_nodes(doc, parent, results);
                current = parent;
            }
            None => return,
        }
    }
    let mut levels = Vec::new();
    while let Some((siblings, index)) = sibling_position(doc, current) {
        levels.push(&siblings[index + 1..]);
        current = doc.parent(current).unwrap_or(current);
    }
    // Nearer levels come first in document order.
    for following in levels {
        for &sibling in following {
            collect_descendant_or_self_nodes(doc, sibling, results);
        }
    }
}

pub fn collect_preceding_nodes(doc: &Document, node: NodeId, results: &mut Vec<NodeId>) {
    let mut current = node;
    if doc.node_type(node) == NodeType::Attribute {
        match doc.parent(node) {
            Some(parent) => current = parent,
            None => return,
        }
    }
    let mut levels = Vec::new();
    while let Some((siblings, index)) = sibling_position(doc, current) {
        levels.push(&siblings[..index]);
        current = doc.parent(current).unwrap_or(current);
    }
    // Outer levels come first in document order.
    for preceding in levels.into_iter().rev() {
        for &sibling in preceding {
            collect_descendant_or_self_nodes(doc, sibling, results);
        }
    }
}

/// The child list containing `node` and its index there. `None` for attributes
/// and for nodes without a parent.
fn sibling_position(doc: &Document, node: NodeId) -> Option<(&[NodeId], usize)> {
    if doc.node_type(node) == NodeType::Attribute {
        return None;
    }
    let siblings = doc.children(doc.parent(node)?);
    let index = siblings.iter().position(|&s| s == node)?;
    Some((siblings, index))
}
