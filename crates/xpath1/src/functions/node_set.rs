//! Node-set functions: `last`, `position`, `count`, `id`, `local-name`,
//! `namespace-uri`, `name`.

use super::{exact, optional};
use crate::context::EvaluationContext;
use crate::error::XPathError;
use crate::value::{NodeSet, XPathValue};
use std::collections::HashSet;
use sylva_tree::{NodeId, NodeKind, NodeType};

pub(super) fn last(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    exact::<0>("last", args)?;
    Ok(XPathValue::Number(ctx.size() as f64))
}

pub(super) fn position(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    exact::<0>("position", args)?;
    Ok(XPathValue::Number(ctx.position() as f64))
}

pub(super) fn count(_ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let [arg] = exact::<1>("count", args)?;
    match arg {
        XPathValue::NodeSet(nodes) => Ok(XPathValue::Number(nodes.len() as f64)),
        v => Err(XPathError::TypeError(format!(
            "count() argument must be a node-set, got a {}",
            v.type_name()
        ))),
    }
}

/// Selects the elements whose `id` or `xml:id` attribute matches one of the
/// whitespace-separated tokens. A node-set argument contributes the tokens of
/// every node's string-value.
pub(super) fn id(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let [arg] = exact::<1>("id", args)?;
    let doc = ctx.document();
    let source = match &arg {
        XPathValue::NodeSet(nodes) => nodes.iter().map(|n| doc.string_value(n)).collect::<Vec<_>>().join(" "),
        other => other.to_string_value(doc),
    };
    let wanted: HashSet<&str> = source.split_ascii_whitespace().collect();
    if wanted.is_empty() {
        return Ok(NodeSet::new().into());
    }

    let root = doc.tree_root(ctx.current_node());
    let found = std::iter::once(root)
        .chain(doc.descendants(root))
        .filter(|&n| doc.node_type(n) == NodeType::Element)
        .filter(|&n| {
            ["id", "xml:id"]
                .iter()
                .filter_map(|attr| doc.attribute(n, attr))
                .any(|value| wanted.contains(value))
        })
        .collect();
    Ok(NodeSet::from_nodes(doc, found).into())
}

pub(super) fn local_name(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let node = target_node("local-name", ctx, args)?;
    let doc = ctx.document();
    let name = node.map_or_else(String::new, |n| match doc.kind(n) {
        NodeKind::Element { name, .. } | NodeKind::Attribute { name, .. } => name.local_part.clone(),
        NodeKind::ProcessingInstruction { target, .. } => target.clone(),
        _ => String::new(),
    });
    Ok(XPathValue::String(name))
}

pub(super) fn namespace_uri(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let node = target_node("namespace-uri", ctx, args)?;
    let uri = node
        .and_then(|n| ctx.document().name(n))
        .and_then(|q| q.namespace_uri.clone())
        .unwrap_or_default();
    Ok(XPathValue::String(uri))
}

pub(super) fn name(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let node = target_node("name", ctx, args)?;
    let doc = ctx.document();
    let name = node.map_or_else(String::new, |n| match doc.kind(n) {
        NodeKind::Element { name, .. } | NodeKind::Attribute { name, .. } => name.qualified_name(),
        NodeKind::ProcessingInstruction { target, .. } => target.clone(),
        _ => String::new(),
    });
    Ok(XPathValue::String(name))
}

/// The node a name function reports on: the first node of the argument, or the
/// context node when called without one.
fn target_node(
    function: &str,
    ctx: &EvaluationContext<'_>,
    args: Vec<XPathValue>,
) -> Result<Option<NodeId>, XPathError> {
    match optional(function, args)? {
        None => Ok(Some(ctx.current_node())),
        Some(XPathValue::NodeSet(nodes)) => Ok(nodes.first()),
        Some(v) => Err(XPathError::TypeError(format!(
            "{function}() argument must be a node-set, got a {}",
            v.type_name()
        ))),
    }
}
