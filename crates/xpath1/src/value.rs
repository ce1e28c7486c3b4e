//! XPath 1.0 values and the coercion rules between them.
//!
//! Coercion of a node-set needs the string-value of its first node, so the
//! string and number conversions take the [`Document`] the handles belong to.

use crate::error::XPathError;
use sylva_tree::{Document, NodeId};

/// A document-ordered, duplicate-free sequence of node handles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSet(Vec<NodeId>);

impl NodeSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds a node-set from handles in any order, sorting them into document
    /// order and dropping duplicates.
    pub fn from_nodes(doc: &Document, mut nodes: Vec<NodeId>) -> Self {
        doc.sort_document_order(&mut nodes);
        Self(nodes)
    }

    pub fn singleton(node: NodeId) -> Self {
        Self(vec![node])
    }

    /// The first node in document order.
    pub fn first(&self) -> Option<NodeId> {
        self.0.first().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.0.contains(&node)
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<NodeId> {
        self.0
    }

    /// The union of two node-sets, in document order.
    pub fn union(self, other: NodeSet, doc: &Document) -> NodeSet {
        let mut nodes = self.0;
        nodes.extend(other.0);
        NodeSet::from_nodes(doc, nodes)
    }
}

impl IntoIterator for NodeSet {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Represents the possible result types of an XPath expression evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum XPathValue {
    NodeSet(NodeSet),
    String(String),
    Number(f64),
    Boolean(bool),
}

impl XPathValue {
    /// Coerces the value to a boolean as per XPath 1.0 rules.
    pub fn to_bool(&self) -> bool {
        match self {
            XPathValue::NodeSet(nodes) => !nodes.is_empty(),
            XPathValue::String(s) => !s.is_empty(),
            XPathValue::Number(n) => *n != 0.0 && !n.is_nan(),
            XPathValue::Boolean(b) => *b,
        }
    }

    /// Coerces the value to a number as per XPath 1.0 rules. An empty node-set
    /// becomes NaN.
    pub fn to_number(&self, doc: &Document) -> f64 {
        match self {
            XPathValue::Number(n) => *n,
            XPathValue::String(s) => parse_number(s),
            XPathValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            XPathValue::NodeSet(nodes) => nodes
                .first()
                .map_or(f64::NAN, |n| parse_number(&doc.string_value(n))),
        }
    }

    /// Coerces the value to a string as per XPath 1.0 rules. A node-set becomes the
    /// string-value of its first node, or the empty string when it is empty.
    pub fn to_string_value(&self, doc: &Document) -> String {
        match self {
            XPathValue::NodeSet(nodes) => nodes
                .first()
                .map(|n| doc.string_value(n))
                .unwrap_or_default(),
            XPathValue::String(s) => s.clone(),
            XPathValue::Number(n) => format_number(*n),
            XPathValue::Boolean(b) => b.to_string(),
        }
    }

    pub fn as_node_set(&self) -> Option<&NodeSet> {
        match self {
            XPathValue::NodeSet(nodes) => Some(nodes),
            _ => None,
        }
    }

    /// Unwraps a node-set, failing with a type error for every other value.
    pub fn into_node_set(self) -> Result<NodeSet, XPathError> {
        match self {
            XPathValue::NodeSet(nodes) => Ok(nodes),
            other => Err(XPathError::TypeError(format!(
                "expected a node-set, got a {}",
                other.type_name()
            ))),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            XPathValue::NodeSet(_) => "node-set",
            XPathValue::String(_) => "string",
            XPathValue::Number(_) => "number",
            XPathValue::Boolean(_) => "boolean",
        }
    }
}

impl From<NodeSet> for XPathValue {
    fn from(nodes: NodeSet) -> Self {
        XPathValue::NodeSet(nodes)
    }
}

impl From<NodeId> for XPathValue {
    fn from(node: NodeId) -> Self {
        XPathValue::NodeSet(NodeSet::singleton(node))
    }
}

impl From<String> for XPathValue {
    fn from(s: String) -> Self {
        XPathValue::String(s)
    }
}

impl From<&str> for XPathValue {
    fn from(s: &str) -> Self {
        XPathValue::String(s.to_string())
    }
}

impl From<f64> for XPathValue {
    fn from(n: f64) -> Self {
        XPathValue::Number(n)
    }
}

impl From<bool> for XPathValue {
    fn from(b: bool) -> Self {
        XPathValue::Boolean(b)
    }
}

/// Formats a number per the XPath `string()` rules: `NaN`, `Infinity`,
/// `-Infinity`, integers without a decimal point, negative zero as `0`, and
/// plain decimal notation otherwise.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e18 {
        #[allow(clippy::cast_possible_truncation)]
        let integer = n as i64;
        return integer.to_string();
    }
    format!("{n}")
}

/// Parses a string with the XPath number grammar: optional whitespace, an optional
/// minus sign, digits with at most one decimal point, optional whitespace.
/// Anything else (exponents, `+`, `inf`) is NaN.
pub fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r'));
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let well_formed = digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1;
    if well_formed {
        trimmed.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}
