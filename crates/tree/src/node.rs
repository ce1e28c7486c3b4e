//! Node handles, node kinds and processing-instruction data.
use crate::qname::QName;
use std::fmt;

/// A handle to a node owned by a [`Document`](crate::Document).
///
/// Handles are only meaningful for the document that allocated them. They are
/// `Copy`, so node-sets and child lists hold plain handles rather than references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The arena slot of this node. Slots are assigned in allocation order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The type tag of a node, aligned with the XPath 1.0 data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Document,
    Element,
    Text,
    Comment,
    ProcessingInstruction,
    Attribute,
}

impl NodeType {
    /// Element and document nodes own children; every other kind is a leaf.
    pub fn is_branch(self) -> bool {
        matches!(self, NodeType::Document | NodeType::Element)
    }
}

/// The payload of a node. Structural links live next to it in the arena.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,
    Element {
        name: QName,
        /// Attribute nodes, in declaration order. They name this element as parent
        /// but are not part of its content.
        attributes: Vec<NodeId>,
    },
    Text {
        content: String,
    },
    Comment {
        content: String,
    },
    ProcessingInstruction {
        target: String,
        data: PiData,
    },
    Attribute {
        name: QName,
        value: String,
    },
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Document => NodeType::Document,
            NodeKind::Element { .. } => NodeType::Element,
            NodeKind::Text { .. } => NodeType::Text,
            NodeKind::Comment { .. } => NodeType::Comment,
            NodeKind::ProcessingInstruction { .. } => NodeType::ProcessingInstruction,
            NodeKind::Attribute { .. } => NodeType::Attribute,
        }
    }
}

/// The data block of a processing instruction.
///
/// The block is stored as text. Instructions built from key/value pairs serialize
/// them as pseudo-attributes (`href="a.css" type="text/css"`), and
/// [`values`](PiData::values) reads such a block back in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PiData {
    text: String,
}

impl PiData {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn from_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<String> = values
            .into_iter()
            .map(|(key, value)| {
                let value = value.as_ref();
                let quote = if value.contains('"') { '\'' } else { '"' };
                format!("{}={quote}{value}{quote}", key.as_ref())
            })
            .collect();
        Self {
            text: pairs.join(" "),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parses the block as `key="value"` pairs. Parsing stops at the first
    /// malformed pair; everything before it is returned.
    pub fn values(&self) -> Vec<(String, String)> {
        let mut values = Vec::new();
        let mut rest = self.text.trim_start();
        while let Some(eq) = rest.find('=') {
            let key = rest[..eq].trim();
            let after = rest[eq + 1..].trim_start();
            let Some(quote) = after.chars().next().filter(|c| *c == '"' || *c == '\'') else {
                break;
            };
            let body = &after[1..];
            let Some(end) = body.find(quote) else {
                break;
            };
            if key.is_empty() || key.contains(char::is_whitespace) {
                break;
            }
            values.push((key.to_string(), body[..end].to_string()));
            rest = body[end + 1..].trim_start();
        }
        values
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

impl fmt::Display for PiData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Arena slot: the payload plus the structural links of one node.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl NodeData {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pi_values_round_trip_in_order() {
        let data = PiData::from_values([("type", "text/xsl"), ("href", "style.xsl")]);
        assert_eq!(data.text(), r#"type="text/xsl" href="style.xsl""#);
        assert_eq!(
            data.values(),
            vec![
                ("type".to_string(), "text/xsl".to_string()),
                ("href".to_string(), "style.xsl".to_string()),
            ]
        );
        assert_eq!(data.value("href").as_deref(), Some("style.xsl"));
        assert_eq!(data.value("media"), None);
    }

    #[test]
    fn test_pi_values_with_quotes_switch_delimiter() {
        let data = PiData::from_values([("title", r#"say "hi""#)]);
        assert_eq!(data.text(), r#"title='say "hi"'"#);
        assert_eq!(data.value("title").as_deref(), Some(r#"say "hi""#));
    }

    #[test]
    fn test_pi_values_stop_at_malformed_pair() {
        let data = PiData::from_text("a='1' b=2 c='3'");
        assert_eq!(data.values(), vec![("a".to_string(), "1".to_string())]);
        assert!(PiData::from_text("free form text").values().is_empty());
    }

    #[test]
    fn test_branch_kinds() {
        assert!(NodeType::Element.is_branch());
        assert!(NodeType::Document.is_branch());
        assert!(!NodeType::Text.is_branch());
        assert!(!NodeType::Attribute.is_branch());
    }
}
