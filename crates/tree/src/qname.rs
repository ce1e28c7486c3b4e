//! Qualified names for elements, attributes and functions.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The namespace URI permanently bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A qualified name: a local part, an optional prefix and an optional namespace URI.
///
/// Two names are equal when their expanded names (namespace URI plus local part) are
/// equal. The prefix is kept for display purposes only, so `a:item` and `b:item` bound
/// to the same URI compare equal. Names without a URI fall back to comparing prefixes,
/// which keeps unresolved `xml:lang` distinct from a plain `lang`.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct QName {
    pub prefix: Option<String>,
    pub local_part: String,
    pub namespace_uri: Option<String>,
}

impl QName {
    /// Creates a name without prefix or namespace.
    pub fn new(local_part: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local_part: local_part.into(),
            namespace_uri: None,
        }
    }

    /// Creates a name bound to a namespace URI.
    pub fn with_namespace(
        prefix: Option<&str>,
        local_part: impl Into<String>,
        namespace_uri: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            local_part: local_part.into(),
            namespace_uri: Some(namespace_uri.into()),
        }
    }

    /// Splits a lexical `prefix:local` name. The `xml` prefix is bound to its
    /// well-known namespace; any other prefix is left unresolved.
    pub fn parse(lexical: &str) -> Self {
        match lexical.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => Self {
                prefix: Some(prefix.to_string()),
                local_part: local.to_string(),
                namespace_uri: (prefix == "xml").then(|| XML_NAMESPACE.to_string()),
            },
            _ => Self::new(lexical),
        }
    }

    /// The name as written, e.g. `xml:lang`.
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local_part),
            None => self.local_part.clone(),
        }
    }

    pub fn is_prefixed(&self) -> bool {
        self.prefix.is_some()
    }
}

impl PartialEq for QName {
    fn eq(&self, other: &Self) -> bool {
        if self.local_part != other.local_part {
            return false;
        }
        match (&self.namespace_uri, &other.namespace_uri) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.prefix == other.prefix,
            _ => false,
        }
    }
}

impl Hash for QName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.local_part.hash(state);
        match &self.namespace_uri {
            Some(uri) => uri.hash(state),
            None => self.prefix.hash(state),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local_part),
            None => write!(f, "{}", self.local_part),
        }
    }
}

impl From<&str> for QName {
    fn from(s: &str) -> Self {
        QName::parse(s)
    }
}

impl From<String> for QName {
    fn from(s: String) -> Self {
        QName::parse(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefixed_name() {
        let name = QName::parse("fo:block");
        assert_eq!(name.prefix.as_deref(), Some("fo"));
        assert_eq!(name.local_part, "block");
        assert_eq!(name.namespace_uri, None);
        assert_eq!(name.qualified_name(), "fo:block");
    }

    #[test]
    fn test_xml_prefix_is_bound() {
        let name = QName::parse("xml:lang");
        assert_eq!(name.namespace_uri.as_deref(), Some(XML_NAMESPACE));
    }

    #[test]
    fn test_equality_uses_expanded_name() {
        let a = QName::with_namespace(Some("a"), "item", "urn:x");
        let b = QName::with_namespace(Some("b"), "item", "urn:x");
        let c = QName::with_namespace(Some("a"), "item", "urn:y");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(QName::new("item"), a);
    }

    #[test]
    fn test_malformed_lexical_names_stay_local() {
        assert_eq!(QName::parse(":x").local_part, ":x");
        assert_eq!(QName::parse("x:").prefix, None);
    }
}
