//! The ambient state an expression is evaluated against.

use crate::config::EvaluationConfig;
use crate::error::XPathError;
use crate::functions::FunctionLibrary;
use crate::value::XPathValue;
use std::collections::HashMap;
use sylva_tree::{Document, NodeId, XML_NAMESPACE};

/// Variable name (without `$`) to value.
pub type VariableBindings = HashMap<String, XPathValue>;

/// Namespace prefix to namespace URI.
pub type NamespaceBindings = HashMap<String, String>;

/// Holds the context for a single evaluation step.
///
/// The context is a handful of references plus the current node, position and
/// size, so it is `Copy`. Bindings and the function library are shared by every
/// context derived from it and cannot be changed through any of them.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'d> {
    document: &'d Document,
    node: NodeId,
    position: usize,
    size: usize,
    variables: Option<&'d VariableBindings>,
    namespaces: Option<&'d NamespaceBindings>,
    functions: &'d FunctionLibrary,
    config: &'d EvaluationConfig,
}

impl<'d> EvaluationContext<'d> {
    /// A context positioned on `node` with position and size 1, no variables, no
    /// namespace bindings and the default configuration.
    pub fn new(document: &'d Document, node: NodeId, functions: &'d FunctionLibrary) -> Self {
        Self {
            document,
            node,
            position: 1,
            size: 1,
            variables: None,
            namespaces: None,
            functions,
            config: &EvaluationConfig::DEFAULT,
        }
    }

    pub fn with_variables(mut self, variables: &'d VariableBindings) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn with_namespaces(mut self, namespaces: &'d NamespaceBindings) -> Self {
        self.namespaces = Some(namespaces);
        self
    }

    pub fn with_config(mut self, config: &'d EvaluationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn current_node(&self) -> NodeId {
        self.node
    }

    /// The 1-based proximity position of the current node.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn document(&self) -> &'d Document {
        self.document
    }

    pub fn function_library(&self) -> &'d FunctionLibrary {
        self.functions
    }

    pub fn config(&self) -> &'d EvaluationConfig {
        self.config
    }

    pub fn resolve_variable(&self, name: &str) -> Result<&'d XPathValue, XPathError> {
        self.variables
            .and_then(|vars| vars.get(name))
            .ok_or_else(|| XPathError::UnresolvedVariable(name.to_string()))
    }

    /// Resolves a prefix to its namespace URI. The `xml` prefix is always bound.
    pub fn resolve_namespace(&self, prefix: &str) -> Result<&'d str, XPathError> {
        if let Some(uri) = self.namespaces.and_then(|ns| ns.get(prefix)) {
            return Ok(uri.as_str());
        }
        if prefix == "xml" {
            return Ok(XML_NAMESPACE);
        }
        Err(XPathError::UnresolvedNamespace(prefix.to_string()))
    }

    /// A new context on `node` that shares this context's bindings, library and
    /// configuration.
    pub fn derive(&self, node: NodeId, position: usize, size: usize) -> Self {
        Self {
            node,
            position,
            size,
            ..*self
        }
    }
}
