//! A mutable document tree with an XPath 1.0 evaluation core.
//!
//! Trees are built and edited through the [`Branch`] contract of
//! [`sylva_tree`]; expressions are assembled as [`Expression`] values and
//! evaluated by [`sylva_xpath1`] against an [`EvaluationContext`].

pub mod error;

pub use error::Error;
pub use sylva_tree as tree;
pub use sylva_xpath1 as xpath;

pub use sylva_tree::{Branch, BranchMut, BranchRef, Document, NodeId, NodeType, PiData, QName, TreeError};
pub use sylva_xpath1::{
    EvaluationConfig, EvaluationContext, Expression, FunctionLibrary, NodeSet, XPathError, XPathValue,
    evaluate, evaluate_as_bool, evaluate_as_number, evaluate_as_string, select_nodes,
};

use log::debug;

/// Loads an [`EvaluationConfig`] from JSON. Missing fields take their defaults.
pub fn config_from_json(json: &str) -> Result<EvaluationConfig, Error> {
    let config: EvaluationConfig = serde_json::from_str(json)?;
    debug!("Loaded evaluation config: {config:?}");
    Ok(config)
}
