use sylva_tree::TreeError;
use sylva_xpath1::XPathError;
use thiserror::Error;

/// An error from any layer of the crate: tree mutation, evaluation, or loading
/// configuration.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Tree operation failed: {0}")]
    Tree(#[from] TreeError),

    #[error("XPath evaluation failed: {0}")]
    XPath(#[from] XPathError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
