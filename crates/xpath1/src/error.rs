use crate::functions::Arity;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum XPathError {
    #[error("Unknown XPath function '{0}'")]
    UnknownFunction(String),

    #[error("Function '{function}' expects {expected} argument(s), got {found}")]
    ArgumentCountMismatch {
        function: String,
        expected: Arity,
        found: usize,
    },

    #[error("Variable '${0}' is not bound")]
    UnresolvedVariable(String),

    #[error("Namespace prefix '{0}' is not bound")]
    UnresolvedNamespace(String),

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Function '{function}' error: {message}")]
    FunctionError { function: String, message: String },

    #[error("Expression nesting exceeds the configured limit of {0}")]
    DepthLimitExceeded(usize),
}
