//! XPath 1.0 evaluation over a `sylva-tree` [`Document`](sylva_tree::Document).
//!
//! Expressions are supplied as an already-built [`Expression`] tree and
//! evaluated against an [`EvaluationContext`]: a current node plus shared
//! variable and namespace bindings, a [`FunctionLibrary`] and an
//! [`EvaluationConfig`].

pub mod ast;
pub mod axes;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod functions;
pub mod operators;
pub mod value;

#[cfg(test)]
mod test_support;

pub use ast::{Axis, BinaryOperator, Expression, LocationPath, NodeTest, NodeTypeTest, Step, UnaryOperator};
pub use config::EvaluationConfig;
pub use context::{EvaluationContext, NamespaceBindings, VariableBindings};
pub use engine::{evaluate, evaluate_as_bool, evaluate_as_number, evaluate_as_string, select_nodes};
pub use error::XPathError;
pub use functions::{Arity, FunctionLibrary, FunctionName, XPathFunction};
pub use value::{NodeSet, XPathValue, format_number, parse_number};
