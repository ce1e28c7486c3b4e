//! The evaluation engine for executing an XPath AST against a [`Document`].
//!
//! Location steps run once per context node: the axis is collected, filtered by
//! the node test and then narrowed by each predicate with the proximity
//! positions of that axis. The per-node results are merged back into document
//! order before the next step.

use crate::ast::{Axis, BinaryOperator, Expression, LocationPath, NodeTest, NodeTypeTest, Step, UnaryOperator};
use crate::context::EvaluationContext;
use crate::error::XPathError;
use crate::functions::FunctionName;
use crate::value::{NodeSet, XPathValue};
use crate::{axes, operators};
use log::{trace, warn};
use sylva_tree::{Document, NodeId, NodeKind, NodeType};

/// Evaluates an expression and returns a concrete `XPathValue`.
pub fn evaluate(expr: &Expression, ctx: &EvaluationContext<'_>) -> Result<XPathValue, XPathError> {
    eval(expr, ctx, 0)
}

/// Evaluates an expression and converts the result with `string()`.
pub fn evaluate_as_string(expr: &Expression, ctx: &EvaluationContext<'_>) -> Result<String, XPathError> {
    Ok(evaluate(expr, ctx)?.to_string_value(ctx.document()))
}

/// Evaluates an expression and converts the result with `number()`.
pub fn evaluate_as_number(expr: &Expression, ctx: &EvaluationContext<'_>) -> Result<f64, XPathError> {
    Ok(evaluate(expr, ctx)?.to_number(ctx.document()))
}

/// Evaluates an expression and converts the result with `boolean()`.
pub fn evaluate_as_bool(expr: &Expression, ctx: &EvaluationContext<'_>) -> Result<bool, XPathError> {
    Ok(evaluate(expr, ctx)?.to_bool())
}

/// Evaluates an expression that must produce a node-set.
pub fn select_nodes(expr: &Expression, ctx: &EvaluationContext<'_>) -> Result<NodeSet, XPathError> {
    evaluate(expr, ctx)?.into_node_set()
}

fn eval(expr: &Expression, ctx: &EvaluationContext<'_>, depth: usize) -> Result<XPathValue, XPathError> {
    let limit = ctx.config().max_depth;
    if depth > limit {
        return Err(XPathError::DepthLimitExceeded(limit));
    }
    let doc = ctx.document();

    match expr {
        Expression::Literal(s) => Ok(XPathValue::String(s.clone())),
        Expression::Number(n) => Ok(XPathValue::Number(*n)),
        Expression::LocationPath(path) => evaluate_location_path(path, ctx, depth).map(XPathValue::NodeSet),
        Expression::Variable(name) => match ctx.resolve_variable(name) {
            Ok(value) => Ok(value.clone()),
            Err(err) if ctx.config().strict => Err(err),
            Err(_) => {
                warn!("Variable '${name}' is not bound; using the empty string");
                Ok(XPathValue::String(String::new()))
            }
        },
        Expression::FunctionCall { name, args } => {
            let function = resolve_function_name(name, ctx)?;
            let evaluated = args
                .iter()
                .map(|arg| eval(arg, ctx, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            ctx.function_library().call(&function, ctx, evaluated)
        }
        Expression::Filter { primary, predicates } => {
            let nodes = eval(primary, ctx, depth + 1)?.into_node_set()?;
            let kept = apply_predicates(nodes.into_vec(), predicates, ctx, depth)?;
            Ok(XPathValue::NodeSet(NodeSet::from_nodes(doc, kept)))
        }
        Expression::BinaryOp { left, op: BinaryOperator::Or, right } => {
            if eval(left, ctx, depth + 1)?.to_bool() {
                return Ok(XPathValue::Boolean(true));
            }
            Ok(XPathValue::Boolean(eval(right, ctx, depth + 1)?.to_bool()))
        }
        Expression::BinaryOp { left, op: BinaryOperator::And, right } => {
            if !eval(left, ctx, depth + 1)?.to_bool() {
                return Ok(XPathValue::Boolean(false));
            }
            Ok(XPathValue::Boolean(eval(right, ctx, depth + 1)?.to_bool()))
        }
        Expression::BinaryOp { left, op, right } => {
            let left_val = eval(left, ctx, depth + 1)?;
            let right_val = eval(right, ctx, depth + 1)?;
            operators::evaluate(*op, left_val, right_val, doc)
        }
        Expression::UnaryOp { op: UnaryOperator::Minus, expr } => {
            let val = eval(expr, ctx, depth + 1)?;
            Ok(XPathValue::Number(-val.to_number(doc)))
        }
    }
}

/// `prefix:local` names resolve through the namespace bindings; plain names are
/// core functions.
fn resolve_function_name(name: &str, ctx: &EvaluationContext<'_>) -> Result<FunctionName, XPathError> {
    match name.split_once(':') {
        Some((prefix, local)) => {
            let uri = ctx.resolve_namespace(prefix)?;
            Ok(FunctionName::in_namespace(uri, local))
        }
        None => Ok(FunctionName::core(name)),
    }
}

fn evaluate_location_path(
    path: &LocationPath,
    ctx: &EvaluationContext<'_>,
    depth: usize,
) -> Result<NodeSet, XPathError> {
    let doc = ctx.document();
    let mut current = if let Some(start) = &path.start_point {
        eval(start, ctx, depth + 1)?.into_node_set()?
    } else if path.is_absolute {
        NodeSet::singleton(doc.tree_root(ctx.current_node()))
    } else {
        NodeSet::singleton(ctx.current_node())
    };

    for step in &path.steps {
        current = evaluate_step(step, &current, ctx, depth)?;
    }
    Ok(current)
}

fn evaluate_step(
    step: &Step,
    context_nodes: &NodeSet,
    ctx: &EvaluationContext<'_>,
    depth: usize,
) -> Result<NodeSet, XPathError> {
    let doc = ctx.document();
    let test = ResolvedTest::new(&step.node_test, step.axis, ctx)?;

    let mut selected = Vec::new();
    for node in context_nodes.iter() {
        let mut candidates = axes::collect_axis(doc, step.axis, node);
        candidates.retain(|&candidate| test.matches(doc, candidate));
        if step.axis.is_reverse() {
            candidates.reverse();
        }
        selected.extend(apply_predicates(candidates, &step.predicates, ctx, depth)?);
    }

    let result = NodeSet::from_nodes(doc, selected);
    trace!(
        "Step {:?}::{:?} over {} context node(s) selected {}",
        step.axis,
        step.node_test,
        context_nodes.len(),
        result.len()
    );
    Ok(result)
}

/// Narrows `nodes`, given in proximity order, by each predicate in turn. A number
/// keeps the node at that position; any other result is converted to a boolean.
fn apply_predicates(
    nodes: Vec<NodeId>,
    predicates: &[Expression],
    ctx: &EvaluationContext<'_>,
    depth: usize,
) -> Result<Vec<NodeId>, XPathError> {
    let mut current = nodes;
    for predicate in predicates {
        let size = current.len();
        let mut kept = Vec::with_capacity(size);
        for (i, node) in current.into_iter().enumerate() {
            let position = i + 1;
            let predicate_ctx = ctx.derive(node, position, size);
            let keep = match eval(predicate, &predicate_ctx, depth + 1)? {
                #[allow(clippy::float_cmp)]
                XPathValue::Number(n) => n == position as f64,
                other => other.to_bool(),
            };
            if keep {
                kept.push(node);
            }
        }
        current = kept;
    }
    Ok(current)
}

/// A node test with its namespace prefix already resolved.
enum ResolvedTest<'t> {
    /// `node()`
    Any,
    /// `*`: any node of the axis's principal type.
    Principal(NodeType),
    /// `p:*`
    Namespace { principal: NodeType, uri: &'t str },
    /// An unprefixed name, or a prefixed one whose namespace URI is known.
    Name {
        principal: NodeType,
        uri: Option<&'t str>,
        local: &'t str,
    },
    /// A prefixed name with an unbound prefix, matched on the lexical prefix.
    /// Only reachable when evaluation is not strict.
    LexicalName {
        principal: NodeType,
        prefix: &'t str,
        local: &'t str,
    },
    Text,
    Comment,
    ProcessingInstruction(Option<&'t str>),
}

impl<'t> ResolvedTest<'t> {
    fn new(test: &'t NodeTest, axis: Axis, ctx: &EvaluationContext<'t>) -> Result<Self, XPathError> {
        let principal = if axis == Axis::Attribute {
            NodeType::Attribute
        } else {
            NodeType::Element
        };
        Ok(match test {
            NodeTest::Wildcard => ResolvedTest::Principal(principal),
            NodeTest::NamespaceWildcard(prefix) => ResolvedTest::Namespace {
                principal,
                uri: ctx.resolve_namespace(prefix)?,
            },
            NodeTest::Name { prefix: None, local_part } => ResolvedTest::Name {
                principal,
                uri: None,
                local: local_part,
            },
            NodeTest::Name { prefix: Some(prefix), local_part } => match ctx.resolve_namespace(prefix) {
                Ok(uri) => ResolvedTest::Name {
                    principal,
                    uri: Some(uri),
                    local: local_part,
                },
                Err(err) if ctx.config().strict => return Err(err),
                Err(_) => ResolvedTest::LexicalName {
                    principal,
                    prefix,
                    local: local_part,
                },
            },
            NodeTest::NodeType(NodeTypeTest::Node) => ResolvedTest::Any,
            NodeTest::NodeType(NodeTypeTest::Text) => ResolvedTest::Text,
            NodeTest::NodeType(NodeTypeTest::Comment) => ResolvedTest::Comment,
            NodeTest::NodeType(NodeTypeTest::ProcessingInstruction(target)) => {
                ResolvedTest::ProcessingInstruction(target.as_deref())
            }
        })
    }

    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        match self {
            ResolvedTest::Any => true,
            ResolvedTest::Principal(principal) => doc.node_type(node) == *principal,
            ResolvedTest::Namespace { principal, uri } => {
                doc.node_type(node) == *principal
                    && doc
                        .name(node)
                        .is_some_and(|q| q.namespace_uri.as_deref() == Some(*uri))
            }
            ResolvedTest::Name { principal, uri, local } => {
                doc.node_type(node) == *principal
                    && doc.name(node).is_some_and(|q| {
                        q.local_part == *local
                            && match uri {
                                Some(uri) => q.namespace_uri.as_deref() == Some(*uri),
                                None => q.namespace_uri.is_none() && q.prefix.is_none(),
                            }
                    })
            }
            ResolvedTest::LexicalName { principal, prefix, local } => {
                doc.node_type(node) == *principal
                    && doc
                        .name(node)
                        .is_some_and(|q| q.local_part == *local && q.prefix.as_deref() == Some(*prefix))
            }
            ResolvedTest::Text => doc.node_type(node) == NodeType::Text,
            ResolvedTest::Comment => doc.node_type(node) == NodeType::Comment,
            ResolvedTest::ProcessingInstruction(target) => match doc.kind(node) {
                NodeKind::ProcessingInstruction { target: actual, .. } => {
                    target.is_none_or(|t| t == actual.as_str())
                }
                _ => false,
            },
        }
    }
}
