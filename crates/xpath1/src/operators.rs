//! Comparison, arithmetic and union operators.
//!
//! `or` and `and` are not here: they short-circuit, so the engine handles them
//! before the right operand is evaluated.

use crate::ast::BinaryOperator;
use crate::error::XPathError;
use crate::value::{NodeSet, XPathValue, parse_number};
use sylva_tree::Document;

/// Applies a binary operator to two evaluated operands.
pub fn evaluate(
    op: BinaryOperator,
    left: XPathValue,
    right: XPathValue,
    doc: &Document,
) -> Result<XPathValue, XPathError> {
    match op {
        BinaryOperator::Equals => Ok(XPathValue::Boolean(compare_equality(&left, &right, doc))),
        BinaryOperator::NotEquals => Ok(XPathValue::Boolean(compare_inequality(&left, &right, doc))),
        BinaryOperator::LessThan
        | BinaryOperator::LessThanOrEqual
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterThanOrEqual => {
            Ok(XPathValue::Boolean(compare_relational(op, &left, &right, doc)))
        }
        BinaryOperator::Plus
        | BinaryOperator::Minus
        | BinaryOperator::Multiply
        | BinaryOperator::Divide
        | BinaryOperator::Modulo => {
            let (l, r) = (left.to_number(doc), right.to_number(doc));
            let n = match op {
                BinaryOperator::Plus => l + r,
                BinaryOperator::Minus => l - r,
                BinaryOperator::Multiply => l * r,
                BinaryOperator::Divide => l / r,
                // Truncating remainder, sign of the dividend.
                _ => l % r,
            };
            Ok(XPathValue::Number(n))
        }
        BinaryOperator::Union => {
            let l = into_union_operand(left)?;
            let r = into_union_operand(right)?;
            Ok(XPathValue::NodeSet(l.union(r, doc)))
        }
        BinaryOperator::Or | BinaryOperator::And => {
            Ok(XPathValue::Boolean(match op {
                BinaryOperator::Or => left.to_bool() || right.to_bool(),
                _ => left.to_bool() && right.to_bool(),
            }))
        }
    }
}

fn into_union_operand(value: XPathValue) -> Result<NodeSet, XPathError> {
    value.into_node_set().map_err(|_| {
        XPathError::TypeError("the operands of '|' must be node-sets".to_string())
    })
}

/// `=` with the existential node-set rules of XPath 1.0 section 3.4.
#[allow(clippy::float_cmp)]
pub fn compare_equality(left: &XPathValue, right: &XPathValue, doc: &Document) -> bool {
    match (left, right) {
        (XPathValue::NodeSet(lns), XPathValue::NodeSet(rns)) => {
            let rsv: Vec<String> = rns.iter().map(|n| doc.string_value(n)).collect();
            lns.iter().any(|l| rsv.contains(&doc.string_value(l)))
        }
        (XPathValue::NodeSet(ns), XPathValue::Boolean(b))
        | (XPathValue::Boolean(b), XPathValue::NodeSet(ns)) => !ns.is_empty() == *b,
        (XPathValue::NodeSet(ns), XPathValue::Number(n))
        | (XPathValue::Number(n), XPathValue::NodeSet(ns)) => ns
            .iter()
            .any(|node| parse_number(&doc.string_value(node)) == *n),
        (XPathValue::NodeSet(ns), XPathValue::String(s))
        | (XPathValue::String(s), XPathValue::NodeSet(ns)) => {
            ns.iter().any(|node| doc.string_value(node) == *s)
        }
        (XPathValue::Boolean(_), _) | (_, XPathValue::Boolean(_)) => left.to_bool() == right.to_bool(),
        (XPathValue::Number(_), _) | (_, XPathValue::Number(_)) => {
            left.to_number(doc) == right.to_number(doc)
        }
        _ => left.to_string_value(doc) == right.to_string_value(doc),
    }
}

/// `!=` is existential too, so it is not the negation of `=` when a node-set is
/// involved: `$a != $b` holds if some pair of string-values differs.
#[allow(clippy::float_cmp)]
pub fn compare_inequality(left: &XPathValue, right: &XPathValue, doc: &Document) -> bool {
    match (left, right) {
        (XPathValue::NodeSet(lns), XPathValue::NodeSet(rns)) => {
            let rsv: Vec<String> = rns.iter().map(|n| doc.string_value(n)).collect();
            lns.iter()
                .any(|l| {
                    let lsv = doc.string_value(l);
                    rsv.iter().any(|r| *r != lsv)
                })
        }
        (XPathValue::NodeSet(ns), XPathValue::Number(n))
        | (XPathValue::Number(n), XPathValue::NodeSet(ns)) => ns
            .iter()
            .any(|node| parse_number(&doc.string_value(node)) != *n),
        (XPathValue::NodeSet(ns), XPathValue::String(s))
        | (XPathValue::String(s), XPathValue::NodeSet(ns)) => {
            ns.iter().any(|node| doc.string_value(node) != *s)
        }
        _ => !compare_equality(left, right, doc),
    }
}

/// `<`, `<=`, `>`, `>=`: both sides are compared as numbers, existentially over
/// node-sets.
pub fn compare_relational(
    op: BinaryOperator,
    left: &XPathValue,
    right: &XPathValue,
    doc: &Document,
) -> bool {
    let cmp = |a: f64, b: f64| match op {
        BinaryOperator::LessThan => a < b,
        BinaryOperator::LessThanOrEqual => a <= b,
        BinaryOperator::GreaterThan => a > b,
        BinaryOperator::GreaterThanOrEqual => a >= b,
        _ => false,
    };
    let node_numbers = |v: &XPathValue| -> Option<Vec<f64>> {
        v.as_node_set().map(|ns| {
            ns.iter()
                .map(|n| parse_number(&doc.string_value(n)))
                .collect()
        })
    };

    match (left, right) {
        (XPathValue::NodeSet(_), XPathValue::NodeSet(_)) => {
            let ls = node_numbers(left).unwrap_or_default();
            let rs = node_numbers(right).unwrap_or_default();
            ls.iter().any(|&l| rs.iter().any(|&r| cmp(l, r)))
        }
        // A boolean on the other side turns the node-set into a boolean first.
        (XPathValue::NodeSet(_), XPathValue::Boolean(_))
        | (XPathValue::Boolean(_), XPathValue::NodeSet(_)) => {
            let as_num = |v: &XPathValue| if v.to_bool() { 1.0 } else { 0.0 };
            cmp(as_num(left), as_num(right))
        }
        (XPathValue::NodeSet(_), other) => {
            let r = other.to_number(doc);
            node_numbers(left)
                .unwrap_or_default()
                .into_iter()
                .any(|l| cmp(l, r))
        }
        (other, XPathValue::NodeSet(_)) => {
            let l = other.to_number(doc);
            node_numbers(right)
                .unwrap_or_default()
                .into_iter()
                .any(|r| cmp(l, r))
        }
        _ => cmp(left.to_number(doc), right.to_number(doc)),
    }
}
