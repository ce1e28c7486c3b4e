use super::{exact, optional};
use crate::context::EvaluationContext;
use crate::error::XPathError;
use crate::value::{XPathValue, parse_number};

/// XPath rounding: halves go towards positive infinity, NaN and infinities are
/// kept, and values in `[-0.5, 0)` round to negative zero.
pub(crate) fn xpath_round(n: f64) -> f64 {
    if n.is_nan() || n.is_infinite() || n == 0.0 {
        n
    } else if (-0.5..0.0).contains(&n) {
        -0.0
    } else {
        let floor = n.floor();
        if n - floor >= 0.5 { floor + 1.0 } else { floor }
    }
}

/// `number()`: without an argument, the context node's string-value as a number.
pub(super) fn number(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let doc = ctx.document();
    let n = match optional("number", args)? {
        Some(arg) => arg.to_number(doc),
        None => parse_number(&doc.string_value(ctx.current_node())),
    };
    Ok(XPathValue::Number(n))
}

/// Sum of the numeric values of each node. Any non-numeric node makes it NaN.
pub(super) fn sum(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let doc = ctx.document();
    let [arg] = exact::<1>("sum", args)?;
    match arg {
        XPathValue::NodeSet(nodes) => Ok(XPathValue::Number(
            nodes.iter().map(|n| parse_number(&doc.string_value(n))).sum(),
        )),
        v => Err(XPathError::TypeError(format!(
            "sum() argument must be a node-set, got a {}",
            v.type_name()
        ))),
    }
}

pub(super) fn floor(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let [arg] = exact::<1>("floor", args)?;
    Ok(XPathValue::Number(arg.to_number(ctx.document()).floor()))
}

pub(super) fn ceiling(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let [arg] = exact::<1>("ceiling", args)?;
    Ok(XPathValue::Number(arg.to_number(ctx.document()).ceil()))
}

pub(super) fn round(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let [arg] = exact::<1>("round", args)?;
    Ok(XPathValue::Number(xpath_round(arg.to_number(ctx.document()))))
}
