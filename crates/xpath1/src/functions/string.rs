//! String functions.

use super::{Arity, exact, mismatch, number::xpath_round, string_or_context};
use crate::context::EvaluationContext;
use crate::error::XPathError;
use crate::value::XPathValue;
use itertools::Itertools;

/// `string()`: without an argument, the string-value of the context node.
pub(super) fn string(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    string_or_context("string", ctx, args).map(XPathValue::String)
}

pub(super) fn concat(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let doc = ctx.document();
    Ok(XPathValue::String(
        args.iter().map(|v| v.to_string_value(doc)).collect(),
    ))
}

pub(super) fn starts_with(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let (s1, s2) = two_strings("starts-with", ctx, args)?;
    Ok(XPathValue::Boolean(s1.starts_with(&s2)))
}

pub(super) fn contains(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let (s1, s2) = two_strings("contains", ctx, args)?;
    Ok(XPathValue::Boolean(s1.contains(&s2)))
}

pub(super) fn substring_before(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let (s1, s2) = two_strings("substring-before", ctx, args)?;
    let before = s1.find(&s2).map(|i| s1[..i].to_string()).unwrap_or_default();
    Ok(XPathValue::String(before))
}

pub(super) fn substring_after(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let (s1, s2) = two_strings("substring-after", ctx, args)?;
    let after = s1
        .find(&s2)
        .map(|i| s1[i + s2.len()..].to_string())
        .unwrap_or_default();
    Ok(XPathValue::String(after))
}

/// Characters at 1-based positions `p` with `round(start) <= p < round(start) + round(length)`.
/// NaN bounds select nothing.
pub(super) fn substring(ctx: &EvaluationContext<'_>, mut args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let doc = ctx.document();
    let length = match args.len() {
        3 => args.pop().map(|v| v.to_number(doc)),
        2 => None,
        found => return Err(mismatch("substring", Arity::Range(2, 3), found)),
    };
    let [source, start] = exact::<2>("substring", args)?;
    let source = source.to_string_value(doc);
    let first = xpath_round(start.to_number(doc));
    let end = length.map_or(f64::INFINITY, |l| first + xpath_round(l));

    let result = source
        .chars()
        .enumerate()
        .filter(|(i, _)| {
            let pos = (*i + 1) as f64;
            pos >= first && pos < end
        })
        .map(|(_, c)| c)
        .collect();
    Ok(XPathValue::String(result))
}

pub(super) fn string_length(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let s = string_or_context("string-length", ctx, args)?;
    Ok(XPathValue::Number(s.chars().count() as f64))
}

/// Strips leading and trailing whitespace and collapses inner runs to one space.
pub(super) fn normalize_space(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let s = string_or_context("normalize-space", ctx, args)?;
    let normalized = s
        .split(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
        .filter(|token| !token.is_empty())
        .join(" ");
    Ok(XPathValue::String(normalized))
}

/// Replaces each character found in the second argument by the character at the
/// same position in the third; characters with no counterpart are dropped.
pub(super) fn translate(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let doc = ctx.document();
    let [source, from, to] = exact::<3>("translate", args)?;
    let from: Vec<char> = from.to_string_value(doc).chars().collect();
    let to: Vec<char> = to.to_string_value(doc).chars().collect();
    let result = source
        .to_string_value(doc)
        .chars()
        .filter_map(|c| match from.iter().position(|&f| f == c) {
            Some(pos) => to.get(pos).copied(),
            None => Some(c),
        })
        .collect();
    Ok(XPathValue::String(result))
}

fn two_strings(
    function: &str,
    ctx: &EvaluationContext<'_>,
    args: Vec<XPathValue>,
) -> Result<(String, String), XPathError> {
    let doc = ctx.document();
    let [a, b] = exact::<2>(function, args)?;
    Ok((a.to_string_value(doc), b.to_string_value(doc)))
}

#[cfg(test)]
mod tests {
    use crate::error::XPathError;
    use crate::functions::FunctionLibrary;
    use crate::test_support::TestTree;
    use crate::value::{NodeSet, XPathValue};
    use sylva_tree::NodeId;

    fn call_on(tree: &TestTree, node: NodeId, name: &str, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
        let library = FunctionLibrary::core();
        let ctx = tree.context(&library, node);
        library.call(&name.into(), &ctx, args)
    }

    fn string_of(tree: &TestTree, name: &str, args: Vec<XPathValue>) -> String {
        match call_on(tree, tree.root, name, args).unwrap() {
            XPathValue::String(s) => s,
            other => panic!("expected a string, got {other:?}"),
        }
    }

    #[test]
    fn test_string_of_context_node_and_arguments() {
        let tree = TestTree::new();
        assert_eq!(
            call_on(&tree, tree.root, "string", vec![]).unwrap(),
            XPathValue::String("Hello5 2 World".into())
        );
        assert_eq!(string_of(&tree, "string", vec![XPathValue::Number(-0.0)]), "0");
        assert_eq!(string_of(&tree, "string", vec![XPathValue::Boolean(true)]), "true");
        assert_eq!(string_of(&tree, "string", vec![NodeSet::new().into()]), "");
        let paras = NodeSet::from_nodes(&tree.doc, vec![tree.para2, tree.para1]);
        assert_eq!(string_of(&tree, "string", vec![paras.into()]), "Hello");
    }

    #[test]
    fn test_concat_and_searches() {
        let tree = TestTree::new();
        assert_eq!(
            string_of(&tree, "concat", vec!["Hello".into(), " ".into(), XPathValue::Number(42.0)]),
            "Hello 42"
        );
        assert_eq!(
            call_on(&tree, tree.root, "starts-with", vec!["abcdef".into(), "abc".into()]).unwrap(),
            XPathValue::Boolean(true)
        );
        assert_eq!(
            call_on(&tree, tree.root, "contains", vec!["abcdef".into(), "xyz".into()]).unwrap(),
            XPathValue::Boolean(false)
        );
        assert_eq!(string_of(&tree, "substring-before", vec!["1999/04/01".into(), "/".into()]), "1999");
        assert_eq!(string_of(&tree, "substring-after", vec!["1999/04/01".into(), "/".into()]), "04/01");
        assert_eq!(string_of(&tree, "substring-after", vec!["abc".into(), "z".into()]), "");
    }

    #[test]
    fn test_substring_rounding_and_edges() {
        let tree = TestTree::new();
        let sub = |args: Vec<XPathValue>| string_of(&tree, "substring", args);
        assert_eq!(sub(vec!["12345".into(), XPathValue::Number(2.0), XPathValue::Number(3.0)]), "234");
        assert_eq!(sub(vec!["12345".into(), XPathValue::Number(1.5), XPathValue::Number(2.6)]), "234");
        assert_eq!(sub(vec!["12345".into(), XPathValue::Number(0.0), XPathValue::Number(3.0)]), "12");
        assert_eq!(sub(vec!["12345".into(), XPathValue::Number(2.0)]), "2345");
        assert_eq!(sub(vec!["12345".into(), XPathValue::Number(f64::NAN), XPathValue::Number(3.0)]), "");
        assert_eq!(
            sub(vec![
                "12345".into(),
                XPathValue::Number(f64::NEG_INFINITY),
                XPathValue::Number(f64::INFINITY)
            ]),
            ""
        );
    }

    #[test]
    fn test_length_normalize_translate() {
        let tree = TestTree::new();
        assert_eq!(
            call_on(&tree, tree.text1, "string-length", vec![]).unwrap(),
            XPathValue::Number(5.0)
        );
        assert_eq!(
            call_on(&tree, tree.root, "string-length", vec!["héllo".into()]).unwrap(),
            XPathValue::Number(5.0)
        );
        assert_eq!(string_of(&tree, "normalize-space", vec!["  a \t\n b   c ".into()]), "a b c");
        assert_eq!(call_on(&tree, tree.item, "normalize-space", vec![]).unwrap(), XPathValue::String("2".into()));
        assert_eq!(string_of(&tree, "translate", vec!["bar".into(), "abc".into(), "ABC".into()]), "BAr");
        assert_eq!(string_of(&tree, "translate", vec!["--aaa--".into(), "abc-".into(), "ABC".into()]), "AAA");
    }
}
