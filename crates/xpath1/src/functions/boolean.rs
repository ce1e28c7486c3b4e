use super::exact;
use crate::context::EvaluationContext;
use crate::error::XPathError;
use crate::value::XPathValue;

pub(super) fn boolean(_ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let [arg] = exact::<1>("boolean", args)?;
    Ok(XPathValue::Boolean(arg.to_bool()))
}

pub(super) fn not(_ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let [arg] = exact::<1>("not", args)?;
    Ok(XPathValue::Boolean(!arg.to_bool()))
}

pub(super) fn true_(_ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    exact::<0>("true", args)?;
    Ok(XPathValue::Boolean(true))
}

pub(super) fn false_(_ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    exact::<0>("false", args)?;
    Ok(XPathValue::Boolean(false))
}

/// True if the nearest `xml:lang` in scope of the context node equals the argument
/// or is a sublanguage of it, ignoring case.
pub(super) fn lang(ctx: &EvaluationContext<'_>, args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let doc = ctx.document();
    let [arg] = exact::<1>("lang", args)?;
    let wanted = arg.to_string_value(doc).to_ascii_lowercase();
    let node = ctx.current_node();

    let in_scope = std::iter::once(node)
        .chain(doc.ancestors(node))
        .find_map(|n| doc.attribute(n, "xml:lang"));
    let matches = in_scope.is_some_and(|lang| {
        let lang = lang.to_ascii_lowercase();
        lang == wanted
            || lang
                .strip_prefix(wanted.as_str())
                .is_some_and(|rest| rest.starts_with('-'))
    });
    Ok(XPathValue::Boolean(matches))
}

#[cfg(test)]
mod tests {
    use crate::functions::FunctionLibrary;
    use crate::test_support::TestTree;
    use crate::value::{NodeSet, XPathValue};
    use sylva_tree::NodeId;

    fn call(tree: &TestTree, node: NodeId, name: &str, args: Vec<XPathValue>) -> XPathValue {
        let library = FunctionLibrary::core();
        let ctx = tree.context(&library, node);
        library.call(&name.into(), &ctx, args).unwrap()
    }

    #[test]
    fn test_boolean_not_true_false() {
        let tree = TestTree::new();
        assert_eq!(call(&tree, tree.root, "boolean", vec![NodeSet::new().into()]), XPathValue::Boolean(false));
        assert_eq!(call(&tree, tree.root, "boolean", vec!["0".into()]), XPathValue::Boolean(true));
        assert_eq!(call(&tree, tree.root, "not", vec![XPathValue::Number(0.0)]), XPathValue::Boolean(true));
        assert_eq!(call(&tree, tree.root, "true", vec![]), XPathValue::Boolean(true));
        assert_eq!(call(&tree, tree.root, "false", vec![]), XPathValue::Boolean(false));
    }

    #[test]
    fn test_lang_checks_nearest_declaration() {
        let tree = TestTree::new();
        assert_eq!(call(&tree, tree.text1, "lang", vec!["en".into()]), XPathValue::Boolean(true));
        assert_eq!(call(&tree, tree.para1, "lang", vec!["EN".into()]), XPathValue::Boolean(true));
        assert_eq!(call(&tree, tree.para1_id, "lang", vec!["en".into()]), XPathValue::Boolean(true));
        assert_eq!(call(&tree, tree.para1, "lang", vec!["e".into()]), XPathValue::Boolean(false));
        assert_eq!(call(&tree, tree.para2, "lang", vec!["en".into()]), XPathValue::Boolean(false));
    }

    #[test]
    fn test_lang_accepts_sublanguage() {
        let mut tree = TestTree::new();
        let span = tree
            .doc
            .branch_mut(tree.para2)
            .unwrap()
            .add_element_with_attributes("span", [("xml:lang", "en-GB")])
            .unwrap();
        assert_eq!(call(&tree, span, "lang", vec!["en".into()]), XPathValue::Boolean(true));
        assert_eq!(call(&tree, span, "lang", vec!["en-gb".into()]), XPathValue::Boolean(true));
        assert_eq!(call(&tree, span, "lang", vec!["fr".into()]), XPathValue::Boolean(false));
    }
}
