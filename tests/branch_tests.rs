mod common;

use common::{TestResult, build_catalog};
use sylva::{Branch, Document, NodeType, TreeError};

#[test]
fn test_content_matches_positional_access() -> TestResult {
    let catalog = build_catalog()?;
    let root = catalog.doc.branch(catalog.root)?;

    assert_eq!(root.content().len(), root.node_count());
    for (i, &node) in root.content().iter().enumerate() {
        assert_eq!(root.node(i)?, node);
        assert_eq!(root.index_of(node), Some(i));
    }
    assert_eq!(
        root.node(3),
        Err(TreeError::IndexOutOfRange { index: 3, len: 3 })
    );
    assert_eq!(root.index_of(catalog.doc.root()), None);
    Ok(())
}

#[test]
fn test_add_appends_and_links_parent() -> TestResult {
    let mut catalog = build_catalog()?;
    let extra = catalog.doc.create_element("item");
    let mut root = catalog.doc.branch_mut(catalog.root)?;
    root.add(extra)?;

    assert_eq!(root.index_of(extra), Some(root.node_count() - 1));
    assert_eq!(catalog.doc.parent(extra), Some(catalog.root));
    Ok(())
}

#[test]
fn test_add_of_parented_node_changes_nothing() -> TestResult {
    let mut catalog = build_catalog()?;
    let mut other = Document::new();
    let other_root = other.branch_mut(other.root())?.add_element("other")?;

    let before = catalog.doc.branch(catalog.root)?.content().to_vec();
    let err = catalog.doc.branch_mut(catalog.root)?.add(catalog.first).unwrap_err();
    assert_eq!(err, TreeError::NodeAlreadyParented(catalog.first));
    assert_eq!(catalog.doc.branch(catalog.root)?.content(), before.as_slice());

    let err = catalog.doc.branch_mut(catalog.first)?.add(catalog.second).unwrap_err();
    assert_eq!(err, TreeError::NodeAlreadyParented(catalog.second));
    assert_eq!(catalog.doc.branch(catalog.first)?.node_count(), 1);
    assert_eq!(other.branch(other_root)?.node_count(), 0);
    Ok(())
}

#[test]
fn test_remove_is_true_exactly_once() -> TestResult {
    let mut catalog = build_catalog()?;
    let mut root = catalog.doc.branch_mut(catalog.root)?;
    assert!(root.remove(catalog.comment));
    assert!(!root.remove(catalog.comment));
    assert_eq!(catalog.doc.parent(catalog.comment), None);
    assert_eq!(catalog.doc.node_type(catalog.comment), NodeType::Comment);

    // Detached nodes can be attached again.
    catalog.doc.branch_mut(catalog.root)?.add(catalog.comment)?;
    assert_eq!(catalog.doc.parent(catalog.comment), Some(catalog.root));
    Ok(())
}

#[test]
fn test_processing_instruction_removal_by_target() -> TestResult {
    let mut catalog = build_catalog()?;
    let mut root = catalog.doc.branch_mut(catalog.root)?;
    let pi = root.add_processing_instruction_with_values("layout", [("columns", "2"), ("gap", "4pt")]);
    assert_eq!(root.processing_instruction("layout"), Some(pi));

    assert!(root.remove_processing_instruction("layout"));
    assert!(!root.remove_processing_instruction("layout"));
    assert_eq!(root.processing_instructions().count(), 0);

    let data = catalog.doc.pi_data(pi).map(|d| d.values());
    assert_eq!(
        data,
        Some(vec![
            ("columns".to_string(), "2".to_string()),
            ("gap".to_string(), "4pt".to_string())
        ])
    );
    Ok(())
}

#[test]
fn test_set_content_replaces_children() -> TestResult {
    let mut catalog = build_catalog()?;
    let replacement = catalog.doc.create_element("entry");
    catalog
        .doc
        .branch_mut(catalog.root)?
        .set_content(vec![catalog.second, replacement])?;

    assert_eq!(
        catalog.doc.branch(catalog.root)?.content(),
        &[catalog.second, replacement]
    );
    assert_eq!(catalog.doc.parent(catalog.first), None);
    assert_eq!(catalog.doc.parent(catalog.comment), None);
    assert_eq!(catalog.doc.parent(replacement), Some(catalog.root));
    assert_eq!(catalog.doc.string_value(catalog.root), "y");
    Ok(())
}
