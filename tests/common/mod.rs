#![allow(dead_code)]

use sylva::{Branch, Document, NodeId};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `<catalog><item>x</item><!--c--><item>y</item></catalog>`
pub struct Catalog {
    pub doc: Document,
    pub root: NodeId,
    pub first: NodeId,
    pub comment: NodeId,
    pub second: NodeId,
}

pub fn build_catalog() -> Result<Catalog, sylva::Error> {
    init_logger();
    let mut doc = Document::new();
    let root = doc.branch_mut(doc.root())?.add_element("catalog")?;

    let mut catalog = doc.branch_mut(root)?;
    let first = catalog.add_element("item")?;
    let comment = catalog.add_comment("c");
    let second = catalog.add_element("item")?;
    doc.branch_mut(first)?.add_text("x")?;
    doc.branch_mut(second)?.add_text("y")?;

    debug_assert_eq!(doc.branch(root)?.node_count(), 3);
    Ok(Catalog {
        doc,
        root,
        first,
        comment,
        second,
    })
}
