//! A small fixed document shared by the unit tests of this crate.
//!
//! ```text
//! #document
//! └── doc
//!     ├── para  @id="p1" @xml:lang="en"
//!     │   └── "Hello"
//!     ├── <!-- note -->
//!     ├── div   @class="box"
//!     │   ├── ex:item (urn:example) @qty="3"
//!     │   │   └── "5"
//!     │   └── item
//!     │       └── " 2 "
//!     ├── <?render fast?>
//!     └── para
//!         └── "World"
//! ```

use crate::context::EvaluationContext;
use crate::functions::FunctionLibrary;
use sylva_tree::{Branch, Document, NodeId, QName};

pub(crate) struct TestTree {
    pub doc: Document,
    pub root: NodeId,
    pub para1: NodeId,
    pub text1: NodeId,
    pub para1_id: NodeId,
    pub para1_lang: NodeId,
    pub comment: NodeId,
    pub div: NodeId,
    pub div_class: NodeId,
    pub ex_item: NodeId,
    pub ex_item_qty: NodeId,
    pub item: NodeId,
    pub pi: NodeId,
    pub para2: NodeId,
    pub text2: NodeId,
}

impl TestTree {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut doc = Document::new();
        let document_node = doc.root();
        let root = doc.create_element("doc");
        doc.branch_mut(document_node).unwrap().add(root).unwrap();

        let para1 = doc
            .branch_mut(root)
            .unwrap()
            .add_element_with_attributes("para", [("id", "p1"), ("xml:lang", "en")])
            .unwrap();
        let text1 = doc.branch_mut(para1).unwrap().add_text("Hello").unwrap();
        let comment = doc.branch_mut(root).unwrap().add_comment(" note ");
        let div = doc
            .branch_mut(root)
            .unwrap()
            .add_element_with_attributes("div", [("class", "box")])
            .unwrap();
        let ex_item = doc.create_element_with_attributes(
            QName::with_namespace(Some("ex"), "item", "urn:example"),
            [("qty", "3")],
        );
        doc.branch_mut(div).unwrap().add(ex_item).unwrap();
        doc.branch_mut(ex_item).unwrap().add_text("5").unwrap();
        let item = doc.branch_mut(div).unwrap().add_element("item").unwrap();
        doc.branch_mut(item).unwrap().add_text(" 2 ").unwrap();
        let pi = doc
            .branch_mut(root)
            .unwrap()
            .add_processing_instruction("render", "fast");
        let para2 = doc.branch_mut(root).unwrap().add_element("para").unwrap();
        let text2 = doc.branch_mut(para2).unwrap().add_text("World").unwrap();

        let attrs = doc.attributes(para1);
        let (para1_id, para1_lang) = (attrs[0], attrs[1]);
        let div_class = doc.attributes(div)[0];
        let ex_item_qty = doc.attributes(ex_item)[0];
        assert_eq!(doc.branch(root).unwrap().node_count(), 5);

        Self {
            doc,
            root,
            para1,
            text1,
            para1_id,
            para1_lang,
            comment,
            div,
            div_class,
            ex_item,
            ex_item_qty,
            item,
            pi,
            para2,
            text2,
        }
    }

    /// A context on `node` using `functions`, with no bindings.
    pub fn context<'a>(&'a self, functions: &'a FunctionLibrary, node: NodeId) -> EvaluationContext<'a> {
        EvaluationContext::new(&self.doc, node, functions)
    }
}
