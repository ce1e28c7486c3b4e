//! Defines the Abstract Syntax Tree (AST) for XPath 1.0 expressions.
//!
//! Expressions arrive already parsed. The constructors below exist so that callers
//! and tests can assemble trees by hand, e.g. `child::item[2]`:
//!
//! ```
//! use sylva_xpath1::{Expression, LocationPath, Step};
//!
//! let expr = Expression::path(LocationPath::relative(vec![
//!     Step::child("item").with_predicate(Expression::number(2.0)),
//! ]));
//! assert!(expr.is_location_path());
//! ```

/// The top-level expression that can be evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(String),
    Number(f64),
    LocationPath(LocationPath),
    /// A variable reference, without the leading `$`.
    Variable(String),
    /// A function call. The name is lexical (`concat`, `ext:upper`); prefixes are
    /// resolved against the context's namespace bindings at evaluation time.
    FunctionCall {
        name: String,
        args: Vec<Expression>,
    },
    /// A primary expression filtered by predicates, e.g. `$items[1]`.
    Filter {
        primary: Box<Expression>,
        predicates: Vec<Expression>,
    },
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
    UnaryOp {
        op: UnaryOperator,
        expr: Box<Expression>,
    },
}

impl Expression {
    pub fn literal(value: impl Into<String>) -> Self {
        Expression::Literal(value.into())
    }

    pub fn number(value: f64) -> Self {
        Expression::Number(value)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    pub fn path(path: LocationPath) -> Self {
        Expression::LocationPath(path)
    }

    pub fn call(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::FunctionCall {
            name: name.into(),
            args,
        }
    }

    pub fn filter(primary: Expression, predicates: Vec<Expression>) -> Self {
        Expression::Filter {
            primary: Box::new(primary),
            predicates,
        }
    }

    pub fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn negate(expr: Expression) -> Self {
        Expression::UnaryOp {
            op: UnaryOperator::Minus,
            expr: Box::new(expr),
        }
    }

    /// Checks if the expression is a `LocationPath` variant.
    pub fn is_location_path(&self) -> bool {
        matches!(self, Expression::LocationPath(_))
    }

    /// Checks if the expression is a `BinaryOp` variant.
    pub fn is_binary_op(&self) -> bool {
        matches!(self, Expression::BinaryOp { .. })
    }
}

/// A unary operator used in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Minus,
}

/// A binary operator used in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Logical
    Or,
    And,
    // Equality
    Equals,
    NotEquals,
    // Relational
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    // Additive
    Plus,
    Minus,
    // Multiplicative
    Multiply,
    Divide,
    Modulo,
    // Set
    Union,
}

/// Represents a full location path, like `/child::foo`, `descendant::bar[1]`, or `$var/item`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPath {
    /// An optional starting expression, for paths like `$var/foo` or `func()/foo`.
    /// If `None`, the path starts from the context node or root.
    pub start_point: Option<Box<Expression>>,
    /// True if the path starts from the root of the context node's tree (e.g., `/foo`).
    /// Meaningless if `start_point` is `Some`.
    pub is_absolute: bool,
    pub steps: Vec<Step>,
}

impl LocationPath {
    pub fn relative(steps: Vec<Step>) -> Self {
        Self {
            start_point: None,
            is_absolute: false,
            steps,
        }
    }

    pub fn absolute(steps: Vec<Step>) -> Self {
        Self {
            start_point: None,
            is_absolute: true,
            steps,
        }
    }

    /// A path whose steps start from the node-set produced by `start`.
    pub fn from_expression(start: Expression, steps: Vec<Step>) -> Self {
        Self {
            start_point: Some(Box::new(start)),
            is_absolute: false,
            steps,
        }
    }
}

/// Represents a single step in a location path, like `child::foo[position() > 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub node_test: NodeTest,
    pub predicates: Vec<Expression>,
}

impl Step {
    pub fn new(axis: Axis, node_test: NodeTest) -> Self {
        Self {
            axis,
            node_test,
            predicates: Vec::new(),
        }
    }

    /// `child::name`
    pub fn child(name: &str) -> Self {
        Self::new(Axis::Child, NodeTest::name(name))
    }

    /// `attribute::name`
    pub fn attribute(name: &str) -> Self {
        Self::new(Axis::Attribute, NodeTest::name(name))
    }

    pub fn with_predicate(mut self, predicate: Expression) -> Self {
        self.predicates.push(predicate);
        self
    }
}

/// The axis of movement from the context node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Attribute,
    Parent,
    Ancestor,
    AncestorOrSelf,
    SelfAxis,
    FollowingSibling,
    PrecedingSibling,
    Following,
    Preceding,
}

impl Axis {
    /// Reverse axes number their nodes from the context node backwards in
    /// document order when computing proximity positions.
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            Axis::Ancestor | Axis::AncestorOrSelf | Axis::Preceding | Axis::PrecedingSibling
        )
    }
}

/// A test to apply to nodes on a given axis to see if they should be included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// A qualified name test (e.g., `foo`, `xsl:if`).
    Name {
        prefix: Option<String>,
        local_part: String,
    },
    /// Any name in the namespace bound to a prefix (`xsl:*`).
    NamespaceWildcard(String),
    /// A wildcard test (`*`).
    Wildcard,
    /// A node type test (e.g., `text()`, `node()`).
    NodeType(NodeTypeTest),
}

impl NodeTest {
    /// Builds a name test from a lexical name, splitting an optional prefix.
    pub fn name(lexical: &str) -> Self {
        match lexical.split_once(':') {
            Some((prefix, "*")) => NodeTest::NamespaceWildcard(prefix.to_string()),
            Some((prefix, local)) => NodeTest::Name {
                prefix: Some(prefix.to_string()),
                local_part: local.to_string(),
            },
            None if lexical == "*" => NodeTest::Wildcard,
            None => NodeTest::Name {
                prefix: None,
                local_part: lexical.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTypeTest {
    Text,
    Node,
    Comment,
    /// `processing-instruction()` with an optional target literal.
    ProcessingInstruction(Option<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_test_from_lexical() {
        assert_eq!(NodeTest::name("*"), NodeTest::Wildcard);
        assert_eq!(
            NodeTest::name("fo:*"),
            NodeTest::NamespaceWildcard("fo".to_string())
        );
        assert_eq!(
            NodeTest::name("fo:block"),
            NodeTest::Name {
                prefix: Some("fo".to_string()),
                local_part: "block".to_string()
            }
        );
    }

    #[test]
    fn test_reverse_axes() {
        assert!(Axis::Ancestor.is_reverse());
        assert!(Axis::PrecedingSibling.is_reverse());
        assert!(!Axis::Child.is_reverse());
        assert!(!Axis::Following.is_reverse());
    }

    #[test]
    fn test_step_builder() {
        let step = Step::child("item").with_predicate(Expression::number(1.0));
        assert_eq!(step.axis, Axis::Child);
        assert_eq!(step.predicates.len(), 1);
        assert!(Expression::binary(
            Expression::number(1.0),
            BinaryOperator::Plus,
            Expression::number(2.0)
        )
        .is_binary_op());
    }
}
