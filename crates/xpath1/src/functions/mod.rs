//! Defines the registry for XPath 1.0 functions and the core function library.
//!
//! A function is anything implementing [`XPathFunction`]. The library owns them
//! behind `Arc`s keyed by expanded name, checks the declared [`Arity`] before
//! every call and reports unknown names and bad argument counts as errors.

mod boolean;
mod node_set;
mod number;
mod string;

use crate::context::EvaluationContext;
use crate::error::XPathError;
use crate::value::XPathValue;
use log::{debug, trace};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// How many arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    /// Inclusive on both ends.
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::Range(min, max) => (min..=max).contains(&count),
            Arity::AtLeast(min) => count >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::Range(min, max) => write!(f, "{min} to {max}"),
            Arity::AtLeast(min) => write!(f, "at least {min}"),
        }
    }
}

/// The expanded name of a function: an optional namespace URI plus a local name.
/// Core functions have no namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionName {
    pub namespace_uri: Option<String>,
    pub local_name: String,
}

impl FunctionName {
    pub fn core(local_name: impl Into<String>) -> Self {
        Self {
            namespace_uri: None,
            local_name: local_name.into(),
        }
    }

    pub fn in_namespace(namespace_uri: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace_uri: Some(namespace_uri.into()),
            local_name: local_name.into(),
        }
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace_uri {
            Some(uri) => write!(f, "{{{uri}}}{}", self.local_name),
            None => f.write_str(&self.local_name),
        }
    }
}

impl From<&str> for FunctionName {
    fn from(local_name: &str) -> Self {
        FunctionName::core(local_name)
    }
}

/// A callable XPath function.
///
/// Arguments arrive already evaluated, in call order. The library has checked
/// their count against [`arity`](XPathFunction::arity) before `call` runs.
pub trait XPathFunction: Send + Sync {
    fn arity(&self) -> Arity;

    fn call(
        &self,
        ctx: &EvaluationContext<'_>,
        args: Vec<XPathValue>,
    ) -> Result<XPathValue, XPathError>;
}

/// Adapts a plain function or closure to [`XPathFunction`].
struct FnFunction<F> {
    arity: Arity,
    func: F,
}

impl<F> XPathFunction for FnFunction<F>
where
    F: Fn(&EvaluationContext<'_>, Vec<XPathValue>) -> Result<XPathValue, XPathError>
        + Send
        + Sync,
{
    fn arity(&self) -> Arity {
        self.arity
    }

    fn call(
        &self,
        ctx: &EvaluationContext<'_>,
        args: Vec<XPathValue>,
    ) -> Result<XPathValue, XPathError> {
        (self.func)(ctx, args)
    }
}

/// Signature shared by the built-in functions.
type NativeFunction = fn(&EvaluationContext<'_>, Vec<XPathValue>) -> Result<XPathValue, XPathError>;

/// A registry of functions keyed by expanded name.
#[derive(Clone)]
pub struct FunctionLibrary {
    functions: HashMap<FunctionName, Arc<dyn XPathFunction>>,
}

impl FunctionLibrary {
    /// An empty library.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// The XPath 1.0 core function library.
    pub fn core() -> Self {
        let mut library = Self::new();
        let builtins: [(&str, Arity, NativeFunction); 27] = [
            // Node-set
            ("last", Arity::Exact(0), node_set::last),
            ("position", Arity::Exact(0), node_set::position),
            ("count", Arity::Exact(1), node_set::count),
            ("id", Arity::Exact(1), node_set::id),
            ("local-name", Arity::Range(0, 1), node_set::local_name),
            ("namespace-uri", Arity::Range(0, 1), node_set::namespace_uri),
            ("name", Arity::Range(0, 1), node_set::name),
            // String
            ("string", Arity::Range(0, 1), string::string),
            ("concat", Arity::AtLeast(2), string::concat),
            ("starts-with", Arity::Exact(2), string::starts_with),
            ("contains", Arity::Exact(2), string::contains),
            ("substring-before", Arity::Exact(2), string::substring_before),
            ("substring-after", Arity::Exact(2), string::substring_after),
            ("substring", Arity::Range(2, 3), string::substring),
            ("string-length", Arity::Range(0, 1), string::string_length),
            ("normalize-space", Arity::Range(0, 1), string::normalize_space),
            ("translate", Arity::Exact(3), string::translate),
            // Boolean
            ("boolean", Arity::Exact(1), boolean::boolean),
            ("not", Arity::Exact(1), boolean::not),
            ("true", Arity::Exact(0), boolean::true_),
            ("false", Arity::Exact(0), boolean::false_),
            ("lang", Arity::Exact(1), boolean::lang),
            // Number
            ("number", Arity::Range(0, 1), number::number),
            ("sum", Arity::Exact(1), number::sum),
            ("floor", Arity::Exact(1), number::floor),
            ("ceiling", Arity::Exact(1), number::ceiling),
            ("round", Arity::Exact(1), number::round),
        ];
        for (name, arity, func) in builtins {
            library.register_fn(FunctionName::core(name), arity, func);
        }
        library
    }

    /// Registers a function, replacing any previous one with the same name.
    pub fn register(&mut self, name: FunctionName, function: impl XPathFunction + 'static) {
        debug!("Registering XPath function {name} ({} args)", function.arity());
        self.functions.insert(name, Arc::new(function));
    }

    /// Registers a plain function or closure with the given arity.
    pub fn register_fn<F>(&mut self, name: FunctionName, arity: Arity, func: F)
    where
        F: Fn(&EvaluationContext<'_>, Vec<XPathValue>) -> Result<XPathValue, XPathError>
            + Send
            + Sync
            + 'static,
    {
        self.register(name, FnFunction { arity, func });
    }

    pub fn get(&self, name: &FunctionName) -> Option<&dyn XPathFunction> {
        self.functions.get(name).map(|f| f.as_ref())
    }

    pub fn contains(&self, name: &FunctionName) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &FunctionName> {
        self.functions.keys()
    }

    /// Dispatches a call: unknown names fail with `UnknownFunction`, a wrong number of
    /// arguments with `ArgumentCountMismatch`.
    pub fn call(
        &self,
        name: &FunctionName,
        ctx: &EvaluationContext<'_>,
        args: Vec<XPathValue>,
    ) -> Result<XPathValue, XPathError> {
        let function = self
            .get(name)
            .ok_or_else(|| XPathError::UnknownFunction(name.to_string()))?;
        let expected = function.arity();
        if !expected.accepts(args.len()) {
            return Err(XPathError::ArgumentCountMismatch {
                function: name.to_string(),
                expected,
                found: args.len(),
            });
        }
        trace!("Calling {name} with {} argument(s)", args.len());
        function.call(ctx, args)
    }
}

impl Default for FunctionLibrary {
    fn default() -> Self {
        Self::core()
    }
}

impl fmt::Debug for FunctionLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.functions.keys().map(ToString::to_string).collect();
        names.sort();
        f.debug_struct("FunctionLibrary")
            .field("functions", &names)
            .finish()
    }
}

// --- Argument helpers shared by the built-ins ---

fn mismatch(function: &str, expected: Arity, found: usize) -> XPathError {
    XPathError::ArgumentCountMismatch {
        function: function.to_string(),
        expected,
        found,
    }
}

/// Unpacks exactly `N` arguments.
fn exact<const N: usize>(function: &str, args: Vec<XPathValue>) -> Result<[XPathValue; N], XPathError> {
    let found = args.len();
    <[XPathValue; N]>::try_from(args).map_err(|_| mismatch(function, Arity::Exact(N), found))
}

/// Unpacks zero or one argument.
fn optional(function: &str, args: Vec<XPathValue>) -> Result<Option<XPathValue>, XPathError> {
    let found = args.len();
    let mut args = args.into_iter();
    match (args.next(), args.next()) {
        (arg, None) => Ok(arg),
        _ => Err(mismatch(function, Arity::Range(0, 1), found)),
    }
}

/// The string argument of a function that defaults to the string-value of the
/// context node.
fn string_or_context(
    function: &str,
    ctx: &EvaluationContext<'_>,
    args: Vec<XPathValue>,
) -> Result<String, XPathError> {
    let doc = ctx.document();
    Ok(match optional(function, args)? {
        Some(arg) => arg.to_string_value(doc),
        None => doc.string_value(ctx.current_node()),
    })
}
