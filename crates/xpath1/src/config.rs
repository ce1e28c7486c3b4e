use serde::{Deserialize, Serialize};

/// Configuration for an evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// If true, a reference to an unbound variable is an error. If false, it
    /// evaluates to the empty string and a warning is logged.
    ///
    /// Defaults to `true`.
    pub strict: bool,
    /// The deepest expression nesting the evaluator will descend into before
    /// giving up. Predicates and function arguments each add a level.
    ///
    /// Defaults to `256`.
    pub max_depth: usize,
}

impl EvaluationConfig {
    pub const DEFAULT: EvaluationConfig = EvaluationConfig {
        strict: true,
        max_depth: 256,
    };
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
