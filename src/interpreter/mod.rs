mod tree;

pub use tree::TreeWalkInterpreter;

/// Knobs for a single interpreter instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Nested function calls allowed before evaluation fails instead of
    /// exhausting the host stack.
    pub max_call_depth: usize,
}

impl InterpreterConfig {
    pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: Self::DEFAULT_MAX_CALL_DEPTH,
        }
    }
}
