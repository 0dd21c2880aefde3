//! Configuration options for the virtual machine.

/// Configuration options for program execution.
///
/// # Example
///
/// ```
/// use kiln_core::vm::ExecutionOptions;
///
/// let options = ExecutionOptions { max_depth: 500 };
/// ```
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Maximum number of frames on the call stack (recursion protection).
    /// Suspended coroutines do not count until they are invoked.
    ///
    /// Default: 10000
    pub max_depth: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self { max_depth: 10_000 }
    }
}
