//! Kiln core: an extensible register-based bytecode virtual machine.
//!
//! A [`Program`](model::Program) is a set of named functions, each a flat list
//! of [`Instruction`](model::Instruction)s. The [`VirtualMachine`](vm::VirtualMachine)
//! knows no opcodes of its own: every opcode is contributed by an
//! [`Extension`](vm::Extension), and [`extensions::standard`] bundles the
//! catalog that ships with the crate.
//!
//! ```ignore
//! use kiln_core::extensions;
//! use kiln_core::model::{Func, Instruction, Payload, Program};
//! use kiln_core::vm::VirtualMachine;
//!
//! let mut program = Program::new(vec![Func::new("main", vec![
//!     Instruction::new("long-val").output(0).payload(Payload::Long(42)),
//!     Instruction::new("debug-print").inputs([0]),
//!     Instruction::new("fn-return"),
//! ])])?;
//!
//! let vm = VirtualMachine::builder().extend(extensions::standard()).build()?;
//! vm.run(&mut program)?; // prints 42
//! ```

pub mod errors;
pub mod extensions;
pub mod model;
pub mod vm;

pub use errors::{Error, ErrorKind, Location};

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    use crate::errors::Error;
    use crate::extensions;
    use crate::model::{Func, Program};
    use crate::vm::VirtualMachine;

    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }

    /// Runs `functions` on the standard catalog and returns what
    /// `debug-print` wrote.
    pub fn run(functions: Vec<Func>) -> Result<String, Error> {
        init_test_logging();
        let mut program = Program::new(functions)?;
        let vm = VirtualMachine::builder()
            .extend(extensions::standard())
            .build()?;
        let mut output = Vec::new();
        vm.run_with_output(&mut program, &mut output)?;
        Ok(String::from_utf8(output).expect("debug output is UTF-8"))
    }

    /// Wraps a straight-line body into a `main` that returns at the end.
    pub fn main(mut body: Vec<crate::model::Instruction>) -> Func {
        body.push(crate::model::Instruction::new("fn-return"));
        Func::new("main", body)
    }
}
