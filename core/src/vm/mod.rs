//! The execution engine.
//!
//! A [`VirtualMachine`] is assembled from [`Extension`]s. Running a program
//! pushes a root [`Frame`] for `main` and then repeats one cycle until the
//! call stack is empty: fetch the top frame's current instruction, advance
//! its pointer, dispatch to the handler registered for the opcode.

mod context;
mod extension;
mod frame;
mod options;
mod runtime;
mod stack;
mod value;


pub use context::ProgramContext;
pub use extension::{Extension, FuncHook, Functionality, ProgramHook};
pub use frame::Frame;
pub use options::ExecutionOptions;
pub use runtime::{Execution, VirtualMachine, VirtualMachineBuilder};
pub use stack::Stack;
pub use value::{Array, Coroutine, FromValue, Object, Value};
