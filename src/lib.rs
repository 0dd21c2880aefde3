//! Kiln - an extensible register-based bytecode virtual machine
//!
//! # Overview
//!
//! Kiln runs programs made of named functions, each a flat sequence of
//! instructions over a per-frame register file. The machine itself knows no
//! opcodes: every instruction is contributed by an extension, and hosts
//! decide which families to load.
//!
//! # Quick Start
//!
//! ```ignore
//! use kiln::{Func, Instruction, Payload, Program, VirtualMachine, extensions};
//!
//! let mut program = Program::new(vec![Func::new("main", vec![
//!     Instruction::new("double-val").output(0).payload(Payload::Double(1.5)),
//!     Instruction::new("double-add").inputs([0, 0]).output(1),
//!     Instruction::new("debug-print").inputs([1]),
//!     Instruction::new("fn-return"),
//! ])])?;
//!
//! let vm = VirtualMachine::builder()
//!     .extend(extensions::standard())
//!     .build()?;
//! vm.run(&mut program)?; // prints 3.0
//! ```
//!
//! # Extensions
//!
//! An [`Extension`] groups handlers under a namespace; a handler registered
//! as `neg` in namespace `int` answers to `int-neg`:
//!
//! ```ignore
//! let ext = Extension::new("int").handler("neg", |ctx, instr| {
//!     let v: i32 = ctx.read_as(instr, 0)?;
//!     ctx.write(instr, v.wrapping_neg())
//! });
//! ```
//!
//! The [`demos`] module bundles a few complete programs.

pub mod demos;

// Re-export public API from kiln_core
pub use kiln_core::errors::{Error, ErrorKind, Location};
pub use kiln_core::extensions;
pub use kiln_core::model::{
    self, Descriptor, Func, FuncId, Instruction, Meta, MetaValue, Payload, Program, Register,
};
pub use kiln_core::vm::{
    self, ExecutionOptions, Extension, Functionality, ProgramContext, Value, VirtualMachine,
};
