//! Bytecode data: what the VM executes.
//!
//! A [`Program`] is a list of [`Func`]s, each a list of [`Instruction`]s.
//! Both carry a write-once [`Meta`] store that preprocessing hooks fill in
//! before execution starts.

mod descriptor;
mod func;
mod instruction;
mod meta;
mod program;

pub use descriptor::Descriptor;
pub use func::Func;
pub use instruction::{Instruction, Payload, Register};
pub use meta::{LabelTable, Meta, MetaValue};
pub use program::{FuncId, Program};
