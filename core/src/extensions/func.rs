//! Function calls: `fn-call`, `fn-return`, `fn-return-value`.
//!
//! A call pushes a frame for the callee. The caller's pointer already sits
//! right after the call, so when the callee returns a value it is written
//! into the output register of the instruction just before the caller's
//! pointer; see [`ProgramContext::deliver`](crate::vm::ProgramContext::deliver).
//!
//! `fn-ret` and `fn-ret-val` are the short spellings of the two returns.

use crate::errors::ErrorKind;
use crate::model::Instruction;
use crate::vm::{Extension, ProgramContext};

pub const NAMESPACE: &str = "fn";

fn call(ctx: &mut ProgramContext<'_>, instr: &Instruction) -> Result<(), ErrorKind> {
    let args = ctx.read_all(instr)?;
    ctx.call(instr.name()?, args)
}

fn ret(ctx: &mut ProgramContext<'_>, _: &Instruction) -> Result<(), ErrorKind> {
    ctx.pop().map(drop)
}

fn ret_val(ctx: &mut ProgramContext<'_>, instr: &Instruction) -> Result<(), ErrorKind> {
    let value = ctx.read(instr, 0)?;
    ctx.pop()?;
    ctx.deliver(instr.opcode(), value)
}

pub fn extension() -> Extension {
    Extension::new(NAMESPACE)
        .handler("call", call)
        .handler("return", ret)
        .handler("return-value", ret_val)
        .handler("ret", ret)
        .handler("ret-val", ret_val)
}
