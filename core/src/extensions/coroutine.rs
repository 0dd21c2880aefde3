//! Coroutines: `co-create`, `co-invoke`, `co-yield`, `co-crash`.
//!
//! A coroutine handle owns a suspended frame. Invoking moves the frame onto
//! the call stack and remembers the handle as the frame's home; yielding
//! pops it, parks it back into its home and delivers the yielded value to
//! the invoker the same way `fn-return-value` does. A frame that returns
//! normally is gone for good, leaving its handle empty.

use tracing::trace;

use crate::errors::ErrorKind;
use crate::vm::{Coroutine, Extension, Frame, Value};

pub const NAMESPACE: &str = "co";

pub fn extension() -> Extension {
    Extension::new(NAMESPACE)
        .handler("create", |ctx, instr| {
            let name = instr.name()?;
            let program = ctx.program();
            let frame = Frame::new(program, program.find(name)?, Vec::new())?;
            ctx.write(instr, Value::Coroutine(Coroutine::new(name.clone(), frame)))
        })
        .handler("invoke", |ctx, instr| {
            let handle = ctx.read_as::<Coroutine>(instr, 0)?;
            let mut frame = handle.resume()?;
            trace!(coroutine = %handle.name(), ip = frame.ip(), "resuming");
            frame.set_home(handle);
            ctx.push(frame)
        })
        .handler("yield", |ctx, instr| {
            let value = ctx.read(instr, 0)?;
            let mut frame = ctx.pop()?;
            match frame.take_home() {
                Some(home) => home.suspend(frame),
                None => {
                    trace!(function = %frame.function_name(), "yield outside a coroutine");
                }
            }
            ctx.deliver(instr.opcode(), value)
        })
        .handler("crash", |ctx, _| {
            Err(ErrorKind::Crash {
                function: ctx.frame()?.function_name().clone(),
            })
        })
}
