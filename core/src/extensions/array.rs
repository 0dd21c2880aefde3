//! Fixed-length arrays: `arr-create`, `arr-get`, `arr-set`, `arr-length`.

use crate::errors::ErrorKind;
use crate::vm::{Array, Extension, Value};

pub const NAMESPACE: &str = "arr";

pub fn extension() -> Extension {
    Extension::new(NAMESPACE)
        .handler("create", |ctx, instr| {
            let length = ctx.read_as::<i32>(instr, 0)?;
            let length = usize::try_from(length).map_err(|_| ErrorKind::IndexOutOfBounds {
                index: length.into(),
                len: 0,
            })?;
            ctx.write(instr, Value::Array(Array::new(length)))
        })
        .handler("get", |ctx, instr| {
            let array = ctx.read_as::<Array>(instr, 0)?;
            let index = ctx.read_as::<i32>(instr, 1)?;
            ctx.write(instr, array.get(index)?)
        })
        .handler("set", |ctx, instr| {
            let array = ctx.read_as::<Array>(instr, 0)?;
            let index = ctx.read_as::<i32>(instr, 1)?;
            let value = ctx.read(instr, 2)?;
            array.set(index, value)
        })
        .handler("length", |ctx, instr| {
            let array = ctx.read_as::<Array>(instr, 0)?;
            // Lengths come from an `i32`, so they always fit back into one.
            let length = i32::try_from(array.len()).unwrap_or(i32::MAX);
            ctx.write(instr, length)
        })
}
