//! Objects: `obj-create`, `obj-get`, `obj-set`, `obj-invoke`.
//!
//! Methods are ordinary functions named `<type>$<method>`. The receiver is
//! the first input and, like every other input, becomes an argument.

use ecow::eco_format;

use crate::vm::{Extension, Object, Value};

pub const NAMESPACE: &str = "obj";

/// Separates the type name from the method name in a callee.
pub const METHOD_SEPARATOR: char = '$';

pub fn extension() -> Extension {
    Extension::new(NAMESPACE)
        .handler("create", |ctx, instr| {
            let object = Object::new(instr.descriptor()?.clone());
            ctx.write(instr, Value::Object(object))
        })
        .handler("get", |ctx, instr| {
            let object = ctx.read_as::<Object>(instr, 0)?;
            let value = object.get(instr.name()?)?;
            ctx.write(instr, value)
        })
        .handler("set", |ctx, instr| {
            let object = ctx.read_as::<Object>(instr, 0)?;
            let value = ctx.read(instr, 1)?;
            object.set(instr.name()?, value)
        })
        .handler("invoke", |ctx, instr| {
            let receiver = ctx.read_as::<Object>(instr, 0)?;
            let callee = eco_format!(
                "{}{}{}",
                receiver.descriptor().name(),
                METHOD_SEPARATOR,
                instr.name()?
            );
            let args = ctx.read_all(instr)?;
            ctx.call(&callee, args)
        })
}
