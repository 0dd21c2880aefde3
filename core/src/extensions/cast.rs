//! Explicit conversions between numeric representations.
//!
//! All casts live in the `cast` namespace and are named
//! `cast-<source>-to-<target>`. Narrowing uses Rust `as` semantics:
//! long to int truncates, double to an integer rounds toward zero and
//! saturates (NaN becomes 0).

use crate::vm::{Extension, FromValue, Value};

pub const NAMESPACE: &str = "cast";

/// Adds the `source-to-target` opcode to `extension`.
fn conversion<S: FromValue + 'static>(
    extension: Extension,
    source: &str,
    target: &str,
    convert: impl Fn(S) -> Value + 'static,
) -> Extension {
    extension.handler(ecow::eco_format!("{}-to-{}", source, target), move |ctx, instr| {
        let value = ctx.read_as::<S>(instr, 0)?;
        ctx.write(instr, convert(value))
    })
}

pub fn from_int() -> Extension {
    let ext = Extension::new(NAMESPACE);
    let ext = conversion::<i32>(ext, "int", "long", |v| Value::Long(v.into()));
    conversion::<i32>(ext, "int", "double", |v| Value::Double(v.into()))
}

pub fn from_long() -> Extension {
    let ext = Extension::new(NAMESPACE);
    let ext = conversion::<i64>(ext, "long", "int", |v| Value::Int(v as i32));
    conversion::<i64>(ext, "long", "double", |v| Value::Double(v as f64))
}

pub fn from_double() -> Extension {
    let ext = Extension::new(NAMESPACE);
    let ext = conversion::<f64>(ext, "double", "int", |v| Value::Int(v as i32));
    conversion::<f64>(ext, "double", "long", |v| Value::Long(v as i64))
}
