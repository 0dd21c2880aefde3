use crate::vm::Extension;

pub const NAMESPACE: &str = "copy";

/// `copy-val`: moves a value between registers. Arrays, objects and
/// coroutines are shared, not duplicated.
pub fn extension() -> Extension {
    Extension::new(NAMESPACE).handler("val", |ctx, instr| {
        let value = ctx.read(instr, 0)?;
        ctx.write(instr, value)
    })
}
