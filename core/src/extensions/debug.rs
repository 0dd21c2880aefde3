use crate::vm::Extension;

pub const NAMESPACE: &str = "debug";

/// `debug-print`: writes the input's text form and a newline to the run's
/// output sink.
pub fn extension() -> Extension {
    Extension::new(NAMESPACE).handler("print", |ctx, instr| {
        let value = ctx.read(instr, 0)?;
        writeln!(ctx.output(), "{}", value)?;
        Ok(())
    })
}
