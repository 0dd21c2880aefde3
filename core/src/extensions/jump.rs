//! Labels and jumps inside one function.
//!
//! `jump-label` does nothing at run time. Before execution a function hook
//! records where each label sits; `jump-to` and `jump-if` move the pointer
//! onto the label itself, so the next cycle runs the no-op and continues
//! right after it.

use crate::errors::ErrorKind;
use crate::model::{Func, Instruction, LabelTable, MetaValue};
use crate::vm::{Extension, ProgramContext};

pub const NAMESPACE: &str = "jump";

/// Full opcode of the label instruction.
pub const LABEL: &str = "jump-label";

/// Meta key the label table is stored under.
pub const LABELS_KEY: &str = "labels";

fn index_labels(func: &mut Func) -> Result<(), ErrorKind> {
    let mut labels = LabelTable::new();
    for (index, instruction) in func.instructions().iter().enumerate() {
        if instruction.opcode() != LABEL {
            continue;
        }
        let name = instruction.name()?;
        if labels.insert(name.clone(), index).is_some() {
            return Err(ErrorKind::DuplicateLabel {
                function: func.name().clone(),
                label: name.clone(),
            });
        }
    }
    func.meta_mut().add(LABELS_KEY, MetaValue::Labels(labels))
}

fn jump(context: &mut ProgramContext<'_>, instruction: &Instruction) -> Result<(), ErrorKind> {
    let label = instruction.name()?;
    let frame = context.frame()?;
    let func = context.program().function(frame.func())?;
    let target = func
        .meta()
        .labels(LABELS_KEY)
        .and_then(|labels| labels.get(label).copied())
        .ok_or_else(|| ErrorKind::UnknownLabel {
            function: func.name().clone(),
            label: label.clone(),
        })?;
    context.frame_mut()?.set_ip(target);
    Ok(())
}

pub fn extension() -> Extension {
    Extension::new(NAMESPACE)
        .func_hook(index_labels)
        .handler("to", jump)
        .handler("if", |ctx, instr| {
            if ctx.read_as::<bool>(instr, 0)? {
                jump(ctx, instr)?;
            }
            Ok(())
        })
        .handler("label", |_, _| Ok(()))
}
