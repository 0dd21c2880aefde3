use ecow::EcoString;
use serde::{Deserialize, Serialize};

use crate::model::{Instruction, Meta};

/// A named function: an instruction sequence plus the register count every
/// frame of this function is sized with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "FuncRepr")]
pub struct Func {
    name: EcoString,
    instructions: Vec<Instruction>,
    #[serde(skip)]
    register_count: usize,
    #[serde(skip)]
    meta: Meta,
}

#[derive(Deserialize)]
struct FuncRepr {
    name: EcoString,
    instructions: Vec<Instruction>,
}

impl From<FuncRepr> for Func {
    fn from(repr: FuncRepr) -> Self {
        Func::new(repr.name, repr.instructions)
    }
}

impl Func {
    pub fn new(name: impl Into<EcoString>, instructions: Vec<Instruction>) -> Self {
        let register_count = instructions
            .iter()
            .filter_map(Instruction::max_register)
            .max()
            .map_or(0, |max| max + 1);
        Func {
            name: name.into(),
            instructions,
            register_count,
            meta: Meta::new(),
        }
    }

    pub fn name(&self) -> &EcoString {
        &self.name
    }

    /// The instruction list. Read-only: hooks may attach metadata but never
    /// rewrite code.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn register_count(&self) -> usize {
        self.register_count
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}
