use core::fmt;

use ecow::EcoString;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::errors::ErrorKind;
use crate::extensions::jump;
use crate::model::{Func, Instruction, Meta};

/// Position of a [`Func`] inside its [`Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncId(pub(crate) usize);

/// A complete bytecode unit: the functions plus program-wide metadata.
///
/// Function names are unique; [`Program::new`] rejects duplicates so that a
/// name always resolves to exactly one function.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ProgramRepr")]
pub struct Program {
    functions: Vec<Func>,
    #[serde(skip)]
    by_name: HashMap<EcoString, usize>,
    #[serde(skip)]
    meta: Meta,
}

#[derive(Deserialize)]
struct ProgramRepr {
    functions: Vec<Func>,
}

impl TryFrom<ProgramRepr> for Program {
    type Error = ErrorKind;

    fn try_from(repr: ProgramRepr) -> Result<Self, Self::Error> {
        Program::new(repr.functions)
    }
}

impl Program {
    /// Name of the entry point every program must define.
    pub const ENTRY: &'static str = "main";

    pub fn new(functions: Vec<Func>) -> Result<Self, ErrorKind> {
        let mut by_name = HashMap::with_capacity(functions.len());
        for (index, func) in functions.iter().enumerate() {
            if by_name.insert(func.name().clone(), index).is_some() {
                return Err(ErrorKind::DuplicateFunction(func.name().clone()));
            }
        }
        Ok(Program {
            functions,
            by_name,
            meta: Meta::new(),
        })
    }

    pub fn functions(&self) -> &[Func] {
        &self.functions
    }

    pub(crate) fn functions_mut(&mut self) -> &mut [Func] {
        &mut self.functions
    }

    pub fn find(&self, name: &str) -> Result<FuncId, ErrorKind> {
        self.by_name
            .get(name)
            .map(|&index| FuncId(index))
            .ok_or_else(|| ErrorKind::UnknownFunction(name.into()))
    }

    pub fn function(&self, id: FuncId) -> Result<&Func, ErrorKind> {
        self.functions
            .get(id.0)
            .ok_or(ErrorKind::InvalidFuncId {
                index: id.0,
                count: self.functions.len(),
            })
    }

    /// Looks up a function by name.
    pub fn get(&self, name: &str) -> Result<&Func, ErrorKind> {
        self.find(name).and_then(|id| self.function(id))
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    /// Encodes the program with postcard. Metadata is not encoded; it is
    /// recomputed by the VM's hooks on every run.
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}

fn label_of(instr: &Instruction) -> Option<&EcoString> {
    if instr.opcode() == jump::LABEL {
        instr.name().ok()
    } else {
        None
    }
}

/// Disassembly listing, one block per function.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, func) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "fn {} (registers: {}):", func.name(), func.register_count())?;
            for (addr, instr) in func.instructions().iter().enumerate() {
                match label_of(instr) {
                    Some(label) => writeln!(f, "  {:4} {}:", addr, label)?,
                    None => writeln!(f, "  {:4}     {}", addr, instr)?,
                }
            }
        }
        Ok(())
    }
}
