//! A single VM instruction.

use core::fmt;
use std::rc::Rc;

use ecow::EcoString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::errors::ErrorKind;
use crate::model::Descriptor;

/// Index of a register inside a frame's register file.
pub type Register = usize;

/// Immediate data attached to an instruction.
///
/// What a payload means is up to the opcode: `long-val` stores it, `fn-call`
/// reads a function name from it, `obj-create` reads a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    #[default]
    None,
    Int(i32),
    Long(i64),
    Double(f64),
    Bool(bool),
    Name(EcoString),
    Descriptor(Rc<Descriptor>),
}

impl Payload {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Payload::None => "none",
            Payload::Int(_) => "int",
            Payload::Long(_) => "long",
            Payload::Double(_) => "double",
            Payload::Bool(_) => "bool",
            Payload::Name(_) => "name",
            Payload::Descriptor(_) => "descriptor",
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::None => Ok(()),
            Payload::Int(v) => write!(f, "{}", v),
            Payload::Long(v) => write!(f, "{}L", v),
            Payload::Double(v) => write!(f, "{:?}", v),
            Payload::Bool(v) => write!(f, "{}", v),
            Payload::Name(name) => write!(f, "{:?}", name.as_str()),
            Payload::Descriptor(descriptor) => write!(f, "{}", descriptor),
        }
    }
}

/// One instruction: an opcode, its input registers, an optional output
/// register and an optional payload. Instructions never change once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    opcode: EcoString,
    inputs: SmallVec<[Register; 3]>,
    output: Option<Register>,
    payload: Payload,
}

impl Instruction {
    pub fn new(opcode: impl Into<EcoString>) -> Self {
        Instruction {
            opcode: opcode.into(),
            inputs: SmallVec::new(),
            output: None,
            payload: Payload::None,
        }
    }

    pub fn inputs(mut self, inputs: impl IntoIterator<Item = Register>) -> Self {
        self.inputs = inputs.into_iter().collect();
        self
    }

    pub fn output(mut self, register: Register) -> Self {
        self.output = Some(register);
        self
    }

    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn opcode(&self) -> &EcoString {
        &self.opcode
    }

    pub fn input_registers(&self) -> &[Register] {
        &self.inputs
    }

    pub fn output_register(&self) -> Option<Register> {
        self.output
    }

    pub fn data(&self) -> &Payload {
        &self.payload
    }

    /// The register bound to input operand `position`.
    pub fn input(&self, position: usize) -> Result<Register, ErrorKind> {
        self.inputs
            .get(position)
            .copied()
            .ok_or_else(|| ErrorKind::MissingOperand {
                opcode: self.opcode.clone(),
                position,
            })
    }

    /// The destination register, for opcodes that must produce a value.
    pub fn destination(&self) -> Result<Register, ErrorKind> {
        self.output.ok_or_else(|| ErrorKind::MissingOutput {
            opcode: self.opcode.clone(),
        })
    }

    /// Payload read as a name (function, label or field).
    pub fn name(&self) -> Result<&EcoString, ErrorKind> {
        match &self.payload {
            Payload::Name(name) => Ok(name),
            other => Err(self.payload_mismatch("name", other)),
        }
    }

    pub fn descriptor(&self) -> Result<&Rc<Descriptor>, ErrorKind> {
        match &self.payload {
            Payload::Descriptor(descriptor) => Ok(descriptor),
            other => Err(self.payload_mismatch("descriptor", other)),
        }
    }

    pub(crate) fn payload_mismatch(&self, expected: &'static str, found: &Payload) -> ErrorKind {
        ErrorKind::PayloadMismatch {
            opcode: self.opcode.clone(),
            expected,
            found: found.kind_name(),
        }
    }

    /// Highest register this instruction touches, if any.
    pub fn max_register(&self) -> Option<Register> {
        self.inputs.iter().copied().chain(self.output).max()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        for (i, input) in self.inputs.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{}r{}", sep, input)?;
        }
        if let Some(output) = self.output {
            write!(f, " -> r{}", output)?;
        }
        if self.payload != Payload::None {
            write!(f, " [{}]", self.payload)?;
        }
        Ok(())
    }
}
