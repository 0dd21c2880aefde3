//! Execution and build errors.
//!
//! Every failure is fatal: the VM has no catch primitive, so an [`Error`]
//! aborts the whole run. Errors raised while an instruction executes carry a
//! [`Location`] naming the function, instruction index and opcode.

use core::fmt;

use ecow::EcoString;
use thiserror::Error;

/// What went wrong.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// No extension registered a handler for this opcode.
    #[error("unknown opcode '{0}'")]
    UnknownOpcode(EcoString),

    /// A call, invoke or coroutine target does not exist in the program.
    #[error("no such function '{0}'")]
    UnknownFunction(EcoString),

    /// A [`FuncId`](crate::model::FuncId) taken from a different program.
    #[error("function #{index} is not part of this program ({count} functions)")]
    InvalidFuncId { index: usize, count: usize },

    #[error("no label '{label}' in function '{function}'")]
    UnknownLabel { function: EcoString, label: EcoString },

    #[error("no field '{field}' on type '{type_name}'")]
    UnknownField {
        type_name: EcoString,
        field: EcoString,
    },

    /// A register holds a different representation than the handler expects.
    #[error("{opcode}: expected {expected} in register {register}, found {found}")]
    TypeMismatch {
        opcode: EcoString,
        register: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{opcode}: expected {expected} payload, found {found}")]
    PayloadMismatch {
        opcode: EcoString,
        expected: &'static str,
        found: &'static str,
    },

    /// The instruction pointer ran past the end of a function.
    #[error("instruction {index} is past the end of function '{function}' ({len} instructions)")]
    InstructionOutOfBounds {
        function: EcoString,
        index: usize,
        len: usize,
    },

    #[error("register {register} is out of range for function '{function}' ({count} registers)")]
    RegisterOutOfBounds {
        function: EcoString,
        register: usize,
        count: usize,
    },

    #[error("index {index} out of bounds (length: {len})")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("{opcode}: missing input operand {position}")]
    MissingOperand { opcode: EcoString, position: usize },

    #[error("{opcode}: missing output register")]
    MissingOutput { opcode: EcoString },

    /// A return-class opcode could not find where to deliver its value.
    #[error("{opcode}: cannot deliver value, {reason}")]
    StackResolution {
        opcode: EcoString,
        reason: &'static str,
    },

    #[error("call stack is empty")]
    EmptyStack,

    #[error("metadata '{0}' already defined")]
    DuplicateMeta(EcoString),

    #[error("opcode '{0}' is defined multiple times")]
    DuplicateOpcode(EcoString),

    #[error("function '{0}' is defined multiple times")]
    DuplicateFunction(EcoString),

    #[error("label '{label}' is defined multiple times in function '{function}'")]
    DuplicateLabel { function: EcoString, label: EcoString },

    #[error("{opcode}: division by zero")]
    DivisionByZero { opcode: EcoString },

    /// The coroutine's frame is either running right now or already returned.
    #[error("coroutine '{0}' is not suspended")]
    CoroutineUnavailable(EcoString),

    #[error("reached the end of routine '{function}'")]
    Crash { function: EcoString },

    #[error("call depth {depth} exceeds maximum of {max_depth}")]
    StackOverflow { depth: usize, max_depth: usize },

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where an instruction-level failure happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub function: EcoString,
    pub index: usize,
    pub opcode: EcoString,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{} ({})", self.function, self.index, self.opcode)
    }
}

/// A fatal VM error, optionally tagged with the instruction that raised it.
#[derive(Debug, Error)]
#[error("{kind}{}", .location.as_ref().map(|l| format!(" at {l}")).unwrap_or_default())]
pub struct Error {
    #[source]
    pub kind: ErrorKind,
    pub location: Option<Location>,
}

impl Error {
    pub fn at(kind: ErrorKind, location: Location) -> Self {
        Error {
            kind,
            location: Some(location),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error {
            kind,
            location: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_location() {
        let err = Error::at(
            ErrorKind::UnknownOpcode("long-pow".into()),
            Location {
                function: "main".into(),
                index: 3,
                opcode: "long-pow".into(),
            },
        );
        assert_eq!(
            err.to_string(),
            "unknown opcode 'long-pow' at main#3 (long-pow)"
        );
    }

    #[test]
    fn test_display_without_location() {
        let err: Error = ErrorKind::DuplicateOpcode("fn-call".into()).into();
        assert_eq!(err.to_string(), "opcode 'fn-call' is defined multiple times");
    }
}
