use std::io::Write;

use ecow::EcoString;

use crate::errors::ErrorKind;
use crate::model::{Instruction, Program};
use crate::vm::frame::Frame;
use crate::vm::stack::Stack;
use crate::vm::value::{FromValue, Value};

/// Run-time state of one program execution: the call stack, the program
/// being run and the sink `debug-print` writes to.
///
/// Handlers receive the context mutably. The top of the stack is always the
/// frame whose instruction is being executed.
pub struct ProgramContext<'a> {
    program: &'a Program,
    stack: Stack<Frame>,
    output: &'a mut dyn Write,
}

impl<'a> ProgramContext<'a> {
    pub fn new(program: &'a Program, max_depth: usize, output: &'a mut dyn Write) -> Self {
        ProgramContext {
            program,
            stack: Stack::new(max_depth),
            output,
        }
    }

    pub fn program(&self) -> &'a Program {
        self.program
    }

    pub fn stack(&self) -> &Stack<Frame> {
        &self.stack
    }

    pub(crate) fn stack_mut(&mut self) -> &mut Stack<Frame> {
        &mut self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn output(&mut self) -> &mut dyn Write {
        &mut *self.output
    }

    /// The executing frame.
    pub fn frame(&self) -> Result<&Frame, ErrorKind> {
        self.stack.peek().ok_or(ErrorKind::EmptyStack)
    }

    pub fn frame_mut(&mut self) -> Result<&mut Frame, ErrorKind> {
        self.stack.peek_mut().ok_or(ErrorKind::EmptyStack)
    }

    pub fn push(&mut self, frame: Frame) -> Result<(), ErrorKind> {
        self.stack.push(frame)
    }

    pub fn pop(&mut self) -> Result<Frame, ErrorKind> {
        self.stack.pop().ok_or(ErrorKind::EmptyStack)
    }

    /// Reads input operand `position` of `instruction` from the executing frame.
    pub fn read(&self, instruction: &Instruction, position: usize) -> Result<Value, ErrorKind> {
        let register = instruction.input(position)?;
        self.frame()?.get(register).cloned()
    }

    /// Like [`read`](Self::read), but requires one exact representation.
    pub fn read_as<T: FromValue>(
        &self,
        instruction: &Instruction,
        position: usize,
    ) -> Result<T, ErrorKind> {
        let register = instruction.input(position)?;
        let value = self.frame()?.get(register)?;
        T::from_value(value).ok_or_else(|| ErrorKind::TypeMismatch {
            opcode: instruction.opcode().clone(),
            register,
            expected: T::KIND,
            found: value.kind_name(),
        })
    }

    /// Reads every input operand, in order.
    pub fn read_all(&self, instruction: &Instruction) -> Result<Vec<Value>, ErrorKind> {
        let frame = self.frame()?;
        instruction
            .input_registers()
            .iter()
            .map(|&register| frame.get(register).cloned())
            .collect()
    }

    /// Writes `value` into the instruction's output register.
    pub fn write(
        &mut self,
        instruction: &Instruction,
        value: impl Into<Value>,
    ) -> Result<(), ErrorKind> {
        let register = instruction.destination()?;
        self.frame_mut()?.set(register, value.into())
    }

    /// Resolves `name` and pushes a fresh frame for it with `args` bound.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> Result<(), ErrorKind> {
        let func = self.program.find(name)?;
        let frame = Frame::new(self.program, func, args)?;
        self.push(frame)
    }

    /// Hands `value` to the frame that just became the top of the stack.
    ///
    /// The destination is not an operand: it is the output register of the
    /// instruction right before the resumed frame's pointer, i.e. the call
    /// (or invoke) that suspended it.
    pub fn deliver(&mut self, opcode: &EcoString, value: Value) -> Result<(), ErrorKind> {
        let program = self.program;
        let unresolved = |reason| ErrorKind::StackResolution {
            opcode: opcode.clone(),
            reason,
        };
        let frame = self
            .stack
            .peek_mut()
            .ok_or_else(|| unresolved("no frame to resume"))?;
        let call_site = frame
            .ip()
            .checked_sub(1)
            .and_then(|index| program.function(frame.func()).ok()?.instructions().get(index))
            .ok_or_else(|| unresolved("resumed frame has no call site"))?;
        let destination = call_site
            .output_register()
            .ok_or_else(|| unresolved("call site has no output register"))?;
        frame.set(destination, value.clone())?;
        frame.set_returned(value);
        Ok(())
    }
}
