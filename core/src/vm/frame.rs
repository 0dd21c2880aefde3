use ecow::EcoString;

use crate::errors::ErrorKind;
use crate::model::{FuncId, Program, Register};
use crate::vm::value::{Coroutine, Value};

/// One activation of a function: its register file, instruction pointer and
/// the last value a return-class opcode delivered into it.
#[derive(Debug)]
pub struct Frame {
    func: FuncId,
    name: EcoString,
    registers: Vec<Value>,
    ip: usize,
    returned: Option<Value>,
    /// Handle this frame parks itself into on `co-yield`.
    home: Option<Coroutine>,
}

impl Frame {
    /// Builds a frame for `func` with `args` bound to registers `0..args.len()`
    /// and every other register unset.
    pub fn new(program: &Program, func: FuncId, args: Vec<Value>) -> Result<Self, ErrorKind> {
        let function = program.function(func)?;
        let count = function.register_count();
        if args.len() > count {
            return Err(ErrorKind::RegisterOutOfBounds {
                function: function.name().clone(),
                register: args.len() - 1,
                count,
            });
        }
        let mut registers = args;
        registers.resize(count, Value::Unset);
        Ok(Frame {
            func,
            name: function.name().clone(),
            registers,
            ip: 0,
            returned: None,
            home: None,
        })
    }

    pub fn func(&self) -> FuncId {
        self.func
    }

    pub fn function_name(&self) -> &EcoString {
        &self.name
    }

    /// Index of the next instruction to fetch.
    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn set_ip(&mut self, ip: usize) {
        self.ip = ip;
    }

    /// Returns the current pointer and advances it by one.
    pub(crate) fn advance(&mut self) -> usize {
        let ip = self.ip;
        self.ip += 1;
        ip
    }

    pub fn registers(&self) -> &[Value] {
        &self.registers
    }

    pub fn get(&self, register: Register) -> Result<&Value, ErrorKind> {
        self.registers
            .get(register)
            .ok_or_else(|| self.out_of_bounds(register))
    }

    pub fn set(&mut self, register: Register, value: Value) -> Result<(), ErrorKind> {
        let count = self.registers.len();
        match self.registers.get_mut(register) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ErrorKind::RegisterOutOfBounds {
                function: self.name.clone(),
                register,
                count,
            }),
        }
    }

    fn out_of_bounds(&self, register: Register) -> ErrorKind {
        ErrorKind::RegisterOutOfBounds {
            function: self.name.clone(),
            register,
            count: self.registers.len(),
        }
    }

    /// Last value delivered into this frame by `fn-return-value` or `co-yield`.
    pub fn last_returned(&self) -> Option<&Value> {
        self.returned.as_ref()
    }

    pub(crate) fn set_returned(&mut self, value: Value) {
        self.returned = Some(value);
    }

    pub(crate) fn set_home(&mut self, home: Coroutine) {
        self.home = Some(home);
    }

    pub(crate) fn take_home(&mut self) -> Option<Coroutine> {
        self.home.take()
    }
}
