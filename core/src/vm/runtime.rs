use std::io::Write;

use ecow::EcoString;
use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::errors::{Error, ErrorKind, Location};
use crate::model::Program;
use crate::vm::context::ProgramContext;
use crate::vm::extension::{Extension, FuncHook, Functionality, ProgramHook};
use crate::vm::frame::Frame;
use crate::vm::options::ExecutionOptions;

/// Collects extensions and merges them into a [`VirtualMachine`].
#[derive(Debug, Default)]
pub struct VirtualMachineBuilder {
    extensions: Vec<Extension>,
    options: ExecutionOptions,
}

impl VirtualMachineBuilder {
    pub fn add(mut self, extension: Extension) -> Self {
        self.extensions.push(extension);
        self
    }

    pub fn extend(mut self, extensions: impl IntoIterator<Item = Extension>) -> Self {
        self.extensions.extend(extensions);
        self
    }

    pub fn options(mut self, options: ExecutionOptions) -> Self {
        self.options = options;
        self
    }

    /// Merges every handler into one dispatch table, keyed by the full
    /// `namespace-name` opcode. Two handlers for the same opcode are an error;
    /// extensions may share a namespace as long as their opcodes differ.
    pub fn build(self) -> Result<VirtualMachine, Error> {
        let mut handlers: HashMap<EcoString, Box<dyn Functionality>> = HashMap::new();
        let mut func_hooks = Vec::new();
        let mut program_hooks = Vec::new();

        for extension in self.extensions {
            let (namespace, functions, fh, ph) = extension.into_parts();
            debug!(
                namespace = %namespace,
                opcodes = functions.len(),
                func_hooks = fh.len(),
                program_hooks = ph.len(),
                "registering extension"
            );
            for (name, functionality) in functions {
                let opcode = ecow::eco_format!("{}-{}", namespace, name);
                if handlers.contains_key(&opcode) {
                    return Err(ErrorKind::DuplicateOpcode(opcode).into());
                }
                handlers.insert(opcode, functionality);
            }
            func_hooks.extend(fh);
            program_hooks.extend(ph);
        }

        Ok(VirtualMachine {
            handlers,
            func_hooks,
            program_hooks,
            options: self.options,
        })
    }
}

/// The virtual machine: a dispatch table from opcode to handler plus the
/// preprocessing pipeline contributed by its extensions.
///
/// # Example
///
/// ```ignore
/// let vm = VirtualMachine::builder()
///     .extend(kiln_core::extensions::standard())
///     .build()?;
/// vm.run(&mut program)?;
/// ```
pub struct VirtualMachine {
    handlers: HashMap<EcoString, Box<dyn Functionality>>,
    func_hooks: Vec<FuncHook>,
    program_hooks: Vec<ProgramHook>,
    options: ExecutionOptions,
}

impl VirtualMachine {
    pub fn builder() -> VirtualMachineBuilder {
        VirtualMachineBuilder::default()
    }

    pub fn options(&self) -> &ExecutionOptions {
        &self.options
    }

    pub fn has_opcode(&self, opcode: &str) -> bool {
        self.handlers.contains_key(opcode)
    }

    /// Every registered opcode, sorted.
    pub fn opcodes(&self) -> Vec<&EcoString> {
        let mut opcodes: Vec<_> = self.handlers.keys().collect();
        opcodes.sort();
        opcodes
    }

    /// Runs the program hooks, then every function hook over every function.
    ///
    /// Hooks write to write-once metadata, so a program can be prepared only
    /// once; preparing it again fails with `DuplicateMeta`.
    pub fn prepare(&self, program: &mut Program) -> Result<(), Error> {
        debug!(
            functions = program.functions().len(),
            "preparing program"
        );
        for hook in &self.program_hooks {
            hook(program)?;
        }
        for hook in &self.func_hooks {
            for func in program.functions_mut() {
                hook(func)?;
            }
        }
        Ok(())
    }

    /// Pushes the root frame for `main` and returns an execution ready to
    /// step. The program must already be prepared.
    pub fn start<'a>(
        &'a self,
        program: &'a Program,
        output: &'a mut dyn Write,
    ) -> Result<Execution<'a>, Error> {
        let main = program.find(Program::ENTRY)?;
        let mut context = ProgramContext::new(program, self.options.max_depth, output);
        context.push(Frame::new(program, main, Vec::new())?)?;
        Ok(Execution {
            vm: self,
            context,
            steps: 0,
        })
    }

    /// Prepares and runs `program`, printing to stdout.
    pub fn run(&self, program: &mut Program) -> Result<(), Error> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.run_with_output(program, &mut lock)
    }

    /// Prepares and runs `program`, printing to `output`.
    pub fn run_with_output(
        &self,
        program: &mut Program,
        output: &mut dyn Write,
    ) -> Result<(), Error> {
        self.prepare(program)?;
        let steps = self.start(program, &mut *output)?.run()?;
        output.flush().map_err(ErrorKind::from)?;
        debug!(steps, "program halted");
        Ok(())
    }
}

impl core::fmt::Debug for VirtualMachine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualMachine")
            .field("opcodes", &self.opcodes())
            .field("func_hooks", &self.func_hooks.len())
            .field("program_hooks", &self.program_hooks.len())
            .field("options", &self.options)
            .finish()
    }
}

/// A program in flight.
pub struct Execution<'a> {
    vm: &'a VirtualMachine,
    context: ProgramContext<'a>,
    steps: u64,
}

impl<'a> Execution<'a> {
    pub fn context(&self) -> &ProgramContext<'a> {
        &self.context
    }

    pub fn is_halted(&self) -> bool {
        self.context.stack().is_empty()
    }

    /// Number of instructions dispatched so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// One fetch-dispatch cycle. Returns `false` once the stack is empty.
    pub fn step(&mut self) -> Result<bool, Error> {
        let program = self.context.program();
        let Some(frame) = self.context.stack_mut().peek_mut() else {
            return Ok(false);
        };

        let func = program.function(frame.func())?;
        let index = frame.ip();
        let Some(instruction) = func.instructions().get(index) else {
            return Err(ErrorKind::InstructionOutOfBounds {
                function: func.name().clone(),
                index,
                len: func.instructions().len(),
            }
            .into());
        };
        frame.advance();

        let location = || Location {
            function: func.name().clone(),
            index,
            opcode: instruction.opcode().clone(),
        };
        let Some(handler) = self.vm.handlers.get(instruction.opcode()) else {
            return Err(Error::at(
                ErrorKind::UnknownOpcode(instruction.opcode().clone()),
                location(),
            ));
        };

        trace!(function = %func.name(), index, instruction = %instruction, "dispatch");
        handler
            .execute(&mut self.context, instruction)
            .map_err(|kind| Error::at(kind, location()))?;
        self.steps += 1;
        Ok(true)
    }

    /// Steps until the stack empties. Returns the number of instructions
    /// dispatched.
    pub fn run(mut self) -> Result<u64, Error> {
        while self.step()? {}
        Ok(self.steps)
    }
}
