//! Extensions: namespaced bundles of opcode handlers and preprocessing hooks.

use ecow::{EcoString, eco_format};

use crate::errors::ErrorKind;
use crate::model::{Func, Instruction, Program};
use crate::vm::context::ProgramContext;

/// The handler for one opcode.
///
/// Any `Fn(&mut ProgramContext, &Instruction) -> Result<(), ErrorKind>`
/// closure is a `Functionality`; implement the trait directly for handlers
/// that carry configuration.
pub trait Functionality {
    fn execute(
        &self,
        context: &mut ProgramContext<'_>,
        instruction: &Instruction,
    ) -> Result<(), ErrorKind>;
}

impl<F> Functionality for F
where
    F: Fn(&mut ProgramContext<'_>, &Instruction) -> Result<(), ErrorKind>,
{
    fn execute(
        &self,
        context: &mut ProgramContext<'_>,
        instruction: &Instruction,
    ) -> Result<(), ErrorKind> {
        self(context, instruction)
    }
}

/// Runs once per function before execution. May attach metadata only.
pub type FuncHook = Box<dyn Fn(&mut Func) -> Result<(), ErrorKind>>;

/// Runs once per program before the root frame is pushed.
pub type ProgramHook = Box<dyn Fn(&mut Program) -> Result<(), ErrorKind>>;

/// A namespaced bundle of handlers. A handler registered as `add` in the
/// `long` extension answers to the opcode `long-add`.
///
/// # Example
///
/// ```ignore
/// let ext = Extension::new("int")
///     .handler("neg", |ctx, instr| {
///         let v: i32 = ctx.read_as(instr, 0)?;
///         ctx.write(instr, v.wrapping_neg())
///     });
/// ```
pub struct Extension {
    namespace: EcoString,
    handlers: Vec<(EcoString, Box<dyn Functionality>)>,
    func_hooks: Vec<FuncHook>,
    program_hooks: Vec<ProgramHook>,
}

impl Extension {
    pub fn new(namespace: impl Into<EcoString>) -> Self {
        Extension {
            namespace: namespace.into(),
            handlers: Vec::new(),
            func_hooks: Vec::new(),
            program_hooks: Vec::new(),
        }
    }

    pub fn namespace(&self) -> &EcoString {
        &self.namespace
    }

    /// Full opcode for a local handler name.
    pub fn opcode(&self, name: &str) -> EcoString {
        eco_format!("{}-{}", self.namespace, name)
    }

    /// Registers a closure handler under `name`.
    pub fn handler<F>(self, name: impl Into<EcoString>, handler: F) -> Self
    where
        F: Fn(&mut ProgramContext<'_>, &Instruction) -> Result<(), ErrorKind> + 'static,
    {
        self.functionality(name, handler)
    }

    pub fn functionality(
        mut self,
        name: impl Into<EcoString>,
        functionality: impl Functionality + 'static,
    ) -> Self {
        self.handlers.push((name.into(), Box::new(functionality)));
        self
    }

    pub fn func_hook(
        mut self,
        hook: impl Fn(&mut Func) -> Result<(), ErrorKind> + 'static,
    ) -> Self {
        self.func_hooks.push(Box::new(hook));
        self
    }

    pub fn program_hook(
        mut self,
        hook: impl Fn(&mut Program) -> Result<(), ErrorKind> + 'static,
    ) -> Self {
        self.program_hooks.push(Box::new(hook));
        self
    }

    /// Full opcodes this extension answers to, in registration order.
    pub fn opcodes(&self) -> impl Iterator<Item = EcoString> + '_ {
        self.handlers.iter().map(|(name, _)| self.opcode(name))
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        EcoString,
        Vec<(EcoString, Box<dyn Functionality>)>,
        Vec<FuncHook>,
        Vec<ProgramHook>,
    ) {
        (
            self.namespace,
            self.handlers,
            self.func_hooks,
            self.program_hooks,
        )
    }
}

impl core::fmt::Debug for Extension {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Extension")
            .field("namespace", &self.namespace)
            .field("opcodes", &self.opcodes().collect::<Vec<_>>())
            .field("func_hooks", &self.func_hooks.len())
            .field("program_hooks", &self.program_hooks.len())
            .finish()
    }
}
