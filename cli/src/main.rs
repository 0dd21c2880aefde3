use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use kiln::demos::{self, Demo};
use kiln::{ErrorKind, ExecutionOptions, Program, VirtualMachine, extensions};
use miette::{Diagnostic, Result};
use thiserror::Error;
use tracing::{debug, info};

/// Kiln - an extensible register-based bytecode virtual machine
#[derive(Parser, Debug)]
#[command(name = "kiln")]
#[command(about = "Run and inspect Kiln bytecode programs", long_about = None)]
struct Args {
    /// Maximum call depth before the run aborts
    #[arg(long, global = true, default_value_t = ExecutionOptions::default().max_depth)]
    max_depth: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a bundled demo program (or all of them)
    Demo {
        /// Demo to run: all, add, factorial, coroutine, object, array, cast
        #[arg(default_value = "all")]
        name: String,

        /// Write the demo's encoded program to FILE instead of running it
        #[arg(long, value_name = "FILE")]
        emit: Option<PathBuf>,
    },
    /// Run an encoded program with the standard catalog
    Run { file: PathBuf },
    /// Print the listing of an encoded program
    Disasm { file: PathBuf },
}

#[derive(Debug, Error, Diagnostic)]
enum CliError {
    #[error("unknown demo '{name}'")]
    #[diagnostic(code(kiln::unknown_demo), help("available demos: all, {available}"))]
    UnknownDemo { name: String, available: String },

    #[error("--emit needs a single demo")]
    #[diagnostic(code(kiln::emit_all), help("pick one of: {available}"))]
    EmitAll { available: String },

    #[error("cannot access '{}'", .path.display())]
    #[diagnostic(code(kiln::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is not an encoded program", .path.display())]
    #[diagnostic(code(kiln::decode))]
    Decode {
        path: PathBuf,
        #[source]
        source: postcard::Error,
    },

    #[error("cannot encode demo '{demo}'")]
    #[diagnostic(code(kiln::encode))]
    Encode {
        demo: &'static str,
        #[source]
        source: postcard::Error,
    },

    #[error("invalid program")]
    #[diagnostic(code(kiln::program))]
    Program(#[source] ErrorKind),

    #[error("execution failed")]
    #[diagnostic(code(kiln::runtime))]
    Runtime(#[source] kiln::Error),
}

fn available() -> String {
    demos::DEMOS
        .iter()
        .map(|demo| demo.name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn virtual_machine(max_depth: usize) -> Result<VirtualMachine, CliError> {
    VirtualMachine::builder()
        .extend(extensions::standard())
        .options(ExecutionOptions { max_depth })
        .build()
        .map_err(CliError::Runtime)
}

fn load(path: &Path) -> Result<Program, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "loading program");
    Program::from_bytes(&bytes).map_err(|source| CliError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn run_program(vm: &VirtualMachine, program: &mut Program) -> Result<(), CliError> {
    vm.run(program).map_err(CliError::Runtime)
}

fn run_demo(vm: &VirtualMachine, demo: &Demo, header: bool) -> Result<(), CliError> {
    if header {
        println!("== {}: {}", demo.name, demo.description);
    }
    let mut program = demo.program().map_err(CliError::Program)?;
    run_program(vm, &mut program)
}

fn demo(vm: &VirtualMachine, name: &str, emit: Option<PathBuf>) -> Result<(), CliError> {
    let selected: Vec<&Demo> = if name == "all" {
        demos::DEMOS.iter().collect()
    } else {
        let demo = demos::find(name).ok_or_else(|| CliError::UnknownDemo {
            name: name.to_string(),
            available: available(),
        })?;
        vec![demo]
    };

    if let Some(path) = emit {
        let [demo] = selected.as_slice() else {
            return Err(CliError::EmitAll {
                available: available(),
            });
        };
        let program = demo.program().map_err(CliError::Program)?;
        let bytes = program.to_bytes().map_err(|source| CliError::Encode {
            demo: demo.name,
            source,
        })?;
        std::fs::write(&path, &bytes).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        info!(demo = demo.name, path = %path.display(), bytes = bytes.len(), "program written");
        return Ok(());
    }

    let header = selected.len() > 1;
    for demo in selected {
        run_demo(vm, demo, header)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG environment variable to control log level
    // Default to WARN if not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let vm = virtual_machine(args.max_depth)?;
    match args.command {
        Command::Demo { name, emit } => demo(&vm, &name, emit)?,
        Command::Run { file } => {
            let mut program = load(&file)?;
            run_program(&vm, &mut program)?;
        }
        Command::Disasm { file } => print!("{}", load(&file)?),
    }
    Ok(())
}
