use kiln::{Error, Func, Instruction, Payload, Program, VirtualMachine, extensions};

/// Runs `functions` on the standard catalog, returning the printed output.
pub fn run(functions: Vec<Func>) -> Result<String, Error> {
    let (output, result) = run_partial(functions);
    result.map(|()| output)
}

/// Like [`run`], but keeps whatever was printed before a failure.
pub fn run_partial(functions: Vec<Func>) -> (String, Result<(), Error>) {
    let vm = VirtualMachine::builder()
        .extend(extensions::standard())
        .build();
    let mut output = Vec::new();
    let result = match (Program::new(functions).map_err(Error::from), vm) {
        (Ok(mut program), Ok(vm)) => vm.run_with_output(&mut program, &mut output),
        (Err(err), _) | (_, Err(err)) => Err(err),
    };
    let output = String::from_utf8(output).expect("debug output is UTF-8");
    (output, result)
}

#[allow(dead_code)]
pub fn name(name: &str) -> Payload {
    Payload::Name(name.into())
}

/// `main` running `body` and then returning.
#[allow(dead_code)]
pub fn main(mut body: Vec<Instruction>) -> Func {
    body.push(Instruction::new("fn-return"));
    Func::new("main", body)
}

/// Declares a test that runs a program and checks either its output or
/// the kind of error it fails with.
macro_rules! program_case {
    ($name:ident, functions: [$($func:expr),* $(,)?], output: $output:expr $(,)?) => {
        #[test]
        fn $name() {
            let out = cases::run(vec![$($func),*]).unwrap();
            pretty_assertions::assert_eq!(out, $output);
        }
    };
    ($name:ident, functions: [$($func:expr),* $(,)?], error: $kind:pat $(,)?) => {
        #[test]
        fn $name() {
            let err = cases::run(vec![$($func),*]).unwrap_err();
            assert!(matches!(err.kind, $kind), "unexpected error: {}", err);
        }
    };
    ($name:ident, functions: [$($func:expr),* $(,)?], output: $output:expr, error: $kind:pat $(,)?) => {
        #[test]
        fn $name() {
            let (out, result) = cases::run_partial(vec![$($func),*]);
            let err = result.unwrap_err();
            assert!(matches!(err.kind, $kind), "unexpected error: {}", err);
            pretty_assertions::assert_eq!(out, $output);
        }
    };
}
