#[macro_use]
mod cases;

use cases::{main, name};
use kiln::{ErrorKind, Func, Instruction, Payload};

program_case!(
    unknown_opcode,
    functions: [main(vec![Instruction::new("int-pow")])],
    error: ErrorKind::UnknownOpcode(_),
);

program_case!(
    unknown_function,
    functions: [main(vec![Instruction::new("fn-call").payload(name("g"))])],
    error: ErrorKind::UnknownFunction(_),
);

program_case!(
    unknown_label,
    functions: [main(vec![Instruction::new("jump-to").payload(name("nowhere"))])],
    error: ErrorKind::UnknownLabel { .. },
);

program_case!(
    duplicate_function,
    functions: [main(vec![]), main(vec![])],
    error: ErrorKind::DuplicateFunction(_),
);

program_case!(
    missing_main,
    functions: [Func::new("start", vec![Instruction::new("fn-return")])],
    error: ErrorKind::UnknownFunction(_),
);

program_case!(
    typed_read_of_unset_register,
    functions: [main(vec![
        Instruction::new("bool-not").inputs([0]).output(1),
    ])],
    error: ErrorKind::TypeMismatch { found: "unset", .. },
);

program_case!(
    division_by_zero,
    functions: [main(vec![
        Instruction::new("long-val").output(0).payload(Payload::Long(0)),
        Instruction::new("long-div").inputs([0, 0]).output(1),
    ])],
    error: ErrorKind::DivisionByZero { .. },
);

program_case!(
    crash,
    functions: [main(vec![Instruction::new("co-crash")])],
    error: ErrorKind::Crash { .. },
);

program_case!(
    coroutine_starts_without_arguments,
    functions: [
        main(vec![
            Instruction::new("co-create").output(0).payload(name("co")),
            Instruction::new("co-invoke").inputs([0]).output(1),
        ]),
        Func::new("co", vec![
            Instruction::new("co-invoke").inputs([0]).output(0),
        ]),
    ],
    error: ErrorKind::TypeMismatch { expected: "coroutine", found: "unset", .. },
);

program_case!(
    unset_is_printable,
    functions: [main(vec![
        Instruction::new("copy-val").inputs([0]).output(1),
        Instruction::new("debug-print").inputs([1]),
    ])],
    output: "unset\n",
);

program_case!(
    output_before_a_fault_is_kept,
    functions: [main(vec![
        Instruction::new("long-val").output(0).payload(Payload::Long(3)),
        Instruction::new("long-val").output(1).payload(Payload::Long(0)),
        Instruction::new("debug-print").inputs([0]),
        Instruction::new("long-mod").inputs([0, 1]).output(2),
        Instruction::new("debug-print").inputs([2]),
    ])],
    output: "3\n",
    error: ErrorKind::DivisionByZero { .. },
);
