//! Small complete programs, runnable with the standard catalog.

use std::rc::Rc;

use ecow::EcoString;
use tracing::debug;

use crate::{Descriptor, ErrorKind, Func, Instruction, Payload, Program};

/// A bundled program and the output it prints.
#[derive(Debug, Clone, Copy)]
pub struct Demo {
    pub name: &'static str,
    pub description: &'static str,
    pub expected_output: &'static str,
    build: fn() -> Vec<Func>,
}

impl Demo {
    pub fn program(&self) -> Result<Program, ErrorKind> {
        let functions = (self.build)();
        debug!(demo = self.name, functions = functions.len(), "building demo");
        Program::new(functions)
    }
}

pub const DEMOS: &[Demo] = &[
    Demo {
        name: "add",
        description: "calls f(1.0, 2.0) = a + b in double precision",
        expected_output: "3.0\n",
        build: add,
    },
    Demo {
        name: "factorial",
        description: "recursive long factorial of 10",
        expected_output: "3628800\n",
        build: factorial,
    },
    Demo {
        name: "coroutine",
        description: "a counter coroutine yielding 1, 2, 3, ...",
        expected_output: "1\n2\n3\n",
        build: coroutine,
    },
    Demo {
        name: "object",
        description: "sets and reads a field, then calls a method",
        expected_output: "123\nTest{t=123}\n124\n",
        build: object,
    },
    Demo {
        name: "array",
        description: "fills a 3-element array and reads it back",
        expected_output: "42\n[unset, unset, 42]\n3\n",
        build: array,
    },
    Demo {
        name: "cast",
        description: "converts between int, long and double",
        expected_output: "7\n7.0\n3\n-1\n",
        build: cast,
    },
];

pub fn find(name: &str) -> Option<&'static Demo> {
    DEMOS.iter().find(|demo| demo.name == name)
}

fn name(name: impl Into<EcoString>) -> Payload {
    Payload::Name(name.into())
}

fn print(register: usize) -> Instruction {
    Instruction::new("debug-print").inputs([register])
}

fn ret() -> Instruction {
    Instruction::new("fn-return")
}

fn add() -> Vec<Func> {
    vec![
        Func::new(
            "main",
            vec![
                Instruction::new("double-val").output(0).payload(Payload::Double(1.0)),
                Instruction::new("double-val").output(1).payload(Payload::Double(2.0)),
                Instruction::new("fn-call").inputs([0, 1]).output(2).payload(name("f")),
                print(2),
                ret(),
            ],
        ),
        Func::new(
            "f",
            vec![
                Instruction::new("double-add").inputs([0, 1]).output(2),
                Instruction::new("fn-return-value").inputs([2]),
            ],
        ),
    ]
}

fn factorial() -> Vec<Func> {
    vec![
        Func::new(
            "main",
            vec![
                Instruction::new("long-val").output(0).payload(Payload::Long(10)),
                Instruction::new("fn-call").inputs([0]).output(1).payload(name("fact")),
                print(1),
                ret(),
            ],
        ),
        // fact(n) = n < 2 ? 1 : n * fact(n - 1)
        Func::new(
            "fact",
            vec![
                Instruction::new("long-val").output(1).payload(Payload::Long(2)),
                Instruction::new("long-less").inputs([0, 1]).output(2),
                Instruction::new("jump-if").inputs([2]).payload(name("base")),
                Instruction::new("long-val").output(1).payload(Payload::Long(1)),
                Instruction::new("long-sub").inputs([0, 1]).output(3),
                Instruction::new("fn-call").inputs([3]).output(4).payload(name("fact")),
                Instruction::new("long-mul").inputs([0, 4]).output(4),
                Instruction::new("fn-return-value").inputs([4]),
                Instruction::new("jump-label").payload(name("base")),
                Instruction::new("long-val").output(1).payload(Payload::Long(1)),
                Instruction::new("fn-return-value").inputs([1]),
            ],
        ),
    ]
}

fn coroutine() -> Vec<Func> {
    let mut main = vec![Instruction::new("co-create").output(0).payload(name("counter"))];
    for _ in 0..3 {
        main.push(Instruction::new("co-invoke").inputs([0]).output(1));
        main.push(print(1));
    }
    main.push(ret());

    vec![
        Func::new("main", main),
        Func::new(
            "counter",
            vec![
                Instruction::new("long-val").output(0).payload(Payload::Long(1)),
                Instruction::new("long-val").output(1).payload(Payload::Long(1)),
                Instruction::new("jump-label").payload(name("loop")),
                Instruction::new("co-yield").inputs([0]),
                Instruction::new("long-add").inputs([0, 1]).output(0),
                Instruction::new("jump-to").payload(name("loop")),
            ],
        ),
    ]
}

fn object() -> Vec<Func> {
    let descriptor = Rc::new(Descriptor::new("Test", ["t"]));
    vec![
        Func::new(
            "main",
            vec![
                Instruction::new("obj-create")
                    .output(0)
                    .payload(Payload::Descriptor(descriptor)),
                Instruction::new("long-val").output(1).payload(Payload::Long(123)),
                Instruction::new("obj-set").inputs([0, 1]).payload(name("t")),
                Instruction::new("obj-get").inputs([0]).output(2).payload(name("t")),
                print(2),
                print(0),
                Instruction::new("obj-invoke").inputs([0]).output(3).payload(name("next")),
                print(3),
                ret(),
            ],
        ),
        Func::new(
            "Test$next",
            vec![
                Instruction::new("obj-get").inputs([0]).output(1).payload(name("t")),
                Instruction::new("long-val").output(2).payload(Payload::Long(1)),
                Instruction::new("long-add").inputs([1, 2]).output(1),
                Instruction::new("fn-return-value").inputs([1]),
            ],
        ),
    ]
}

fn array() -> Vec<Func> {
    vec![Func::new(
        "main",
        vec![
            Instruction::new("int-val").output(0).payload(Payload::Int(3)),
            Instruction::new("arr-create").inputs([0]).output(1),
            Instruction::new("int-val").output(2).payload(Payload::Int(2)),
            Instruction::new("long-val").output(3).payload(Payload::Long(42)),
            Instruction::new("arr-set").inputs([1, 2, 3]),
            Instruction::new("arr-get").inputs([1, 2]).output(4),
            print(4),
            print(1),
            Instruction::new("arr-length").inputs([1]).output(5),
            print(5),
            ret(),
        ],
    )]
}

fn cast() -> Vec<Func> {
    vec![Func::new(
        "main",
        vec![
            Instruction::new("int-val").output(0).payload(Payload::Int(7)),
            Instruction::new("cast-int-to-long").inputs([0]).output(1),
            print(1),
            Instruction::new("cast-long-to-double").inputs([1]).output(2),
            print(2),
            Instruction::new("double-val").output(3).payload(Payload::Double(3.99)),
            Instruction::new("cast-double-to-int").inputs([3]).output(4),
            print(4),
            Instruction::new("double-val").output(5).payload(Payload::Double(-1.5)),
            Instruction::new("cast-double-to-long").inputs([5]).output(6),
            print(6),
            ret(),
        ],
    )]
}
