use std::rc::Rc;

use crate::errors::ErrorKind;
use crate::model::{Descriptor, Func, Instruction, Payload, Register};
use crate::test_utils::{main, run};
use pretty_assertions::assert_eq;

fn named(opcode: &str, name: &str) -> Instruction {
    Instruction::new(opcode).payload(Payload::Name(name.into()))
}

fn long(output: Register, v: i64) -> Instruction {
    Instruction::new("long-val").output(output).payload(Payload::Long(v))
}

fn int(output: Register, v: i32) -> Instruction {
    Instruction::new("int-val").output(output).payload(Payload::Int(v))
}

fn print(register: Register) -> Instruction {
    Instruction::new("debug-print").inputs([register])
}

fn ret() -> Instruction {
    Instruction::new("fn-return")
}

fn ret_value(register: Register) -> Instruction {
    Instruction::new("fn-return-value").inputs([register])
}

#[test]
fn test_call_binds_arguments_and_delivers_result() {
    let out = run(vec![
        main(vec![
            long(0, 40),
            long(1, 2),
            named("fn-call", "add").inputs([0, 1]).output(2),
            print(2),
        ]),
        Func::new(
            "add",
            vec![
                Instruction::new("long-add").inputs([0, 1]).output(2),
                ret_value(2),
            ],
        ),
    ])
    .unwrap();
    assert_eq!(out, "42\n");
}

#[test]
fn test_short_return_spellings() {
    let out = run(vec![
        Func::new(
            "main",
            vec![
                long(0, 5),
                named("fn-call", "double").inputs([0]).output(1),
                print(1),
                named("fn-call", "noop").output(2),
                print(2),
                Instruction::new("fn-ret"),
            ],
        ),
        Func::new(
            "double",
            vec![
                Instruction::new("long-add").inputs([0, 0]).output(1),
                Instruction::new("fn-ret-val").inputs([1]),
            ],
        ),
        Func::new("noop", vec![Instruction::new("fn-ret")]),
    ])
    .unwrap();
    assert_eq!(out, "10\nunset\n");
}

#[test]
fn test_call_unknown_function() {
    let err = run(vec![main(vec![named("fn-call", "nope")])]).unwrap_err();
    assert!(matches!(&err.kind, ErrorKind::UnknownFunction(name) if name == "nope"));
}

#[test]
fn test_call_with_too_many_arguments() {
    let err = run(vec![
        main(vec![long(0, 1), long(1, 2), named("fn-call", "one").inputs([0, 1])]),
        Func::new("one", vec![print(0), ret()]),
    ])
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RegisterOutOfBounds { .. }));
}

#[test]
fn test_return_value_needs_an_output_at_the_call_site() {
    let err = run(vec![
        main(vec![named("fn-call", "f")]),
        Func::new("f", vec![long(0, 1), ret_value(0)]),
    ])
    .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::StackResolution {
            reason: "call site has no output register",
            ..
        }
    ));
    assert_eq!(err.location.unwrap().function, "f");
}

#[test]
fn test_return_value_from_main() {
    let err = run(vec![Func::new("main", vec![long(0, 1), ret_value(0)])]).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::StackResolution {
            reason: "no frame to resume",
            ..
        }
    ));
}

#[test]
fn test_jump_loop() {
    // Counts down from 3, printing each value.
    let out = run(vec![main(vec![
        int(0, 3),
        int(1, 0),
        int(2, 1),
        named("jump-label", "top"),
        print(0),
        Instruction::new("int-sub").inputs([0, 2]).output(0),
        Instruction::new("int-greater").inputs([0, 1]).output(3),
        named("jump-if", "top").inputs([3]),
    ])])
    .unwrap();
    assert_eq!(out, "3\n2\n1\n");
}

#[test]
fn test_jump_to_skips_forward() {
    let out = run(vec![main(vec![
        long(0, 1),
        named("jump-to", "end"),
        print(0),
        named("jump-label", "end"),
        long(0, 2),
        print(0),
    ])])
    .unwrap();
    assert_eq!(out, "2\n");
}

#[test]
fn test_jump_if_requires_bool() {
    let err = run(vec![main(vec![
        int(0, 1),
        named("jump-label", "top"),
        named("jump-if", "top").inputs([0]),
    ])])
    .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::TypeMismatch {
            expected: "bool",
            found: "int",
            ..
        }
    ));
}

#[test]
fn test_unknown_and_duplicate_labels() {
    let err = run(vec![main(vec![named("jump-to", "missing")])]).unwrap_err();
    assert!(matches!(
        &err.kind,
        ErrorKind::UnknownLabel { function, label } if function == "main" && label == "missing"
    ));

    // Labels are local to their function.
    let err = run(vec![
        main(vec![named("fn-call", "f")]),
        Func::new("f", vec![named("jump-to", "top"), ret()]),
        Func::new("g", vec![named("jump-label", "top"), ret()]),
    ])
    .unwrap_err();
    assert!(matches!(&err.kind, ErrorKind::UnknownLabel { function, .. } if function == "f"));

    let err = run(vec![main(vec![
        named("jump-label", "a"),
        named("jump-label", "a"),
    ])])
    .unwrap_err();
    assert!(matches!(&err.kind, ErrorKind::DuplicateLabel { label, .. } if label == "a"));
    assert!(err.location.is_none());
}

fn point() -> Payload {
    Payload::Descriptor(Rc::new(Descriptor::new("Point", ["x", "y"])))
}

#[test]
fn test_object_fields() {
    let out = run(vec![main(vec![
        Instruction::new("obj-create").output(0).payload(point()),
        print(0),
        long(1, 7),
        named("obj-set", "x").inputs([0, 1]),
        named("obj-get", "x").inputs([0]).output(2),
        print(2),
        print(0),
    ])])
    .unwrap();
    assert_eq!(out, "Point{x=unset, y=unset}\n7\nPoint{x=7, y=unset}\n");
}

#[test]
fn test_object_unknown_field() {
    let err = run(vec![main(vec![
        Instruction::new("obj-create").output(0).payload(point()),
        named("obj-get", "z").inputs([0]).output(1),
    ])])
    .unwrap_err();
    assert!(matches!(
        &err.kind,
        ErrorKind::UnknownField { type_name, field } if type_name == "Point" && field == "z"
    ));
}

#[test]
fn test_object_invoke_passes_receiver_first() {
    let out = run(vec![
        main(vec![
            Instruction::new("obj-create").output(0).payload(point()),
            long(1, 5),
            named("obj-invoke", "set_x").inputs([0, 1]),
            named("obj-invoke", "x").inputs([0]).output(2),
            print(2),
        ]),
        Func::new(
            "Point$set_x",
            vec![named("obj-set", "x").inputs([0, 1]), ret()],
        ),
        Func::new(
            "Point$x",
            vec![named("obj-get", "x").inputs([0]).output(1), ret_value(1)],
        ),
    ])
    .unwrap();
    assert_eq!(out, "5\n");
}

#[test]
fn test_object_invoke_missing_method() {
    let err = run(vec![main(vec![
        Instruction::new("obj-create").output(0).payload(point()),
        named("obj-invoke", "norm").inputs([0]),
    ])])
    .unwrap_err();
    assert!(matches!(&err.kind, ErrorKind::UnknownFunction(name) if name == "Point$norm"));
}

#[test]
fn test_array_elements() {
    let out = run(vec![main(vec![
        int(0, 3),
        Instruction::new("arr-create").inputs([0]).output(1),
        int(2, 2),
        long(3, 42),
        Instruction::new("arr-set").inputs([1, 2, 3]),
        Instruction::new("arr-get").inputs([1, 2]).output(4),
        Instruction::new("arr-length").inputs([1]).output(5),
        print(1),
        print(4),
        print(5),
    ])])
    .unwrap();
    assert_eq!(out, "[unset, unset, 42]\n42\n3\n");
}

#[test]
fn test_array_bounds() {
    for index in [3, -1] {
        let err = run(vec![main(vec![
            int(0, 3),
            Instruction::new("arr-create").inputs([0]).output(1),
            int(2, index),
            Instruction::new("arr-get").inputs([1, 2]).output(3),
        ])])
        .unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::IndexOutOfBounds { index: i, len: 3 } if i == i64::from(index)),
            "{}",
            err
        );
    }

    let err = run(vec![main(vec![
        int(0, -2),
        Instruction::new("arr-create").inputs([0]).output(1),
    ])])
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IndexOutOfBounds { index: -2, .. }));
}

#[test]
fn test_print_array_holding_itself() {
    let out = run(vec![main(vec![
        int(0, 1),
        Instruction::new("arr-create").inputs([0]).output(1),
        int(2, 0),
        Instruction::new("arr-set").inputs([1, 2, 1]),
        print(1),
    ])])
    .unwrap();
    assert_eq!(out, "[[...]]\n");
}

#[test]
fn test_print_object_holding_itself() {
    let out = run(vec![main(vec![
        Instruction::new("obj-create").output(0).payload(point()),
        named("obj-set", "x").inputs([0, 0]),
        print(0),
    ])])
    .unwrap();
    assert_eq!(out, "Point{x=Point{...}, y=unset}\n");
}

#[test]
fn test_copy_shares_references() {
    let out = run(vec![main(vec![
        int(0, 1),
        Instruction::new("arr-create").inputs([0]).output(1),
        Instruction::new("copy-val").inputs([1]).output(2),
        int(3, 0),
        long(4, 9),
        Instruction::new("arr-set").inputs([2, 3, 4]),
        print(1),
        Instruction::new("copy-val").inputs([5]).output(6),
        print(6),
    ])])
    .unwrap();
    assert_eq!(out, "[9]\nunset\n");
}

fn generator() -> Func {
    // Yields 1, 2, 3 and then returns 0.
    Func::new(
        "gen",
        vec![
            long(0, 1),
            Instruction::new("co-yield").inputs([0]),
            long(0, 2),
            Instruction::new("co-yield").inputs([0]),
            long(0, 3),
            Instruction::new("co-yield").inputs([0]),
            long(0, 0),
            ret_value(0),
        ],
    )
}

#[test]
fn test_coroutine_resumes_after_yield() {
    let mut body = vec![named("co-create", "gen").output(0)];
    for _ in 0..4 {
        body.push(Instruction::new("co-invoke").inputs([0]).output(1));
        body.push(print(1));
    }
    let out = run(vec![main(body), generator()]).unwrap();
    assert_eq!(out, "1\n2\n3\n0\n");
}

#[test]
fn test_coroutine_unavailable_after_return() {
    let mut body = vec![named("co-create", "gen").output(0)];
    for _ in 0..5 {
        body.push(Instruction::new("co-invoke").inputs([0]).output(1));
    }
    let err = run(vec![main(body), generator()]).unwrap_err();
    assert!(matches!(&err.kind, ErrorKind::CoroutineUnavailable(name) if name == "gen"));
    assert_eq!(err.location.unwrap().index, 5);
}

#[test]
fn test_coroutine_handle_prints_its_name() {
    let out = run(vec![
        main(vec![named("co-create", "gen").output(0), print(0)]),
        generator(),
    ])
    .unwrap();
    assert_eq!(out, "<coroutine gen>\n");
}

#[test]
fn test_yield_from_plain_call_drops_the_frame() {
    let out = run(vec![
        main(vec![named("fn-call", "f").output(0), print(0)]),
        Func::new(
            "f",
            vec![long(0, 8), Instruction::new("co-yield").inputs([0])],
        ),
    ])
    .unwrap();
    assert_eq!(out, "8\n");
}

#[test]
fn test_crash_names_the_function() {
    let err = run(vec![
        main(vec![named("fn-call", "f")]),
        Func::new("f", vec![Instruction::new("co-crash")]),
    ])
    .unwrap_err();
    assert!(matches!(&err.kind, ErrorKind::Crash { function } if function == "f"));
    assert_eq!(err.to_string(), "reached the end of routine 'f' at f#0 (co-crash)");
}
