//! Arithmetic and comparison over one numeric representation.
//!
//! Each calculator fixes a representation (int, long, double) and provides
//! `add sub mul div mod`, the comparisons `equal less greater` and `val`.
//! Operands must hold exactly that representation.
//!
//! Integer arithmetic wraps on overflow; integer division or modulo by zero
//! is an error. Double arithmetic follows IEEE 754.

use core::cmp::Ordering;

use crate::errors::ErrorKind;
use crate::model::Instruction;
use crate::vm::{Extension, FromValue, ProgramContext, Value};

/// A representation a calculator can be built for.
pub trait Number: FromValue + Into<Value> + Copy + 'static {
    /// Extension namespace, e.g. `long` for `long-add`.
    const NAMESPACE: &'static str;

    fn add(self, other: Self) -> Self;
    fn sub(self, other: Self) -> Self;
    fn mul(self, other: Self) -> Self;
    /// `None` on division by zero.
    fn div(self, other: Self) -> Option<Self>;
    fn rem(self, other: Self) -> Option<Self>;
    fn compare(self, other: Self) -> Ordering;
}

macro_rules! integer_number {
    ($ty:ty, $namespace:literal) => {
        impl Number for $ty {
            const NAMESPACE: &'static str = $namespace;

            fn add(self, other: Self) -> Self {
                self.wrapping_add(other)
            }

            fn sub(self, other: Self) -> Self {
                self.wrapping_sub(other)
            }

            fn mul(self, other: Self) -> Self {
                self.wrapping_mul(other)
            }

            fn div(self, other: Self) -> Option<Self> {
                // wrapping_div keeps MIN / -1 from panicking.
                (other != 0).then(|| self.wrapping_div(other))
            }

            fn rem(self, other: Self) -> Option<Self> {
                (other != 0).then(|| self.wrapping_rem(other))
            }

            fn compare(self, other: Self) -> Ordering {
                self.cmp(&other)
            }
        }
    };
}

integer_number!(i32, "int");
integer_number!(i64, "long");

impl Number for f64 {
    const NAMESPACE: &'static str = "double";

    fn add(self, other: Self) -> Self {
        self + other
    }

    fn sub(self, other: Self) -> Self {
        self - other
    }

    fn mul(self, other: Self) -> Self {
        self * other
    }

    fn div(self, other: Self) -> Option<Self> {
        Some(self / other)
    }

    fn rem(self, other: Self) -> Option<Self> {
        Some(self % other)
    }

    fn compare(self, other: Self) -> Ordering {
        self.total_cmp(&other)
    }
}

/// Reads inputs 0 and 1 as `T`, applies `op`, writes the result.
fn binary<T, R>(
    context: &mut ProgramContext<'_>,
    instruction: &Instruction,
    op: impl FnOnce(T, T) -> Result<R, ErrorKind>,
) -> Result<(), ErrorKind>
where
    T: FromValue,
    R: Into<Value>,
{
    let a = context.read_as::<T>(instruction, 0)?;
    let b = context.read_as::<T>(instruction, 1)?;
    let result = op(a, b)?;
    context.write(instruction, result)
}

fn division_by_zero(instruction: &Instruction) -> ErrorKind {
    ErrorKind::DivisionByZero {
        opcode: instruction.opcode().clone(),
    }
}

fn compare<T: Number>(
    context: &mut ProgramContext<'_>,
    instruction: &Instruction,
    expected: Ordering,
) -> Result<(), ErrorKind> {
    binary::<T, bool>(context, instruction, |a, b| Ok(a.compare(b) == expected))
}

/// Copies the instruction's scalar payload into its output register.
fn val(context: &mut ProgramContext<'_>, instruction: &Instruction) -> Result<(), ErrorKind> {
    let value = Value::from_payload(instruction.data())
        .ok_or_else(|| instruction.payload_mismatch("scalar", instruction.data()))?;
    context.write(instruction, value)
}

/// Builds the calculator extension for `T`.
pub fn number<T: Number>() -> Extension {
    Extension::new(T::NAMESPACE)
        .handler("add", |ctx, instr| binary::<T, T>(ctx, instr, |a, b| Ok(a.add(b))))
        .handler("sub", |ctx, instr| binary::<T, T>(ctx, instr, |a, b| Ok(a.sub(b))))
        .handler("mul", |ctx, instr| binary::<T, T>(ctx, instr, |a, b| Ok(a.mul(b))))
        .handler("div", |ctx, instr| {
            binary::<T, T>(ctx, instr, |a, b| a.div(b).ok_or_else(|| division_by_zero(instr)))
        })
        .handler("mod", |ctx, instr| {
            binary::<T, T>(ctx, instr, |a, b| a.rem(b).ok_or_else(|| division_by_zero(instr)))
        })
        .handler("equal", |ctx, instr| compare::<T>(ctx, instr, Ordering::Equal))
        .handler("less", |ctx, instr| compare::<T>(ctx, instr, Ordering::Less))
        .handler("greater", |ctx, instr| compare::<T>(ctx, instr, Ordering::Greater))
        .handler("val", val)
}

pub fn int() -> Extension {
    number::<i32>()
}

pub fn long() -> Extension {
    number::<i64>()
}

pub fn double() -> Extension {
    number::<f64>()
}

/// Boolean logic: `and or xor not val`.
pub fn boolean() -> Extension {
    Extension::new("bool")
        .handler("and", |ctx, instr| binary::<bool, bool>(ctx, instr, |a, b| Ok(a && b)))
        .handler("or", |ctx, instr| binary::<bool, bool>(ctx, instr, |a, b| Ok(a || b)))
        .handler("xor", |ctx, instr| binary::<bool, bool>(ctx, instr, |a, b| Ok(a ^ b)))
        .handler("not", |ctx, instr| {
            let v = ctx.read_as::<bool>(instr, 0)?;
            ctx.write(instr, !v)
        })
        .handler("val", val)
}
