//! Register values.
//!
//! Registers are dynamically typed: each holds one [`Value`]. Handlers match
//! on the variant they expect and report a `TypeMismatch` otherwise; there is
//! no implicit coercion between representations.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use ecow::EcoString;

use crate::errors::ErrorKind;
use crate::model::{Descriptor, Payload};
use crate::vm::frame::Frame;

#[derive(Debug, Clone, Default)]
pub enum Value {
    /// A register that was never written.
    #[default]
    Unset,
    Int(i32),
    Long(i64),
    Double(f64),
    Bool(bool),
    Array(Array),
    Object(Object),
    Coroutine(Coroutine),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Unset => "unset",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Double(_) => "double",
            Value::Bool(_) => "bool",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Coroutine(_) => "coroutine",
        }
    }

    /// Converts a scalar payload into the value it denotes, verbatim.
    pub fn from_payload(payload: &Payload) -> Option<Value> {
        match payload {
            Payload::Int(v) => Some(Value::Int(*v)),
            Payload::Long(v) => Some(Value::Long(*v)),
            Payload::Double(v) => Some(Value::Double(*v)),
            Payload::Bool(v) => Some(Value::Bool(*v)),
            Payload::None | Payload::Name(_) | Payload::Descriptor(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        i32::from_value(self)
    }

    pub fn as_long(&self) -> Option<i64> {
        i64::from_value(self)
    }

    pub fn as_double(&self) -> Option<f64> {
        f64::from_value(self)
    }

    pub fn as_bool(&self) -> Option<bool> {
        bool::from_value(self)
    }

    pub fn as_array(&self) -> Option<Array> {
        Array::from_value(self)
    }

    pub fn as_object(&self) -> Option<Object> {
        Object::from_value(self)
    }
}

/// Structural equality for scalars, identity for shared values.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unset, Value::Unset) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(&a.0, &b.0),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(&a.0, &b.0),
            (Value::Coroutine(a), Value::Coroutine(b)) => Rc::ptr_eq(&a.frame, &b.frame),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unset => f.write_str("unset"),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            // Debug keeps the fractional part: 3.0 rather than 3.
            Value::Double(v) => write!(f, "{:?}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Array(array) => write!(f, "{}", array),
            Value::Object(object) => write!(f, "{}", object),
            Value::Coroutine(co) => write!(f, "<coroutine {}>", co.name),
        }
    }
}

/// Extraction of one exact representation out of a [`Value`].
pub trait FromValue: Sized {
    /// Name used in `TypeMismatch` errors.
    const KIND: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! scalar_from_value {
    ($ty:ty, $variant:ident, $kind:literal) => {
        impl FromValue for $ty {
            const KIND: &'static str = $kind;

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }
    };
}

scalar_from_value!(i32, Int, "int");
scalar_from_value!(i64, Long, "long");
scalar_from_value!(f64, Double, "double");
scalar_from_value!(bool, Bool, "bool");

impl FromValue for Value {
    const KIND: &'static str = "value";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

/// Arrays and objects currently being printed. Values are shared by
/// reference, so a container may hold itself; revisiting one prints an
/// elided marker instead of recursing.
type Seen = Vec<*const ()>;

fn render(value: &Value, f: &mut fmt::Formatter<'_>, seen: &mut Seen) -> fmt::Result {
    match value {
        Value::Array(array) => array.render(f, seen),
        Value::Object(object) => object.render(f, seen),
        other => write!(f, "{}", other),
    }
}

/// A fixed-length array, shared by reference between registers.
#[derive(Clone)]
pub struct Array(Rc<RefCell<Vec<Value>>>);

impl Array {
    /// Allocates `len` unset elements.
    pub fn new(len: usize) -> Self {
        Array(Rc::new(RefCell::new(vec![Value::Unset; len])))
    }

    pub fn from_values(values: Vec<Value>) -> Self {
        Array(Rc::new(RefCell::new(values)))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, index: i32) -> Result<usize, ErrorKind> {
        let len = self.len();
        usize::try_from(index)
            .ok()
            .filter(|&i| i < len)
            .ok_or(ErrorKind::IndexOutOfBounds {
                index: index.into(),
                len,
            })
    }

    pub fn get(&self, index: i32) -> Result<Value, ErrorKind> {
        let slot = self.slot(index)?;
        Ok(self.0.borrow()[slot].clone())
    }

    pub fn set(&self, index: i32, value: Value) -> Result<(), ErrorKind> {
        let slot = self.slot(index)?;
        self.0.borrow_mut()[slot] = value;
        Ok(())
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }
}

impl Array {
    fn render(&self, f: &mut fmt::Formatter<'_>, seen: &mut Seen) -> fmt::Result {
        let ptr = Rc::as_ptr(&self.0).cast::<()>();
        if seen.contains(&ptr) {
            return f.write_str("[...]");
        }
        seen.push(ptr);
        f.write_str("[")?;
        for (i, element) in self.0.borrow().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            render(element, f, seen)?;
        }
        seen.pop();
        f.write_str("]")
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, &mut Seen::new())
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Array").field(&format_args!("{}", self)).finish()
    }
}

impl FromValue for Array {
    const KIND: &'static str = "array";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(array) => Some(array.clone()),
            _ => None,
        }
    }
}

struct Instance {
    descriptor: Rc<Descriptor>,
    fields: RefCell<Vec<Value>>,
}

/// An object instance: a descriptor plus one cell per field, shared by
/// reference between registers.
#[derive(Clone)]
pub struct Object(Rc<Instance>);

impl Object {
    /// Allocates an instance with every field unset.
    pub fn new(descriptor: Rc<Descriptor>) -> Self {
        let fields = RefCell::new(vec![Value::Unset; descriptor.fields().len()]);
        Object(Rc::new(Instance { descriptor, fields }))
    }

    pub fn descriptor(&self) -> &Rc<Descriptor> {
        &self.0.descriptor
    }

    pub fn get(&self, field: &str) -> Result<Value, ErrorKind> {
        let index = self.0.descriptor.field_index(field)?;
        Ok(self.0.fields.borrow()[index].clone())
    }

    pub fn set(&self, field: &str, value: Value) -> Result<(), ErrorKind> {
        let index = self.0.descriptor.field_index(field)?;
        self.0.fields.borrow_mut()[index] = value;
        Ok(())
    }
}

impl Object {
    fn render(&self, f: &mut fmt::Formatter<'_>, seen: &mut Seen) -> fmt::Result {
        let ptr = Rc::as_ptr(&self.0).cast::<()>();
        if seen.contains(&ptr) {
            return write!(f, "{}{{...}}", self.0.descriptor.name());
        }
        seen.push(ptr);
        write!(f, "{}{{", self.0.descriptor.name())?;
        let fields = self.0.fields.borrow();
        for (i, (name, value)) in self.0.descriptor.fields().iter().zip(fields.iter()).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}=", name)?;
            render(value, f, seen)?;
        }
        seen.pop();
        f.write_str("}")
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, &mut Seen::new())
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Object").field(&format_args!("{}", self)).finish()
    }
}

impl FromValue for Object {
    const KIND: &'static str = "object";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(object) => Some(object.clone()),
            _ => None,
        }
    }
}

/// A suspended computation: a frame that is not on the call stack.
///
/// `co-invoke` moves the frame out of the handle and onto the stack;
/// `co-yield` parks it back. While the frame runs (or after it returned for
/// good) the handle is empty and cannot be invoked.
#[derive(Clone)]
pub struct Coroutine {
    name: EcoString,
    frame: Rc<RefCell<Option<Frame>>>,
}

impl Coroutine {
    pub(crate) fn new(name: EcoString, frame: Frame) -> Self {
        Coroutine {
            name,
            frame: Rc::new(RefCell::new(Some(frame))),
        }
    }

    pub fn name(&self) -> &EcoString {
        &self.name
    }

    pub fn is_suspended(&self) -> bool {
        self.frame.borrow().is_some()
    }

    pub(crate) fn resume(&self) -> Result<Frame, ErrorKind> {
        self.frame
            .borrow_mut()
            .take()
            .ok_or_else(|| ErrorKind::CoroutineUnavailable(self.name.clone()))
    }

    pub(crate) fn suspend(&self, frame: Frame) {
        *self.frame.borrow_mut() = Some(frame);
    }
}

impl fmt::Debug for Coroutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coroutine")
            .field("name", &self.name)
            .field("suspended", &self.is_suspended())
            .finish()
    }
}

impl FromValue for Coroutine {
    const KIND: &'static str = "coroutine";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Coroutine(co) => Some(co.clone()),
            _ => None,
        }
    }
}
