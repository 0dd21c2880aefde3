//! Write-once metadata attached to a [`Func`](super::Func) or
//! [`Program`](super::Program) by preprocessing hooks.

use core::any::Any;
use core::fmt;
use std::rc::Rc;

use ecow::EcoString;
use hashbrown::HashMap;

use crate::errors::ErrorKind;

/// Label name to the index of its `jump-label` instruction.
pub type LabelTable = HashMap<EcoString, usize>;

/// A value stored in [`Meta`].
#[derive(Clone)]
pub enum MetaValue {
    Labels(LabelTable),
    Index(usize),
    Text(EcoString),
    /// Anything a third-party extension wants to precompute.
    Custom(Rc<dyn Any>),
}

impl fmt::Debug for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Labels(labels) => f.debug_tuple("Labels").field(labels).finish(),
            MetaValue::Index(index) => f.debug_tuple("Index").field(index).finish(),
            MetaValue::Text(text) => f.debug_tuple("Text").field(text).finish(),
            MetaValue::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Write-once key/value store. Each key can be attached exactly once.
#[derive(Debug, Clone, Default)]
pub struct Meta {
    data: HashMap<EcoString, MetaValue>,
}

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<EcoString>, value: MetaValue) -> Result<(), ErrorKind> {
        let key = key.into();
        if self.data.contains_key(&key) {
            return Err(ErrorKind::DuplicateMeta(key));
        }
        self.data.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.data.get(key)
    }

    pub fn labels(&self, key: &str) -> Option<&LabelTable> {
        match self.get(key)? {
            MetaValue::Labels(labels) => Some(labels),
            _ => None,
        }
    }

    /// Custom entry downcast to `T`.
    pub fn custom<T: Any>(&self, key: &str) -> Option<&T> {
        match self.get(key)? {
            MetaValue::Custom(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
