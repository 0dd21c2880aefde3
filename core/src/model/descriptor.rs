use core::fmt;

use ecow::EcoString;
use serde::{Deserialize, Serialize};

use crate::errors::ErrorKind;

/// The shape of an object: a type name and its ordered field names.
///
/// Declared once (usually as an `obj-create` payload) and shared by every
/// instance of that shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    name: EcoString,
    fields: Vec<EcoString>,
}

impl Descriptor {
    pub fn new<F>(name: impl Into<EcoString>, fields: impl IntoIterator<Item = F>) -> Self
    where
        F: Into<EcoString>,
    {
        Descriptor {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &EcoString {
        &self.name
    }

    pub fn fields(&self) -> &[EcoString] {
        &self.fields
    }

    /// Position of `field`, found by a linear scan of the field list.
    pub fn field_index(&self, field: &str) -> Result<usize, ErrorKind> {
        self.fields
            .iter()
            .position(|f| f == field)
            .ok_or_else(|| ErrorKind::UnknownField {
                type_name: self.name.clone(),
                field: field.into(),
            })
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{{}}}", self.name, self.fields.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_index() {
        let point = Descriptor::new("Point", ["x", "y"]);
        assert_eq!(point.field_index("x").unwrap(), 0);
        assert_eq!(point.field_index("y").unwrap(), 1);
        assert!(matches!(
            point.field_index("z"),
            Err(ErrorKind::UnknownField { .. })
        ));
        assert_eq!(point.to_string(), "Point{x, y}");
    }
}
