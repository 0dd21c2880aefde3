//! The standard instruction catalog.
//!
//! Each module builds one or more [`Extension`]s. Hosts pick the families
//! they need, or take them all with [`standard`].

pub mod array;
pub mod calc;
pub mod cast;
pub mod copy;
pub mod coroutine;
pub mod debug;
pub mod func;
pub mod jump;
pub mod object;

#[cfg(test)]
mod catalog_test;

use crate::vm::Extension;

/// Every extension in the catalog.
pub fn standard() -> Vec<Extension> {
    vec![
        calc::int(),
        calc::long(),
        calc::double(),
        calc::boolean(),
        cast::from_int(),
        cast::from_long(),
        cast::from_double(),
        func::extension(),
        jump::extension(),
        object::extension(),
        array::extension(),
        coroutine::extension(),
        copy::extension(),
        debug::extension(),
    ]
}
