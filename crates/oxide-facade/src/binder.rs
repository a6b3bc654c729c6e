//! Positional parameter binding.
//!
//! Dispatches [`SqlValue`]s to the matching typed bind of a
//! [`StatementHandle`]. Binding is strictly left to right; whether the
//! number of values matches the placeholders is left to the driver, which
//! checks it when the statement executes.

use std::any::Any;

use oxide_facade_core::builder::SqlValue;

use crate::error::Result;
use crate::statement::StatementHandle;

/// Binds one value at the handle's next position.
///
/// # Errors
///
/// Fails on a closed handle or when the driver rejects the value.
pub fn bind(handle: &mut StatementHandle, value: &SqlValue) -> Result<()> {
    let bound = match value {
        SqlValue::Int(v) => handle.bind_int(*v),
        SqlValue::Long(v) => handle.bind_long(*v),
        SqlValue::Float(v) => handle.bind_float(*v),
        SqlValue::Double(v) => handle.bind_double(*v),
        SqlValue::Text(v) => handle.bind_string(v),
    };
    bound.map(|_| ())
}

/// Binds each value in order.
///
/// # Errors
///
/// Stops at the first failing bind.
pub fn bind_all(handle: &mut StatementHandle, values: &[SqlValue]) -> Result<()> {
    for value in values {
        bind(handle, value)?;
    }
    Ok(())
}

/// Binds a value whose type is only known at runtime.
///
/// # Errors
///
/// Returns [`Error::UnsupportedArgumentType`](crate::Error::UnsupportedArgumentType)
/// without touching the handle when `T` is not one of the supported scalars.
pub fn bind_any<T: Any>(handle: &mut StatementHandle, value: &T) -> Result<()> {
    let value = SqlValue::from_any(value)?;
    bind(handle, &value)
}
