//! Scalar values used as bind arguments and as embedded literals.

use core::any::{type_name, Any};
use core::fmt;

/// A scalar SQL value.
///
/// The set of variants is closed: these are exactly the kinds a statement
/// handle knows how to bind. Anything else (booleans, date-times, ...) must
/// be converted by the caller first, usually to its text representation.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    Long(i64),
    /// Single-precision float.
    Float(f32),
    /// Double-precision float.
    Double(f64),
    /// Text value.
    Text(String),
}

impl SqlValue {
    /// Returns the representation used when the value is embedded directly
    /// into generated SQL text.
    ///
    /// Text is wrapped in single quotes and integers are rendered in
    /// decimal. Floating-point values always carry a decimal point or an
    /// exponent (`43.0`, `1e20`) so they keep their real type in SQL. NaN and
    /// the infinities have no SQL literal and are rendered as `NULL`.
    ///
    /// **Warning**: quotes inside text are NOT escaped. Only embed trusted
    /// values; bind untrusted input through `?` placeholders instead.
    #[must_use]
    pub fn to_sql_literal(&self) -> String {
        match self {
            Self::Text(s) => format!("'{s}'"),
            Self::Float(x) if x.is_finite() => format!("{x:?}"),
            Self::Double(x) if x.is_finite() => format!("{x:?}"),
            Self::Float(_) | Self::Double(_) => String::from("NULL"),
            other => other.to_string(),
        }
    }

    /// Returns the name of the variant's kind, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Text(_) => "string",
        }
    }

    /// Converts a type-erased value into a `SqlValue`.
    ///
    /// Accepts `i32`, `i64`, `f32`, `f64`, `String` and `&'static str`. No
    /// coercion is attempted for anything else.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedType`] naming `T` when it is not one of the
    /// supported scalars.
    pub fn from_any<T: Any>(value: &T) -> Result<Self, UnsupportedType> {
        let any = value as &dyn Any;
        if let Some(v) = any.downcast_ref::<i32>() {
            Ok(Self::Int(*v))
        } else if let Some(v) = any.downcast_ref::<i64>() {
            Ok(Self::Long(*v))
        } else if let Some(v) = any.downcast_ref::<f32>() {
            Ok(Self::Float(*v))
        } else if let Some(v) = any.downcast_ref::<f64>() {
            Ok(Self::Double(*v))
        } else if let Some(v) = any.downcast_ref::<String>() {
            Ok(Self::Text(v.clone()))
        } else if let Some(v) = any.downcast_ref::<&'static str>() {
            Ok(Self::Text(String::from(*v)))
        } else if let Some(v) = any.downcast_ref::<Self>() {
            Ok(v.clone())
        } else {
            Err(UnsupportedType {
                type_name: type_name::<T>(),
            })
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Long(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Double(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f32> for SqlValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(String::from(value))
    }
}

/// A value whose type is not one of the bindable scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedType {
    /// Rust type name of the rejected value.
    pub type_name: &'static str,
}

impl fmt::Display for UnsupportedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported argument type `{}`", self.type_name)
    }
}

impl std::error::Error for UnsupportedType {}
