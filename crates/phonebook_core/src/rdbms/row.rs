//! Positional values and typed row decoding.
//!
//! # Responsibility
//! - Carry input bindings and fetched columns in a driver-neutral shape.
//! - Decode rows into statically typed Rust values without runtime type
//!   inspection by the executor.
//!
//! # Invariants
//! - `Row` is owned; nothing fetched borrows from a driver cursor.
//! - Tuple decoding requires the exact column count of the tuple arity.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// One scalar bound to a placeholder or read from a column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Short type label used in scan diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Failure to decode a fetched row into the requested Rust shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanError {
    ColumnCount {
        expected: usize,
        found: usize,
    },
    ColumnOutOfRange {
        column: usize,
        columns: usize,
    },
    TypeMismatch {
        column: usize,
        expected: &'static str,
        found: &'static str,
    },
    Invalid {
        column: usize,
        message: String,
    },
}

impl Display for ScanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ColumnCount { expected, found } => {
                write!(f, "expected {expected} column(s), row has {found}")
            }
            Self::ColumnOutOfRange { column, columns } => {
                write!(f, "column {column} out of range for row of {columns}")
            }
            Self::TypeMismatch {
                column,
                expected,
                found,
            } => write!(f, "column {column}: expected {expected}, found {found}"),
            Self::Invalid { column, message } => write!(f, "column {column}: {message}"),
        }
    }
}

impl Error for ScanError {}

/// One fetched result row, columns in select-list order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Decodes column `column` (zero-based) as `T`.
    pub fn get<T: FromValue>(&self, column: usize) -> Result<T, ScanError> {
        let value = self
            .values
            .get(column)
            .ok_or(ScanError::ColumnOutOfRange {
                column,
                columns: self.values.len(),
            })?;
        T::from_value(value, column)
    }

    /// Fails unless the row has exactly `expected` columns.
    pub fn expect_columns(&self, expected: usize) -> Result<(), ScanError> {
        if self.values.len() != expected {
            return Err(ScanError::ColumnCount {
                expected,
                found: self.values.len(),
            });
        }
        Ok(())
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

/// Typed decoding of a single column value.
pub trait FromValue: Sized {
    fn from_value(value: &Value, column: usize) -> Result<Self, ScanError>;
}

fn mismatch<T>(value: &Value, column: usize, expected: &'static str) -> Result<T, ScanError> {
    Err(ScanError::TypeMismatch {
        column,
        expected,
        found: value.type_name(),
    })
}

impl FromValue for i64 {
    fn from_value(value: &Value, column: usize) -> Result<Self, ScanError> {
        match value {
            Value::Integer(v) => Ok(*v),
            other => mismatch(other, column, "integer"),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value, column: usize) -> Result<Self, ScanError> {
        let wide = i64::from_value(value, column)?;
        i32::try_from(wide).map_err(|_| ScanError::Invalid {
            column,
            message: format!("integer {wide} does not fit in i32"),
        })
    }
}

impl FromValue for u32 {
    fn from_value(value: &Value, column: usize) -> Result<Self, ScanError> {
        let wide = i64::from_value(value, column)?;
        u32::try_from(wide).map_err(|_| ScanError::Invalid {
            column,
            message: format!("integer {wide} does not fit in u32"),
        })
    }
}

impl FromValue for bool {
    fn from_value(value: &Value, column: usize) -> Result<Self, ScanError> {
        match i64::from_value(value, column)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ScanError::Invalid {
                column,
                message: format!("integer {other} is not a boolean"),
            }),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value, column: usize) -> Result<Self, ScanError> {
        match value {
            Value::Real(v) => Ok(*v),
            // Lossy widening matches what SQL drivers do for REAL affinity.
            Value::Integer(v) => Ok(*v as f64),
            other => mismatch(other, column, "real"),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value, column: usize) -> Result<Self, ScanError> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            other => mismatch(other, column, "text"),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value, column: usize) -> Result<Self, ScanError> {
        match value {
            Value::Blob(v) => Ok(v.clone()),
            Value::Text(v) => Ok(v.as_bytes().to_vec()),
            other => mismatch(other, column, "blob"),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value, _column: usize) -> Result<Self, ScanError> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value, column: usize) -> Result<Self, ScanError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other, column).map(Some),
        }
    }
}

/// Typed decoding of a whole row.
///
/// Implemented for tuples up to arity 8; entity types either implement it
/// directly or are decoded through a `Fn(&Row) -> Result<T, ScanError>`.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self, ScanError>;
}

macro_rules! tuple_from_row {
    ($len:expr => $($name:ident : $idx:tt),+) => {
        impl<$($name: FromValue),+> FromRow for ($($name,)+) {
            fn from_row(row: &Row) -> Result<Self, ScanError> {
                row.expect_columns($len)?;
                Ok(($(row.get::<$name>($idx)?,)+))
            }
        }
    };
}

tuple_from_row!(1 => A: 0);
tuple_from_row!(2 => A: 0, B: 1);
tuple_from_row!(3 => A: 0, B: 1, C: 2);
tuple_from_row!(4 => A: 0, B: 1, C: 2, D: 3);
tuple_from_row!(5 => A: 0, B: 1, C: 2, D: 3, E: 4);
tuple_from_row!(6 => A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
tuple_from_row!(7 => A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
tuple_from_row!(8 => A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
