//! Driver seam consumed by the query executor.
//!
//! # Responsibility
//! - Describe the primitives the executor needs from a relational driver:
//!   prepare, query into a cursor, execute for an affected-row count.
//! - Expose structured uniqueness-violation detection per driver.
//!
//! # Invariants
//! - Releasing a statement or cursor is its `Drop`; a handle is released
//!   exactly once and never outlives the value it borrows from.
//! - A statement is never cached by the executor; one per operation.

use super::row::{Row, Value};
use std::error::Error;

/// Failure type reported by a driver.
pub trait DriverError: Error + Send + Sync + 'static {
    /// Structured uniqueness-constraint check.
    ///
    /// `Some(flag)` is authoritative. `None` means the driver exposes no code
    /// for this failure and classification falls back to the message text.
    fn unique_violation(&self) -> Option<bool> {
        None
    }
}

/// A database connection able to compile query templates.
pub trait Driver {
    type Error: DriverError;
    type Statement<'conn>: Statement<Error = Self::Error>
    where
        Self: 'conn;

    fn prepare(&self, template: &str) -> Result<Self::Statement<'_>, Self::Error>;
}

/// A compiled template. Dropping it releases the driver-side handle.
pub trait Statement {
    type Error: DriverError;
    type Cursor<'stmt>: Cursor<Error = Self::Error>
    where
        Self: 'stmt;

    /// Runs the statement and opens a cursor over its result rows.
    fn query(&mut self, bindings: &[Value]) -> Result<Self::Cursor<'_>, Self::Error>;

    /// Runs a mutating statement and returns the affected-row count.
    fn execute(&mut self, bindings: &[Value]) -> Result<u64, Self::Error>;
}

/// An open result stream. Dropping it releases the driver-side cursor.
pub trait Cursor {
    type Error: DriverError;

    fn next_row(&mut self) -> Result<Option<Row>, Self::Error>;

    /// Post-iteration error check; a stream may fail after its last row.
    fn finish(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
