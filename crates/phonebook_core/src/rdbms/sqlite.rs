//! `rusqlite` implementation of the driver seam.
//!
//! # Invariants
//! - `SqliteStatement` drop finalizes the prepared statement.
//! - `SqliteCursor` drop resets the statement it borrows.
//! - Uniqueness violations are detected from SQLite extended result codes.

use super::driver::{Cursor, Driver, DriverError, Statement};
use super::row::{Row, Value};
use rusqlite::ffi;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection, Rows, ToSql};

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self {
            Self::Null => ValueRef::Null,
            Self::Integer(v) => ValueRef::Integer(*v),
            Self::Real(v) => ValueRef::Real(*v),
            Self::Text(v) => ValueRef::Text(v.as_bytes()),
            Self::Blob(v) => ValueRef::Blob(v.as_slice()),
        };
        Ok(ToSqlOutput::Borrowed(value))
    }
}

/// Text that is not valid UTF-8 fails the fetch instead of being replaced.
fn value_from_sqlite(value: ValueRef<'_>) -> rusqlite::Result<Value> {
    Ok(match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Integer(v),
        ValueRef::Real(v) => Value::Real(v),
        ValueRef::Text(bytes) => Value::Text(
            std::str::from_utf8(bytes)
                .map_err(rusqlite::Error::Utf8Error)?
                .to_string(),
        ),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    })
}

impl DriverError for rusqlite::Error {
    fn unique_violation(&self) -> Option<bool> {
        match self {
            Self::SqliteFailure(failure, _) => Some(matches!(
                failure.extended_code,
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            )),
            _ => None,
        }
    }
}

impl Driver for Connection {
    type Error = rusqlite::Error;
    type Statement<'conn> = SqliteStatement<'conn> where Self: 'conn;

    fn prepare(&self, template: &str) -> Result<Self::Statement<'_>, Self::Error> {
        let inner = Connection::prepare(self, template)?;
        Ok(SqliteStatement { inner })
    }
}

/// Prepared SQLite statement scoped to one executor call.
pub struct SqliteStatement<'conn> {
    inner: rusqlite::Statement<'conn>,
}

impl Statement for SqliteStatement<'_> {
    type Error = rusqlite::Error;
    type Cursor<'stmt> = SqliteCursor<'stmt> where Self: 'stmt;

    fn query(&mut self, bindings: &[Value]) -> Result<Self::Cursor<'_>, Self::Error> {
        let columns = self.inner.column_count();
        let rows = self.inner.query(params_from_iter(bindings.iter()))?;
        Ok(SqliteCursor { rows, columns })
    }

    fn execute(&mut self, bindings: &[Value]) -> Result<u64, Self::Error> {
        let changed = self.inner.execute(params_from_iter(bindings.iter()))?;
        Ok(changed as u64)
    }
}

/// Open SQLite result stream.
pub struct SqliteCursor<'stmt> {
    rows: Rows<'stmt>,
    columns: usize,
}

impl Cursor for SqliteCursor<'_> {
    type Error = rusqlite::Error;

    fn next_row(&mut self) -> Result<Option<Row>, Self::Error> {
        let Some(row) = self.rows.next()? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(self.columns);
        for column in 0..self.columns {
            values.push(value_from_sqlite(row.get_ref(column)?)?);
        }
        Ok(Some(Row::new(values)))
    }
}
