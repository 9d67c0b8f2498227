//! Resource-tracking fake driver shared by integration tests.
//!
//! Every prepare, statement release, cursor open/release and consumed row is
//! counted so tests can assert that no handle leaks on any exit path.

#![allow(dead_code)]

use phonebook_core::rdbms::{Cursor, Driver, DriverError, Row, Statement, Value};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Scripted driver failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeError {
    pub message: String,
    pub unique: Option<bool>,
}

impl FakeError {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            unique: None,
        }
    }

    pub fn unique_violation(message: &str) -> Self {
        Self {
            message: message.to_string(),
            unique: Some(true),
        }
    }
}

impl Display for FakeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for FakeError {}

impl DriverError for FakeError {
    fn unique_violation(&self) -> Option<bool> {
        self.unique
    }
}

/// What the fake does at each stage.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub prepare_error: Option<FakeError>,
    pub query_error: Option<FakeError>,
    pub rows: Vec<Vec<Value>>,
    /// Fails when the cursor reaches this row index.
    pub row_error_at: Option<(usize, FakeError)>,
    pub finish_error: Option<FakeError>,
    pub execute_error: Option<FakeError>,
    pub affected_rows: u64,
}

/// Counters observed by tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub prepared: usize,
    pub statements_released: usize,
    pub cursors_opened: usize,
    pub cursors_released: usize,
    pub rows_consumed: usize,
    pub finish_checks: usize,
}

#[derive(Default)]
pub struct FakeDriver {
    script: Script,
    prepared: Cell<usize>,
    statements_released: Cell<usize>,
    cursors_opened: Cell<usize>,
    cursors_released: Cell<usize>,
    rows_consumed: Cell<usize>,
    finish_checks: Cell<usize>,
    templates: RefCell<Vec<String>>,
    bindings: RefCell<Vec<Vec<Value>>>,
}

impl FakeDriver {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    pub fn with_rows(rows: Vec<Vec<Value>>) -> Self {
        Self::new(Script {
            rows,
            ..Script::default()
        })
    }

    pub fn with_affected_rows(affected_rows: u64) -> Self {
        Self::new(Script {
            affected_rows,
            ..Script::default()
        })
    }

    pub fn counters(&self) -> Counters {
        Counters {
            prepared: self.prepared.get(),
            statements_released: self.statements_released.get(),
            cursors_opened: self.cursors_opened.get(),
            cursors_released: self.cursors_released.get(),
            rows_consumed: self.rows_consumed.get(),
            finish_checks: self.finish_checks.get(),
        }
    }

    /// Every acquired statement and cursor was released exactly once.
    pub fn assert_no_leaks(&self) {
        let counters = self.counters();
        assert_eq!(
            counters.prepared, counters.statements_released,
            "statement leak: {counters:?}"
        );
        assert_eq!(
            counters.cursors_opened, counters.cursors_released,
            "cursor leak: {counters:?}"
        );
    }

    pub fn last_template(&self) -> Option<String> {
        self.templates.borrow().last().cloned()
    }

    pub fn last_bindings(&self) -> Option<Vec<Value>> {
        self.bindings.borrow().last().cloned()
    }

    fn bump(cell: &Cell<usize>) {
        cell.set(cell.get() + 1);
    }
}

impl Driver for FakeDriver {
    type Error = FakeError;
    type Statement<'conn> = FakeStatement<'conn> where Self: 'conn;

    fn prepare(&self, template: &str) -> Result<Self::Statement<'_>, Self::Error> {
        if let Some(err) = &self.script.prepare_error {
            return Err(err.clone());
        }
        Self::bump(&self.prepared);
        self.templates.borrow_mut().push(template.to_string());
        Ok(FakeStatement { driver: self })
    }
}

pub struct FakeStatement<'conn> {
    driver: &'conn FakeDriver,
}

impl Drop for FakeStatement<'_> {
    fn drop(&mut self) {
        FakeDriver::bump(&self.driver.statements_released);
    }
}

impl Statement for FakeStatement<'_> {
    type Error = FakeError;
    type Cursor<'stmt> = FakeCursor<'stmt> where Self: 'stmt;

    fn query(&mut self, bindings: &[Value]) -> Result<Self::Cursor<'_>, Self::Error> {
        self.driver.bindings.borrow_mut().push(bindings.to_vec());
        if let Some(err) = &self.driver.script.query_error {
            return Err(err.clone());
        }
        FakeDriver::bump(&self.driver.cursors_opened);
        Ok(FakeCursor {
            driver: self.driver,
            next: 0,
        })
    }

    fn execute(&mut self, bindings: &[Value]) -> Result<u64, Self::Error> {
        self.driver.bindings.borrow_mut().push(bindings.to_vec());
        if let Some(err) = &self.driver.script.execute_error {
            return Err(err.clone());
        }
        Ok(self.driver.script.affected_rows)
    }
}

pub struct FakeCursor<'stmt> {
    driver: &'stmt FakeDriver,
    next: usize,
}

impl Drop for FakeCursor<'_> {
    fn drop(&mut self) {
        FakeDriver::bump(&self.driver.cursors_released);
    }
}

impl Cursor for FakeCursor<'_> {
    type Error = FakeError;

    fn next_row(&mut self) -> Result<Option<Row>, Self::Error> {
        if let Some((index, err)) = &self.driver.script.row_error_at {
            if *index == self.next {
                return Err(err.clone());
            }
        }
        let Some(values) = self.driver.script.rows.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        FakeDriver::bump(&self.driver.rows_consumed);
        Ok(Some(Row::new(values.clone())))
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        FakeDriver::bump(&self.driver.finish_checks);
        match &self.driver.script.finish_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

pub fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}
