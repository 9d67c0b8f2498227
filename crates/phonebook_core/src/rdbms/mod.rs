//! Query executor over a relational driver.
//!
//! # Responsibility
//! - Run parameterized templates in three shapes: single-row fetch,
//!   bounded multi-row fetch, and write with affected-row check.
//! - Classify driver failures into [`QueryError`] kinds.
//!
//! # Invariants
//! - Each call prepares its own statement and drops it before returning,
//!   on success and on every error path. Multi-row cursors are dropped
//!   before their statement.
//! - Partial results are never handed to the caller.
//! - The executor never logs; callers decide what is worth reporting.

pub mod driver;
pub mod error;
pub mod row;
pub mod sqlite;

pub use driver::{Cursor, Driver, DriverError, Statement};
pub use error::{BoxError, ExecutionStage, QueryError, QueryErrorKind, QueryResult};
pub use row::{FromRow, FromValue, Row, ScanError, Value};
pub use sqlite::{SqliteCursor, SqliteStatement};

// Upper bound on eager reservation; capacities are caller-controlled.
const MAX_PREALLOCATED_ROWS: usize = 256;

/// Stateless executor borrowing a driver connection.
pub struct Executor<'db, D: Driver + ?Sized> {
    driver: &'db D,
}

impl<D: Driver + ?Sized> Clone for Executor<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: Driver + ?Sized> Copy for Executor<'_, D> {}

impl<'db, D: Driver + ?Sized> Executor<'db, D> {
    pub fn new(driver: &'db D) -> Self {
        Self { driver }
    }

    /// Fetches exactly one row and decodes it as `T`.
    ///
    /// # Errors
    /// - `NotFound` when the query yields no row.
    /// - `Duplicate` when the driver reports a uniqueness violation.
    pub fn fetch_one<T: FromRow>(&self, template: &str, bindings: &[Value]) -> QueryResult<T> {
        self.fetch_one_with(template, bindings, T::from_row)
    }

    /// Like [`Executor::fetch_one`] with a caller-supplied row mapping.
    pub fn fetch_one_with<T, F>(&self, template: &str, bindings: &[Value], map: F) -> QueryResult<T>
    where
        F: FnOnce(&Row) -> Result<T, ScanError>,
    {
        let mut stmt = self.prepare(template)?;
        let mut cursor = stmt
            .query(bindings)
            .map_err(|err| QueryError::classify(ExecutionStage::Execute, err))?;
        let row = cursor
            .next_row()
            .map_err(|err| QueryError::classify(ExecutionStage::Fetch, err))?
            .ok_or(QueryError::NotFound)?;
        map(&row).map_err(QueryError::scan)
    }

    /// Fetches at most `capacity` rows and decodes each as `T`.
    ///
    /// Zero rows is a successful, empty result.
    pub fn fetch_many<T: FromRow>(
        &self,
        template: &str,
        bindings: &[Value],
        capacity: usize,
    ) -> QueryResult<Vec<T>> {
        self.fetch_many_with(template, bindings, capacity, T::from_row)
    }

    /// Like [`Executor::fetch_many`] with a caller-supplied row mapping.
    ///
    /// Stops consuming the cursor once `capacity` rows were scanned, then
    /// checks the cursor's final error state.
    pub fn fetch_many_with<T, F>(
        &self,
        template: &str,
        bindings: &[Value],
        capacity: usize,
        mut map: F,
    ) -> QueryResult<Vec<T>>
    where
        F: FnMut(&Row) -> Result<T, ScanError>,
    {
        let mut stmt = self.prepare(template)?;
        let mut cursor = stmt
            .query(bindings)
            .map_err(|err| QueryError::execution(ExecutionStage::Execute, err))?;

        let mut scanned = Vec::with_capacity(capacity.min(MAX_PREALLOCATED_ROWS));
        while scanned.len() < capacity {
            let Some(row) = cursor
                .next_row()
                .map_err(|err| QueryError::execution(ExecutionStage::Fetch, err))?
            else {
                break;
            };
            scanned.push(map(&row).map_err(QueryError::scan)?);
        }

        cursor
            .finish()
            .map_err(|err| QueryError::execution(ExecutionStage::Finalize, err))?;
        Ok(scanned)
    }

    /// Fills caller-owned slots in row order and returns how many were
    /// written. Slots are untouched unless the whole fetch succeeds.
    pub fn fetch_many_into<T: FromRow>(
        &self,
        template: &str,
        bindings: &[Value],
        out: &mut [T],
    ) -> QueryResult<usize> {
        let rows = self.fetch_many::<T>(template, bindings, out.len())?;
        let count = rows.len();
        for (slot, row) in out.iter_mut().zip(rows) {
            *slot = row;
        }
        Ok(count)
    }

    /// Runs a mutating statement and returns the affected-row count.
    ///
    /// # Errors
    /// - `NotFound` when no row was affected.
    /// - `Duplicate` when the driver reports a uniqueness violation.
    pub fn execute(&self, template: &str, bindings: &[Value]) -> QueryResult<u64> {
        let mut stmt = self.prepare(template)?;
        let affected = stmt
            .execute(bindings)
            .map_err(|err| QueryError::classify(ExecutionStage::Execute, err))?;
        if affected == 0 {
            return Err(QueryError::NotFound);
        }
        Ok(affected)
    }

    fn prepare(&self, template: &str) -> QueryResult<D::Statement<'db>> {
        let driver: &'db D = self.driver;
        driver.prepare(template).map_err(QueryError::preparation)
    }
}
