//! Query error taxonomy and driver-failure classification.
//!
//! # Responsibility
//! - Reduce every driver failure to one of four stable kinds.
//! - Preserve the originating cause for callers that log it.
//!
//! # Invariants
//! - Structured driver codes win over message matching.
//! - `NotFound` is produced by the executor itself, never by a driver message.

use super::driver::DriverError;
use super::row::ScanError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Boxed underlying cause carried by query errors.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

pub type QueryResult<T> = Result<T, QueryError>;

// MySQL, SQLite and PostgreSQL wording respectively.
static DUPLICATE_SIGNATURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)duplicate entry|unique constraint failed|duplicate key value violates unique constraint",
    )
    .expect("valid duplicate signature regex")
});

/// Fieldless error kind, stable across all executor operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryErrorKind {
    PreparationFailed,
    Duplicate,
    NotFound,
    ExecutionFailed,
}

impl QueryErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PreparationFailed => "preparation_failed",
            Self::Duplicate => "duplicate",
            Self::NotFound => "not_found",
            Self::ExecutionFailed => "execution_failed",
        }
    }
}

/// Where inside an operation an execution failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionStage {
    Execute,
    Fetch,
    Scan,
    Finalize,
}

impl Display for ExecutionStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Execute => "execute",
            Self::Fetch => "fetch",
            Self::Scan => "scan",
            Self::Finalize => "finalize",
        };
        f.write_str(label)
    }
}

/// Error returned by every executor operation.
#[derive(Debug)]
pub enum QueryError {
    /// The template could not be compiled by the driver.
    PreparationFailed(BoxError),
    /// A uniqueness constraint rejected the statement.
    Duplicate(BoxError),
    /// A single-row fetch found nothing, or a write affected no rows.
    NotFound,
    /// Any other execution, scan or cursor failure.
    ExecutionFailed {
        stage: ExecutionStage,
        source: BoxError,
    },
}

impl QueryError {
    pub fn kind(&self) -> QueryErrorKind {
        match self {
            Self::PreparationFailed(_) => QueryErrorKind::PreparationFailed,
            Self::Duplicate(_) => QueryErrorKind::Duplicate,
            Self::NotFound => QueryErrorKind::NotFound,
            Self::ExecutionFailed { .. } => QueryErrorKind::ExecutionFailed,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }

    pub(crate) fn preparation<E: DriverError>(err: E) -> Self {
        Self::PreparationFailed(Box::new(err))
    }

    /// Duplicate when the driver reports a uniqueness violation, otherwise
    /// an execution failure at `stage`.
    pub(crate) fn classify<E: DriverError>(stage: ExecutionStage, err: E) -> Self {
        if is_duplicate_failure(&err) {
            return Self::Duplicate(Box::new(err));
        }
        Self::execution(stage, err)
    }

    pub(crate) fn execution<E: DriverError>(stage: ExecutionStage, err: E) -> Self {
        Self::ExecutionFailed {
            stage,
            source: Box::new(err),
        }
    }

    pub(crate) fn scan(err: ScanError) -> Self {
        Self::ExecutionFailed {
            stage: ExecutionStage::Scan,
            source: Box::new(err),
        }
    }
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PreparationFailed(err) => write!(f, "failed to prepare statement: {err}"),
            Self::Duplicate(err) => write!(f, "duplicate entry rejected: {err}"),
            Self::NotFound => write!(f, "no entry found with given arguments"),
            Self::ExecutionFailed { stage, source } => {
                write!(f, "query failed during {stage}: {source}")
            }
        }
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PreparationFailed(err) | Self::Duplicate(err) => Some(err.as_ref()),
            Self::ExecutionFailed { source, .. } => Some(source.as_ref()),
            Self::NotFound => None,
        }
    }
}

/// Structured code first, duplicate-entry signature as last resort.
pub fn is_duplicate_failure<E: DriverError>(err: &E) -> bool {
    match err.unique_violation() {
        Some(flag) => flag,
        None => DUPLICATE_SIGNATURE_RE.is_match(&err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{is_duplicate_failure, ExecutionStage, QueryError, QueryErrorKind};
    use crate::rdbms::driver::DriverError;
    use std::error::Error;
    use std::fmt::{Display, Formatter};

    #[derive(Debug)]
    struct StubError {
        message: &'static str,
        unique: Option<bool>,
    }

    impl Display for StubError {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.message)
        }
    }

    impl Error for StubError {}

    impl DriverError for StubError {
        fn unique_violation(&self) -> Option<bool> {
            self.unique
        }
    }

    fn stub(message: &'static str, unique: Option<bool>) -> StubError {
        StubError { message, unique }
    }

    #[test]
    fn signature_fallback_matches_known_driver_wording() {
        for message in [
            "Error 1062: Duplicate entry 'a@b.c' for key 'email'",
            "UNIQUE constraint failed: users.email",
            "ERROR: duplicate key value violates unique constraint \"users_email_key\"",
        ] {
            assert!(is_duplicate_failure(&stub(message, None)), "{message}");
        }
        assert!(!is_duplicate_failure(&stub("connection reset", None)));
    }

    #[test]
    fn structured_code_overrides_message() {
        assert!(!is_duplicate_failure(&stub("Duplicate entry 'x'", Some(false))));
        assert!(is_duplicate_failure(&stub("constraint", Some(true))));
    }

    #[test]
    fn classify_keeps_stage_and_cause() {
        let err = QueryError::classify(ExecutionStage::Fetch, stub("disk I/O error", None));
        assert_eq!(err.kind(), QueryErrorKind::ExecutionFailed);
        assert!(matches!(
            err,
            QueryError::ExecutionFailed {
                stage: ExecutionStage::Fetch,
                ..
            }
        ));
        let source = err.source().expect("cause should be preserved");
        assert_eq!(source.to_string(), "disk I/O error");
    }

    #[test]
    fn not_found_has_no_cause() {
        assert!(QueryError::NotFound.source().is_none());
        assert_eq!(QueryError::NotFound.kind().as_str(), "not_found");
    }
}
