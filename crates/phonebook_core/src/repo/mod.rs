//! Repository layer over the query executor.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for accounts and contacts.
//! - Keep SQL text inside the persistence boundary.
//!
//! # Invariants
//! - Writes validate entities before any statement is prepared.
//! - Query failures surface unchanged as `RepoError::Query`, so callers can
//!   branch on `QueryErrorKind`.

pub mod contact_repo;
pub mod user_repo;

use crate::model::contact::ContactValidationError;
use crate::rdbms::{QueryError, QueryErrorKind};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository failure.
#[derive(Debug)]
pub enum RepoError {
    Validation(ContactValidationError),
    Query(QueryError),
}

impl RepoError {
    /// Executor error kind, `None` for validation failures.
    pub fn query_kind(&self) -> Option<QueryErrorKind> {
        match self {
            Self::Query(err) => Some(err.kind()),
            Self::Validation(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.query_kind() == Some(QueryErrorKind::NotFound)
    }

    pub fn is_duplicate(&self) -> bool {
        self.query_kind() == Some(QueryErrorKind::Duplicate)
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Query(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Query(err) => Some(err),
        }
    }
}

impl From<ContactValidationError> for RepoError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<QueryError> for RepoError {
    fn from(value: QueryError) -> Self {
        Self::Query(value)
    }
}
