//! Account repository contracts and SQL implementation.
//!
//! # Invariants
//! - Emails are stored and looked up in normalized form.
//! - A missing account is `QueryErrorKind::NotFound`, not `Ok(None)`.

use crate::model::user::{normalize_email, User, UserId};
use crate::rdbms::{Driver, Executor};
use crate::repo::RepoResult;

const USER_SELECT_SQL: &str = "SELECT id, email, password_hash FROM users";

/// Repository interface for account lookups and registration.
pub trait UserRepository {
    fn get_user_by_email(&self, email: &str) -> RepoResult<User>;
    fn get_user_by_credentials(&self, email: &str, password_hash: &str) -> RepoResult<User>;
    /// Inserts an account and returns its id; `Duplicate` when the email exists.
    fn create_user(&self, email: &str, password_hash: &str) -> RepoResult<UserId>;
}

/// Account repository backed by any [`Driver`].
pub struct SqlUserRepository<'db, D: Driver + ?Sized> {
    executor: Executor<'db, D>,
}

impl<'db, D: Driver + ?Sized> SqlUserRepository<'db, D> {
    pub fn new(driver: &'db D) -> Self {
        Self {
            executor: Executor::new(driver),
        }
    }
}

impl<D: Driver + ?Sized> UserRepository for SqlUserRepository<'_, D> {
    fn get_user_by_email(&self, email: &str) -> RepoResult<User> {
        let (id, email, password_hash) = self.executor.fetch_one::<(i64, String, String)>(
            &format!("{USER_SELECT_SQL} WHERE email = ?1;"),
            &[normalize_email(email).into()],
        )?;
        Ok(User {
            id,
            email,
            password_hash,
        })
    }

    fn get_user_by_credentials(&self, email: &str, password_hash: &str) -> RepoResult<User> {
        let (id, email, password_hash) = self.executor.fetch_one::<(i64, String, String)>(
            &format!("{USER_SELECT_SQL} WHERE email = ?1 AND password_hash = ?2;"),
            &[normalize_email(email).into(), password_hash.into()],
        )?;
        Ok(User {
            id,
            email,
            password_hash,
        })
    }

    fn create_user(&self, email: &str, password_hash: &str) -> RepoResult<UserId> {
        let (id,) = self.executor.fetch_one::<(i64,)>(
            "INSERT INTO users (email, password_hash) VALUES (?1, ?2) RETURNING id;",
            &[normalize_email(email).into(), password_hash.into()],
        )?;
        Ok(id)
    }
}
