//! Account registration and login use-cases.
//!
//! # Invariants
//! - An email maps to at most one account.
//! - Credentials and emails never reach the log.

use crate::model::user::{is_plausible_email, normalize_email, User};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Account use-case failure.
#[derive(Debug)]
pub enum AccountError {
    /// Request fields are missing or malformed.
    InvalidInput(&'static str),
    /// An account with this email already exists.
    EmailTaken,
    /// Email/credential pair does not match any account.
    InvalidCredentials,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for AccountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(details) => write!(f, "invalid input: {details}"),
            Self::EmailTaken => write!(f, "user with given email already exists"),
            Self::InvalidCredentials => write!(f, "wrong email or password"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

/// Account service facade over a user repository.
pub struct AccountService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> AccountService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an account and returns it.
    ///
    /// # Errors
    /// - `InvalidInput` for a malformed email or empty credential.
    /// - `EmailTaken` when the email is already registered, including when a
    ///   concurrent registration wins the insert.
    pub fn register(&self, email: &str, password_hash: &str) -> Result<User, AccountError> {
        let email = normalize_email(email);
        validate_credentials(&email, password_hash)?;

        match self.repo.get_user_by_email(&email) {
            Ok(_) => {
                warn!("event=account_register module=service status=rejected reason=email_taken");
                return Err(AccountError::EmailTaken);
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => {
                error!(
                    "event=account_register module=service status=error stage=lookup error={err}"
                );
                return Err(AccountError::Repo(err));
            }
        }

        let id = match self.repo.create_user(&email, password_hash) {
            Ok(id) => id,
            Err(err) if err.is_duplicate() => {
                warn!("event=account_register module=service status=rejected reason=duplicate_insert");
                return Err(AccountError::EmailTaken);
            }
            Err(err) => {
                error!(
                    "event=account_register module=service status=error stage=insert error={err}"
                );
                return Err(AccountError::Repo(err));
            }
        };

        info!("event=account_register module=service status=ok user_id={id}");
        Ok(User::new(id, email, password_hash))
    }

    /// Resolves an account from its email/credential pair.
    pub fn login(&self, email: &str, password_hash: &str) -> Result<User, AccountError> {
        let email = normalize_email(email);
        validate_credentials(&email, password_hash)?;

        match self.repo.get_user_by_credentials(&email, password_hash) {
            Ok(user) => {
                info!(
                    "event=account_login module=service status=ok user_id={}",
                    user.id
                );
                Ok(user)
            }
            Err(err) if err.is_not_found() => {
                warn!("event=account_login module=service status=rejected reason=invalid_credentials");
                Err(AccountError::InvalidCredentials)
            }
            Err(err) => {
                error!("event=account_login module=service status=error error={err}");
                Err(AccountError::Repo(err))
            }
        }
    }
}

fn validate_credentials(email: &str, password_hash: &str) -> Result<(), AccountError> {
    if !is_plausible_email(email) {
        return Err(AccountError::InvalidInput("email is malformed"));
    }
    if password_hash.trim().is_empty() {
        return Err(AccountError::InvalidInput("password is required"));
    }
    Ok(())
}
