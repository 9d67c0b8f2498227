//! Core persistence and use-case logic for the phone book backend.
//! Transport layers sit on top of the services exported here.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod rdbms;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::contact::{Contact, ContactId, ContactValidationError};
pub use model::user::{User, UserId};
pub use rdbms::{Executor, QueryError, QueryErrorKind, QueryResult, Value};
pub use repo::contact_repo::{ContactRepository, SqlContactRepository};
pub use repo::user_repo::{SqlUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::{AccountError, AccountService};
pub use service::contact_service::{ContactService, ContactServiceError, ContactsListResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
