//! Contact use-cases scoped to one account.
//!
//! # Responsibility
//! - Validate identifiers and contact payloads.
//! - Map repository outcomes to contact-level errors.
//!
//! # Invariants
//! - Identifiers must be positive; zero and negatives never reach SQL.
//! - Updates are read-merge-validate-write; a missing contact is reported
//!   before the payload is inspected.
//! - List results are bounded by an applied limit (default 50, max 100).

use crate::model::contact::{Contact, ContactId, ContactValidationError};
use crate::model::user::UserId;
use crate::rdbms::QueryErrorKind;
use crate::repo::contact_repo::ContactRepository;
use crate::repo::RepoError;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACTS_DEFAULT_LIMIT: u32 = 50;
const CONTACTS_LIMIT_MAX: u32 = 100;

/// Contact use-case failure.
#[derive(Debug)]
pub enum ContactServiceError {
    /// User or contact id is not a positive integer.
    InvalidId,
    /// Payload failed field validation.
    InvalidContact(ContactValidationError),
    /// The contact does not exist for this account.
    ContactNotFound(ContactId),
    /// The account already has a contact with this phone number.
    DuplicatePhoneNumber,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ContactServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId => write!(f, "invalid id"),
            Self::InvalidContact(err) => write!(f, "invalid contact: {err}"),
            Self::ContactNotFound(id) => write!(f, "the given contact id ({id}) doesn't exist"),
            Self::DuplicatePhoneNumber => write!(f, "a contact with this phone number exists"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContactServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidContact(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

/// List result envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactsListResult {
    pub items: Vec<Contact>,
    /// Effective normalized limit used by the query.
    pub applied_limit: u32,
}

/// Contact service facade over a contact repository.
pub struct ContactService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a contact and returns it with its assigned id.
    pub fn create_contact(
        &self,
        user_id: UserId,
        contact: &Contact,
    ) -> Result<Contact, ContactServiceError> {
        ensure_positive(user_id)?;
        contact
            .validate()
            .map_err(ContactServiceError::InvalidContact)?;

        let id = self
            .repo
            .create_contact(user_id, contact)
            .map_err(|err| map_repo_error("contact_create", 0, err))?;

        info!("event=contact_create module=service status=ok user_id={user_id} contact_id={id}");
        let mut created = contact.trimmed();
        created.id = id;
        Ok(created)
    }

    pub fn get_contact(
        &self,
        user_id: UserId,
        contact_id: ContactId,
    ) -> Result<Contact, ContactServiceError> {
        ensure_positive(user_id)?;
        ensure_positive(contact_id)?;
        self.repo
            .get_contact(user_id, contact_id)
            .map_err(|err| map_repo_error("contact_get", contact_id, err))
    }

    /// Lists contacts, oldest first, bounded by the normalized limit.
    pub fn list_contacts(
        &self,
        user_id: UserId,
        limit: Option<u32>,
    ) -> Result<ContactsListResult, ContactServiceError> {
        ensure_positive(user_id)?;
        let applied_limit = normalize_contacts_limit(limit);
        let items = self
            .repo
            .list_contacts(user_id, applied_limit as usize)
            .map_err(|err| map_repo_error("contact_list", 0, err))?;
        Ok(ContactsListResult {
            items,
            applied_limit,
        })
    }

    /// Applies a partial update and returns the stored result.
    ///
    /// Blank fields in `patch` keep their current values.
    pub fn update_contact(
        &self,
        user_id: UserId,
        contact_id: ContactId,
        patch: &Contact,
    ) -> Result<Contact, ContactServiceError> {
        let stored = self.get_contact(user_id, contact_id)?;

        let mut updated = patch.clone();
        updated.fill_missing_from(&stored);
        updated
            .validate()
            .map_err(ContactServiceError::InvalidContact)?;

        self.repo
            .update_contact(user_id, &updated)
            .map_err(|err| map_repo_error("contact_update", contact_id, err))?;

        info!("event=contact_update module=service status=ok user_id={user_id} contact_id={contact_id}");
        Ok(updated.trimmed())
    }

    pub fn delete_contact(
        &self,
        user_id: UserId,
        contact_id: ContactId,
    ) -> Result<(), ContactServiceError> {
        ensure_positive(user_id)?;
        ensure_positive(contact_id)?;
        self.repo
            .delete_contact(user_id, contact_id)
            .map_err(|err| map_repo_error("contact_delete", contact_id, err))?;
        info!("event=contact_delete module=service status=ok user_id={user_id} contact_id={contact_id}");
        Ok(())
    }
}

/// Normalizes list limit according to the contacts contract.
pub fn normalize_contacts_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => CONTACTS_DEFAULT_LIMIT,
        Some(value) if value > CONTACTS_LIMIT_MAX => CONTACTS_LIMIT_MAX,
        Some(value) => value,
    }
}

fn ensure_positive(id: i64) -> Result<(), ContactServiceError> {
    if id <= 0 {
        return Err(ContactServiceError::InvalidId);
    }
    Ok(())
}

fn map_repo_error(event: &str, contact_id: ContactId, err: RepoError) -> ContactServiceError {
    if let RepoError::Validation(validation) = err {
        return ContactServiceError::InvalidContact(validation);
    }
    match err.query_kind() {
        Some(QueryErrorKind::NotFound) => ContactServiceError::ContactNotFound(contact_id),
        Some(QueryErrorKind::Duplicate) => ContactServiceError::DuplicatePhoneNumber,
        _ => {
            error!(
                "event={event} module=service status=error contact_id={contact_id} error={err}"
            );
            ContactServiceError::Repo(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_contacts_limit;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(normalize_contacts_limit(None), 50);
        assert_eq!(normalize_contacts_limit(Some(0)), 50);
        assert_eq!(normalize_contacts_limit(Some(7)), 7);
        assert_eq!(normalize_contacts_limit(Some(1_000)), 100);
    }
}
