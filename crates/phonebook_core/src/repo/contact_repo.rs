//! Contact repository contracts and SQL implementation.
//!
//! # Responsibility
//! - Provide owner-scoped CRUD over the `contacts` table.
//!
//! # Invariants
//! - Every statement filters by `user_id`; another account's contact is
//!   indistinguishable from a missing one.
//! - Writes call `Contact::validate()` before touching the database.
//! - Update and delete report absence through the affected-row count.

use crate::model::contact::{Contact, ContactId};
use crate::model::user::UserId;
use crate::rdbms::{Driver, Executor, Row, ScanError};
use crate::repo::RepoResult;

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    phone_number,
    email
FROM contacts";

/// Repository interface for contact CRUD.
pub trait ContactRepository {
    /// Lists up to `capacity` contacts of `user_id`, oldest first.
    fn list_contacts(&self, user_id: UserId, capacity: usize) -> RepoResult<Vec<Contact>>;
    fn create_contact(&self, user_id: UserId, contact: &Contact) -> RepoResult<ContactId>;
    fn get_contact(&self, user_id: UserId, contact_id: ContactId) -> RepoResult<Contact>;
    fn update_contact(&self, user_id: UserId, contact: &Contact) -> RepoResult<()>;
    fn delete_contact(&self, user_id: UserId, contact_id: ContactId) -> RepoResult<()>;
}

/// Contact repository backed by any [`Driver`].
pub struct SqlContactRepository<'db, D: Driver + ?Sized> {
    executor: Executor<'db, D>,
}

impl<'db, D: Driver + ?Sized> SqlContactRepository<'db, D> {
    pub fn new(driver: &'db D) -> Self {
        Self {
            executor: Executor::new(driver),
        }
    }
}

impl<D: Driver + ?Sized> ContactRepository for SqlContactRepository<'_, D> {
    fn list_contacts(&self, user_id: UserId, capacity: usize) -> RepoResult<Vec<Contact>> {
        let contacts = self.executor.fetch_many_with(
            &format!("{CONTACT_SELECT_SQL} WHERE user_id = ?1 ORDER BY id ASC;"),
            &[user_id.into()],
            capacity,
            parse_contact_row,
        )?;
        Ok(contacts)
    }

    fn create_contact(&self, user_id: UserId, contact: &Contact) -> RepoResult<ContactId> {
        contact.validate()?;
        let contact = contact.trimmed();

        let (id,) = self.executor.fetch_one::<(i64,)>(
            "INSERT INTO contacts (
                user_id,
                first_name,
                last_name,
                phone_number,
                email
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id;",
            &[
                user_id.into(),
                contact.first_name.into(),
                contact.last_name.into(),
                contact.phone_number.into(),
                contact.email.into(),
            ],
        )?;
        Ok(id)
    }

    fn get_contact(&self, user_id: UserId, contact_id: ContactId) -> RepoResult<Contact> {
        let contact = self.executor.fetch_one_with(
            &format!("{CONTACT_SELECT_SQL} WHERE id = ?1 AND user_id = ?2;"),
            &[contact_id.into(), user_id.into()],
            parse_contact_row,
        )?;
        Ok(contact)
    }

    fn update_contact(&self, user_id: UserId, contact: &Contact) -> RepoResult<()> {
        contact.validate()?;
        let contact = contact.trimmed();

        self.executor.execute(
            "UPDATE contacts
             SET
                first_name = ?1,
                last_name = ?2,
                phone_number = ?3,
                email = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5
               AND user_id = ?6;",
            &[
                contact.first_name.into(),
                contact.last_name.into(),
                contact.phone_number.into(),
                contact.email.into(),
                contact.id.into(),
                user_id.into(),
            ],
        )?;
        Ok(())
    }

    fn delete_contact(&self, user_id: UserId, contact_id: ContactId) -> RepoResult<()> {
        self.executor.execute(
            "DELETE FROM contacts WHERE id = ?1 AND user_id = ?2;",
            &[contact_id.into(), user_id.into()],
        )?;
        Ok(())
    }
}

fn parse_contact_row(row: &Row) -> Result<Contact, ScanError> {
    row.expect_columns(5)?;
    Ok(Contact {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        phone_number: row.get(3)?,
        email: row.get(4)?,
    })
}
