//! Contact model owned by one account.
//!
//! # Responsibility
//! - Define the contact record exchanged with callers.
//! - Validate contact fields before persistence.
//! - Merge partial updates onto the stored record.
//!
//! # Invariants
//! - `first_name` and `phone_number` are never empty once validated.
//! - `id == 0` means "not yet persisted".

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Database identifier of a contact.
pub type ContactId = i64;

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 20;

/// Phone book entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: Option<String>,
}

/// Contact field validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    MissingFirstName,
    MissingPhoneNumber,
    InvalidPhoneNumber(String),
    InvalidEmail(String),
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFirstName => write!(f, "first_name is required"),
            Self::MissingPhoneNumber => write!(f, "phone_number is required"),
            Self::InvalidPhoneNumber(value) => write!(f, "invalid phone_number `{value}`"),
            Self::InvalidEmail(value) => write!(f, "invalid email `{value}`"),
        }
    }
}

impl Error for ContactValidationError {}

impl Contact {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone_number: phone_number.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Checks field-level invariants.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(ContactValidationError::MissingFirstName);
        }

        let phone = self.phone_number.trim();
        if phone.is_empty() {
            return Err(ContactValidationError::MissingPhoneNumber);
        }
        if !is_valid_phone_number(phone) {
            return Err(ContactValidationError::InvalidPhoneNumber(
                self.phone_number.clone(),
            ));
        }

        if let Some(email) = self.email.as_deref() {
            if !crate::model::user::is_plausible_email(email.trim()) {
                return Err(ContactValidationError::InvalidEmail(email.to_string()));
            }
        }

        Ok(())
    }

    /// Applies partial-update semantics: blank fields keep `stored` values.
    ///
    /// The id always comes from `stored`; callers cannot retarget a row.
    pub fn fill_missing_from(&mut self, stored: &Contact) {
        self.id = stored.id;
        if self.first_name.trim().is_empty() {
            self.first_name = stored.first_name.clone();
        }
        if self.last_name.trim().is_empty() {
            self.last_name = stored.last_name.clone();
        }
        if self.phone_number.trim().is_empty() {
            self.phone_number = stored.phone_number.clone();
        }
        if self.email.as_deref().map_or(true, |email| email.trim().is_empty()) {
            self.email = stored.email.clone();
        }
    }

    /// Returns a copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            id: self.id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            email: self
                .email
                .as_deref()
                .map(str::trim)
                .filter(|email| !email.is_empty())
                .map(str::to_string),
        }
    }
}

fn is_valid_phone_number(value: &str) -> bool {
    let body = value.strip_prefix('+').unwrap_or(value);
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || c == '-' || c == ' ')
    {
        return false;
    }
    let digits = body.chars().filter(char::is_ascii_digit).count();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
}
