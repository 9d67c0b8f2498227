//! Domain model for accounts and their contacts.
//!
//! # Invariants
//! - Every contact belongs to exactly one account.
//! - Entities are plain data; persistence lives in `repo`.

pub mod contact;
pub mod user;
