//! Core use-case services.
//!
//! # Responsibility
//! - Turn repository results into caller-facing outcomes: missing rows,
//!   conflicts, bad input, or internal failure.
//! - Keep transport layers decoupled from storage details.

pub mod account_service;
pub mod contact_service;
