//! Domain model for owner-scoped todos and categories.
//!
//! # Responsibility
//! - Define the records the stores persist and the query layer returns.
//! - Keep field-level validation next to the data it guards.
//!
//! # Invariants
//! - Every todo and category belongs to exactly one `UserId`.
//! - Identifiers are assigned by the store and never reused.

pub mod category;
pub mod todo;
pub mod user;
