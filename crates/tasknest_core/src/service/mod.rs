//! Core use-case services.
//!
//! # Responsibility
//! - Apply use-case rules (validation, ownership, ordering, aggregation) on
//!   top of repository contracts.
//! - Stay storage-agnostic: every service is generic over its repositories.
//!
//! # Invariants
//! - Services receive an already-resolved caller; they never consult the
//!   identity provider themselves.
//! - Missing and foreign records surface identically as
//!   `ServiceError::NotFoundOrForbidden`.

pub mod category_service;
pub mod error;
pub mod query_service;
pub mod stats_service;
pub mod todo_service;
