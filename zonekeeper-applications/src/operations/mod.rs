//! Resource operations
//!
//! The use-case layer. Every operation follows the same template: gate on
//! the caller's enabled flag, resolve the required permission, invoke the
//! evaluator, validate fields, then perform the storage call with conflicts
//! and faults mapped into the domain taxonomy.

pub mod auth;
pub mod roles;
pub mod timezones;
pub mod users;
