//! Zonekeeper Applications - the authorization core
//!
//! This crate holds everything between the HTTP surface and SQLite:
//! the closed permission model, the permission evaluator, the credential
//! store, and the resource operations that tie them together. Callers pass
//! their claims explicitly into every operation; nothing here reads ambient
//! request state.

pub mod auth;
pub mod operations;
pub mod storage;
pub mod validate;

pub use auth::evaluator::{self, ListingScope};
pub use auth::permissions::{Axis, Permission, Tier};
pub use auth::CallerClaims;
pub use storage::models::{Role, TimezoneEntry, UserAccount, UserTimezone};
pub use storage::CredentialStore;
