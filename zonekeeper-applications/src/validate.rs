//! Field validators
//!
//! Input shape checks that run before any storage call. A rejection here
//! never leaves partial state behind.

use regex::Regex;
use std::sync::LazyLock;
use zonekeeper_core::{ZonekeeperError, ZonekeeperResult};

const COMPONENT: &str = "validate";

/// Minimum lengths for name-like fields
pub const MIN_USERNAME_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 8;

/// localpart@domain.tld: word characters with dot/hyphen separators and a
/// 2-3+ character final label
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("email regex is valid")
});

/// Reject an email that does not match the expected shape
pub fn check_email_format(email: &str) -> ZonekeeperResult<()> {
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(ZonekeeperError::validation(
            "Invalid email address format",
            Some("email"),
            COMPONENT,
        ))
    }
}

/// Reject a name-like field shorter than the given minimum
pub fn check_name_field(field: &str, value: &str, min_len: usize) -> ZonekeeperResult<()> {
    if value.chars().count() < min_len {
        return Err(ZonekeeperError::validation(
            format!(
                "Invalid {} format, minimum {} characters required",
                field, min_len
            ),
            Some(field),
            COMPONENT,
        ));
    }
    Ok(())
}

/// Reject a password shorter than the minimum, before hashing
pub fn check_password_field(password: &str) -> ZonekeeperResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ZonekeeperError::validation(
            format!(
                "Invalid password format, minimum {} characters required",
                MIN_PASSWORD_LEN
            ),
            Some("password"),
            COMPONENT,
        ));
    }
    Ok(())
}
