//! Email address validation shared by sellers and report requests.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DomainError, DomainResult};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").expect("valid email regex")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Validate an email address, returning it unchanged on success.
pub fn validate_email(value: &str) -> DomainResult<&str> {
    if is_valid_email(value) {
        Ok(value)
    } else {
        Err(DomainError::validation("Invalid email format"))
    }
}
