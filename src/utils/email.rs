use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DataError, DataResult};

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Trims and lowercases an address, then checks it looks like `local@domain.tld`.
pub fn normalize_email(input: &str) -> DataResult<String> {
    let email = input.trim().to_lowercase();
    if EMAIL.is_match(&email) {
        Ok(email)
    } else {
        Err(DataError::InvalidEmail(input.trim().to_string()))
    }
}
