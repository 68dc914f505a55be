//! Field rules shared by the lead forms

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[^\s@]+@[^\s@]+\.[^\s@]+$"
    ).unwrap();

    static ref PHONE_REGEX: Regex = Regex::new(
        r"^\+?[0-9\s().-]{6,20}$"
    ).unwrap();
}

pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }

    Ok(())
}

/// Empty input passes; pair with [`validate_required`] when the field is mandatory.
pub fn validate_email_shape(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Ok(());
    }

    if email.len() > 254 || !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::new("email"));
    }

    Ok(())
}

pub fn validate_phone_shape(phone: &str) -> Result<(), ValidationError> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Ok(());
    }

    if !PHONE_REGEX.is_match(phone) {
        return Err(ValidationError::new("phone"));
    }

    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    validate_required(email).is_ok() && validate_email_shape(email).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert!(validate_required("Jane").is_ok());
        assert!(validate_required("").is_err());
        assert!(validate_required("   \t").is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co.za"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane doe@example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(validate_email_shape("").is_ok());
    }

    #[test]
    fn test_phone_shape() {
        assert!(validate_phone_shape("+27 12 345 6789").is_ok());
        assert!(validate_phone_shape("(555) 123-4567").is_ok());
        assert!(validate_phone_shape("").is_ok());
        assert!(validate_phone_shape("call me").is_err());
    }
}
