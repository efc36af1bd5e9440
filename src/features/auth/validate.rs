//! Local input checks run before any request leaves the client.

use regex::Regex;
use std::fmt;

pub const MIN_USERNAME_CHARS: usize = 3;
pub const MIN_PASSWORD_CHARS: usize = 6;
pub const OTP_CHARS: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    InvalidEmail,
    UsernameTooShort,
    PasswordTooShort,
    PasswordMismatch,
    InvalidOtp,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidEmail => formatter.write_str("Invalid email"),
            ValidationError::UsernameTooShort => write!(
                formatter,
                "Username must be minimum {MIN_USERNAME_CHARS} characters"
            ),
            ValidationError::PasswordTooShort => write!(
                formatter,
                "Password must be minimum {MIN_PASSWORD_CHARS} characters"
            ),
            ValidationError::PasswordMismatch => formatter.write_str("Passwords do not match"),
            ValidationError::InvalidOtp => {
                write!(formatter, "Your otp code must be {OTP_CHARS} characters.")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// # Errors
/// Returns `InvalidEmail` when the value does not look like an address.
pub fn email(value: &str) -> Result<(), ValidationError> {
    let valid = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(value.trim()));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// # Errors
/// Returns `UsernameTooShort` below the minimum length.
pub fn username(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < MIN_USERNAME_CHARS {
        return Err(ValidationError::UsernameTooShort);
    }
    Ok(())
}

/// # Errors
/// Returns `PasswordTooShort` below the minimum length.
pub fn password(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// # Errors
/// Returns the password error first, then `PasswordMismatch`.
pub fn password_confirmation(value: &str, confirmation: &str) -> Result<(), ValidationError> {
    password(value)?;
    if value != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// # Errors
/// Returns `InvalidOtp` unless the code is exactly six characters.
pub fn otp(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() != OTP_CHARS {
        return Err(ValidationError::InvalidOtp);
    }
    Ok(())
}
