//! Client-side input validation.
//!
//! Every check here runs before a request is built, so a failure never
//! reaches the network.

use thiserror::Error;

/// Minimum password length accepted by the backend.
const MIN_PASSWORD_LENGTH: usize = 8;

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 20;

/// Highest recall rating a review can carry (0 = blackout, 5 = perfect).
pub const MAX_REVIEW_RESULT: u8 = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Username must be 3-20 characters and contain only letters, numbers and underscores")]
    InvalidUsername,

    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,

    #[error("Password must contain at least one uppercase letter")]
    PasswordMissingUppercase,

    #[error("Password must contain at least one lowercase letter")]
    PasswordMissingLowercase,

    #[error("Password must contain at least one number")]
    PasswordMissingDigit,

    #[error("Password must contain at least one special character")]
    PasswordMissingSpecial,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Review result must be between 0 and 5, got {0}")]
    ReviewResultOutOfRange(u8),

    #[error("{0} must be at least 1")]
    LimitTooSmall(&'static str),
}

pub type ValidationResult = Result<(), ValidationError>;

/// Check if a field is empty or whitespace only
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn require(field: &'static str, value: &str) -> ValidationResult {
    if is_blank(value) {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

/// Loose `local@domain.tld` check: no whitespace, one `@`, and some dot
/// inside the domain with something on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

pub fn validate_email(email: &str) -> ValidationResult {
    require("Email", email)?;
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn is_valid_username(username: &str) -> bool {
    (MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&username.chars().count())
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn validate_username(username: &str) -> ValidationResult {
    require("Username", username)?;
    if is_valid_username(username) {
        Ok(())
    } else {
        Err(ValidationError::InvalidUsername)
    }
}

/// Reports the first rule the password breaks.
pub fn validate_password(password: &str) -> ValidationResult {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::PasswordMissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ValidationError::PasswordMissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordMissingDigit);
    }
    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::PasswordMissingSpecial);
    }
    Ok(())
}

pub fn validate_password_confirmation(password: &str, confirmation: &str) -> ValidationResult {
    if password == confirmation {
        Ok(())
    } else {
        Err(ValidationError::PasswordMismatch)
    }
}

/// Page sizes and similar counts must ask for at least one item.
pub fn validate_limit(field: &'static str, limit: u32) -> ValidationResult {
    if limit == 0 {
        Err(ValidationError::LimitTooSmall(field))
    } else {
        Ok(())
    }
}

pub fn validate_review_result(result: u8) -> ValidationResult {
    if result <= MAX_REVIEW_RESULT {
        Ok(())
    } else {
        Err(ValidationError::ReviewResultOutOfRange(result))
    }
}
