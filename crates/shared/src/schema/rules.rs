use regex::Regex;
use std::sync::LazyLock;
use validator::ValidationError;

pub const NATIONAL_ID_LEN: usize = 11;
pub const PHONE_LEN: usize = 11;
pub const ZIP_CODE_LEN: usize = 8;

/// Brazilian federative unit codes accepted in `address.state`.
pub const STATES: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB", "PR",
    "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-zÀ-ÖØ-öø-ÿ\s]+$").expect("name pattern is a valid regex")
});

static DIGITS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("digits pattern is a valid regex"));

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

pub fn is_digits(value: &str) -> bool {
    DIGITS_REGEX.is_match(value)
}

pub fn validate_full_name(value: &str) -> Result<(), ValidationError> {
    if !NAME_REGEX.is_match(value) {
        return Err(error(
            "invalid_name",
            "Full name must not contain numbers or special characters",
        ));
    }
    Ok(())
}

pub fn validate_national_id(value: &str) -> Result<(), ValidationError> {
    if !is_digits(value) {
        return Err(error("digits_only", "National id must contain only digits"));
    }
    Ok(())
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if !is_digits(value) {
        return Err(error("digits_only", "Phone must contain only digits"));
    }
    Ok(())
}

pub fn validate_zip_code(value: &str) -> Result<(), ValidationError> {
    if !is_digits(value) {
        return Err(error("digits_only", "Zip code must contain only digits"));
    }
    Ok(())
}

pub fn validate_state(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(error("required", "State is required"));
    }
    if !STATES.contains(&value) {
        return Err(error("invalid_state", "Select a valid state"));
    }
    Ok(())
}
