use chrono::{Months, NaiveDate};
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

use crate::{
    domain::request::RegisterRequest,
    schema::{
        clock::{DynClock, SystemClock},
        field_errors::FieldErrors,
    },
};

pub const MINIMUM_AGE_YEARS: u32 = 18;

/// A whole-record rule. Receives the record and the date the validation
/// runs on, and names the failing path when the rule does not hold.
pub type Refinement = fn(&RegisterRequest, NaiveDate) -> Option<(&'static str, &'static str)>;

/// Validator for [`RegisterRequest`].
///
/// Runs every per-field rule declared on the record, then the refinements
/// in order. All failures are collected; nothing short-circuits. The
/// password match is always the last refinement.
#[derive(Clone)]
pub struct RegistrationSchema {
    clock: DynClock,
    refinements: Vec<Refinement>,
}

impl std::fmt::Debug for RegistrationSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationSchema")
            .field("clock", &"DynClock")
            .field("refinements", &self.refinements.len())
            .finish()
    }
}

impl Default for RegistrationSchema {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl RegistrationSchema {
    pub fn new(clock: DynClock) -> Self {
        Self {
            clock,
            refinements: vec![minimum_age, passwords_match],
        }
    }

    pub fn validate(&self, record: &RegisterRequest) -> FieldErrors {
        let mut errors = match record.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(&e),
        };

        let today = self.clock.today();
        for refine in &self.refinements {
            if let Some((path, message)) = refine(record, today) {
                errors.add(path, message);
            }
        }

        debug!(
            "Validated registration record: {} failing field(s)",
            errors.len()
        );

        errors
    }

    pub fn is_submittable(&self, record: &RegisterRequest) -> bool {
        self.validate(record).is_empty()
    }
}

/// `today` minus the minimum age. A birth date is taken as the start of its
/// day, which precedes the current instant, so the threshold day itself
/// passes.
pub fn age_threshold(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(MINIMUM_AGE_YEARS * 12))
        .unwrap_or(NaiveDate::MIN)
}

fn minimum_age(record: &RegisterRequest, today: NaiveDate) -> Option<(&'static str, &'static str)> {
    let raw = record.birth_date.trim();
    if raw.is_empty() {
        return Some(("birthDate", "Birth date is required"));
    }

    match raw.parse::<NaiveDate>() {
        Ok(date) if date <= age_threshold(today) => None,
        Ok(_) => Some(("birthDate", "You must be at least 18 years old")),
        Err(_) => Some(("birthDate", "Enter a valid birth date")),
    }
}

fn passwords_match(
    record: &RegisterRequest,
    _today: NaiveDate,
) -> Option<(&'static str, &'static str)> {
    if record.password != record.confirm_password {
        return Some(("confirmPassword", "Passwords do not match"));
    }
    None
}
