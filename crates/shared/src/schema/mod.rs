mod clock;
mod field_errors;
mod registration;
pub mod rules;

pub use self::clock::{Clock, DynClock, FixedClock, SystemClock};
pub use self::field_errors::FieldErrors;
pub use self::registration::{MINIMUM_AGE_YEARS, Refinement, RegistrationSchema, age_threshold};
