pub mod register;

pub use self::register::{AddressRequest, Gender, RegisterField, RegisterRequest};
