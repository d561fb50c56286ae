use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use validator::Validate;

use crate::schema::rules::{
    validate_full_name, validate_national_id, validate_phone, validate_state, validate_zip_code,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "M" | "m" => Ok(Gender::M),
            "F" | "f" => Ok(Gender::F),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::M => write!(f, "M"),
            Gender::F => write!(f, "F"),
        }
    }
}

/// The record collected by the registration form and posted to the
/// account-creation endpoint.
///
/// Every field holds raw user input. On the wire the name, national id and
/// phone go out as `name`, `cpf` and `cel`; validation paths keep the field
/// names (`fullName`, `nationalId`, `phone`). Per-field rules are declared here;
/// the age and password-match rules live in [`crate::schema::RegistrationSchema`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Full name must be between 3 and 50 characters"
    ))]
    #[validate(custom(function = "validate_full_name"))]
    #[serde(rename = "name")]
    pub full_name: String,

    #[serde(default)]
    pub social_name: Option<String>,

    #[validate(email(message = "Enter a valid email address"))]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(
        min = 6,
        message = "Password confirmation must be at least 6 characters"
    ))]
    pub confirm_password: String,

    #[validate(length(equal = 11, message = "National id must have 11 characters"))]
    #[validate(custom(function = "validate_national_id"))]
    #[serde(rename = "cpf")]
    pub national_id: String,

    #[validate(required(message = "Select a gender"))]
    pub gender: Option<Gender>,

    pub birth_date: String,

    #[validate(length(equal = 11, message = "Phone must have 11 characters"))]
    #[validate(custom(function = "validate_phone"))]
    #[serde(rename = "cel")]
    pub phone: String,

    #[validate(nested)]
    pub address: AddressRequest,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    #[validate(length(min = 1, message = "Street is required"))]
    pub street: String,

    #[validate(length(min = 1, message = "Number is required"))]
    pub number: String,

    #[serde(default)]
    pub complement: Option<String>,

    #[validate(length(min = 3, message = "Neighborhood is required"))]
    pub neighborhood: String,

    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,

    #[validate(custom(function = "validate_state"))]
    pub state: String,

    #[validate(length(equal = 8, message = "Zip code must have 8 characters"))]
    #[validate(custom(function = "validate_zip_code"))]
    pub zip_code: String,
}

/// One editable input of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterField {
    FullName,
    SocialName,
    Email,
    Password,
    ConfirmPassword,
    NationalId,
    Gender,
    BirthDate,
    Phone,
    Street,
    Number,
    Complement,
    Neighborhood,
    City,
    State,
    ZipCode,
}

impl RegisterField {
    pub const ALL: [RegisterField; 16] = [
        RegisterField::FullName,
        RegisterField::SocialName,
        RegisterField::Email,
        RegisterField::Password,
        RegisterField::ConfirmPassword,
        RegisterField::NationalId,
        RegisterField::Gender,
        RegisterField::BirthDate,
        RegisterField::Phone,
        RegisterField::Street,
        RegisterField::Number,
        RegisterField::Complement,
        RegisterField::Neighborhood,
        RegisterField::City,
        RegisterField::State,
        RegisterField::ZipCode,
    ];

    /// Dotted path used as the key of validation errors.
    pub fn path(&self) -> &'static str {
        match self {
            RegisterField::FullName => "fullName",
            RegisterField::SocialName => "socialName",
            RegisterField::Email => "email",
            RegisterField::Password => "password",
            RegisterField::ConfirmPassword => "confirmPassword",
            RegisterField::NationalId => "nationalId",
            RegisterField::Gender => "gender",
            RegisterField::BirthDate => "birthDate",
            RegisterField::Phone => "phone",
            RegisterField::Street => "address.street",
            RegisterField::Number => "address.number",
            RegisterField::Complement => "address.complement",
            RegisterField::Neighborhood => "address.neighborhood",
            RegisterField::City => "address.city",
            RegisterField::State => "address.state",
            RegisterField::ZipCode => "address.zipCode",
        }
    }

    /// Whether a value of this field must never reach the logs.
    pub fn is_sensitive(&self) -> bool {
        matches!(
            self,
            RegisterField::Password | RegisterField::ConfirmPassword | RegisterField::NationalId
        )
    }
}

impl fmt::Display for RegisterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

fn optional(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

impl RegisterRequest {
    /// Writes raw input into one field, the way a form input handler does.
    ///
    /// Gender input that is neither `M` nor `F` clears the selection.
    pub fn set(&mut self, field: RegisterField, value: impl Into<String>) {
        let value = value.into();
        match field {
            RegisterField::FullName => self.full_name = value,
            RegisterField::SocialName => self.social_name = optional(value),
            RegisterField::Email => self.email = value,
            RegisterField::Password => self.password = value,
            RegisterField::ConfirmPassword => self.confirm_password = value,
            RegisterField::NationalId => self.national_id = value,
            RegisterField::Gender => self.gender = value.parse().ok(),
            RegisterField::BirthDate => self.birth_date = value,
            RegisterField::Phone => self.phone = value,
            RegisterField::Street => self.address.street = value,
            RegisterField::Number => self.address.number = value,
            RegisterField::Complement => self.address.complement = optional(value),
            RegisterField::Neighborhood => self.address.neighborhood = value,
            RegisterField::City => self.address.city = value,
            RegisterField::State => self.address.state = value,
            RegisterField::ZipCode => self.address.zip_code = value,
        }
    }

    pub fn get(&self, field: RegisterField) -> String {
        match field {
            RegisterField::FullName => self.full_name.clone(),
            RegisterField::SocialName => self.social_name.clone().unwrap_or_default(),
            RegisterField::Email => self.email.clone(),
            RegisterField::Password => self.password.clone(),
            RegisterField::ConfirmPassword => self.confirm_password.clone(),
            RegisterField::NationalId => self.national_id.clone(),
            RegisterField::Gender => self.gender.map(|g| g.to_string()).unwrap_or_default(),
            RegisterField::BirthDate => self.birth_date.clone(),
            RegisterField::Phone => self.phone.clone(),
            RegisterField::Street => self.address.street.clone(),
            RegisterField::Number => self.address.number.clone(),
            RegisterField::Complement => self.address.complement.clone().unwrap_or_default(),
            RegisterField::Neighborhood => self.address.neighborhood.clone(),
            RegisterField::City => self.address.city.clone(),
            RegisterField::State => self.address.state.clone(),
            RegisterField::ZipCode => self.address.zip_code.clone(),
        }
    }

    /// Every field paired with its current raw value, in form order.
    pub fn fields(&self) -> Vec<(RegisterField, String)> {
        RegisterField::ALL
            .iter()
            .map(|field| (*field, self.get(*field)))
            .collect()
    }
}
