pub mod account;
pub mod postal;

pub use self::account::{AccountReply, CreateAccountResponse};
pub use self::postal::{PostalAddress, PostalCodeResponse};
