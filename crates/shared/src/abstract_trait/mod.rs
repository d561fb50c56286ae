pub mod account;
pub mod navigation;
pub mod postal;

pub use self::account::{AccountServiceTrait, DynAccountService};
pub use self::navigation::{DynNavigator, NavigatorTrait};
pub use self::postal::{DynPostalLookup, PostalLookupTrait};
