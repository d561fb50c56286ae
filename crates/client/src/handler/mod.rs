mod console;

pub use self::console::{ConsoleNavigator, ConsolePresenter};
