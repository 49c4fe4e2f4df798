pub mod notify;
pub mod prompt;

pub use notify::Notifier;
pub use prompt::ConsolePicker;
