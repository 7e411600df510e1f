pub mod badge;
pub mod logging;
pub mod picker;
pub mod settings;
pub mod window;
