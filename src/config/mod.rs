//! Configuration: where data lives and the user's display preferences

pub mod paths;
pub mod settings;

pub use paths::ExpensePaths;
pub use settings::Settings;
