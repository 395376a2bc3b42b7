//! Configuration - optional `doctemplate.toml` and locale conventions

pub mod locale;
pub mod model;

pub use locale::Locale;
pub use model::{CacheConfig, Config, LocaleConfig, OutputConfig, CONFIG_FILE_NAME};
