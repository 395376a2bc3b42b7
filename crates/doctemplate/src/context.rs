//! Global context for CLI commands

use anyhow::{Context as _, Result};
use doctemplate_core::config::{Config, Locale};
use std::env;

/// Configuration shared by all commands
pub struct Context {
    pub config: Config,
    pub locale: Locale,
    pub verbose: bool,
}

impl Context {
    /// Load `doctemplate.toml` from the working directory, or defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read, parsed or validated
    pub fn new(verbose: bool) -> Result<Self> {
        let current_dir = env::current_dir().context("Failed to determine working directory")?;
        let config = Config::load_or_default(&current_dir)?;
        let locale = config.locale()?;

        tracing::debug!(locale = locale.tag(), "loaded configuration");

        Ok(Self {
            config,
            locale,
            verbose,
        })
    }
}
