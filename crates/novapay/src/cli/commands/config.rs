//! # Config Command
//!
//! ```text
//! novapay config            # Display the effective configuration
//! novapay config path       # Show the configuration file path
//! novapay config init       # Write a commented default config.toml
//! ```

use novapay_core::{Config, ConfigError};

use super::common::Home;
use crate::cli::args::ConfigAction;

// ============================================================================
// ConfigCommandError
// ============================================================================

/// Errors that can occur during config command execution.
#[derive(Debug, thiserror::Error)]
pub enum ConfigCommandError {
    /// `config init` would overwrite an existing file.
    #[error("configuration already exists at {0}; use --force to overwrite")]
    AlreadyInitialized(String),

    /// Loading, serializing or writing the configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ============================================================================
// ConfigCommand
// ============================================================================

/// The `novapay config` command handler.
#[derive(Debug, Clone)]
pub struct ConfigCommand {
    action: Option<ConfigAction>,
    home: Home,
}

impl ConfigCommand {
    /// Create a new `ConfigCommand`; no action means `show`.
    #[must_use]
    pub const fn new(action: Option<ConfigAction>, home: Home) -> Self {
        Self { action, home }
    }

    /// Run the command and print its output.
    ///
    /// # Errors
    ///
    /// See [`ConfigCommandError`].
    pub fn run(&self) -> Result<(), ConfigCommandError> {
        let output = self.execute()?;
        println!("{}", output.trim_end());
        Ok(())
    }

    /// Run the command and return what it would print.
    ///
    /// # Errors
    ///
    /// See [`ConfigCommandError`].
    pub fn execute(&self) -> Result<String, ConfigCommandError> {
        match &self.action {
            None | Some(ConfigAction::Show) => self.show(),
            Some(ConfigAction::Path) => Ok(self.home.loader().config_path().display().to_string()),
            Some(ConfigAction::Init { force }) => self.init(*force),
        }
    }

    fn show(&self) -> Result<String, ConfigCommandError> {
        let config = self.home.config()?;
        format_toml_output(&config)
    }

    fn init(&self, force: bool) -> Result<String, ConfigCommandError> {
        let loader = self.home.loader();
        let path = loader.config_path();
        if loader.exists() && !force {
            return Err(ConfigCommandError::AlreadyInitialized(
                path.display().to_string(),
            ));
        }
        loader.write_default()?;
        tracing::info!(path = %path.display(), "wrote default configuration");
        Ok(format!("Wrote {}", path.display()))
    }
}

fn format_toml_output(config: &Config) -> Result<String, ConfigCommandError> {
    toml::to_string_pretty(config).map_err(|e| {
        ConfigError::parse_failed(format!("failed to serialize configuration: {e}")).into()
    })
}

// ============================================================================
// Tests
// ============================================================================
