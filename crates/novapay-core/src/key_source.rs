//! Resolution of configured key locations.
//!
//! A key setting holds either the PEM text itself or a path to a file with
//! the PEM text. Inline text is recognised by its PEM boundary line, so a
//! key pasted straight into an environment variable or TOML string works
//! the same as a key on disk.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use zeroize::Zeroizing;

use crate::config_loader::expand_path;
use crate::error::ConfigError;

const PEM_BOUNDARY: &str = "-----BEGIN ";

/// Where a key's PEM text comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum KeySource {
    /// PEM text given directly.
    Inline(Zeroizing<String>),
    /// A file containing PEM text.
    File(PathBuf),
}

impl KeySource {
    /// Classify a configured value as inline PEM or a path.
    ///
    /// Paths starting with `~` are expanded when the key is read.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.contains(PEM_BOUNDARY) {
            Self::Inline(Zeroizing::new(value.to_string()))
        } else {
            Self::File(PathBuf::from(value.trim()))
        }
    }

    /// Read the PEM text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] if the file does not exist,
    /// [`ConfigError::NoHomeDirectory`] if `~` cannot be expanded, and
    /// [`ConfigError::Io`] for other read failures.
    pub fn read(&self) -> Result<Zeroizing<String>, ConfigError> {
        match self {
            Self::Inline(pem) => Ok(pem.clone()),
            Self::File(path) => {
                let path = expand_path(&path.to_string_lossy())?;
                if !path.exists() {
                    return Err(ConfigError::file_not_found(path.display().to_string()));
                }
                tracing::debug!(path = %path.display(), "reading key file");
                fs::read_to_string(&path)
                    .map(Zeroizing::new)
                    .map_err(|e| ConfigError::io(format!("failed to read {}", path.display()), e))
            }
        }
    }
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(_) => f.write_str("Inline([REDACTED])"),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}
