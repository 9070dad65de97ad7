//! Error types for the NovaPay signing layer.
//!
//! Errors are organized by domain:
//!
//! - [`KeyError`] - Key loading, generation and passphrase failures
//! - [`SignError`] - Signing operation failures
//! - [`PayloadError`] - Malformed request or callback bodies
//! - [`ConfigError`] - Configuration failures
//! - [`NovaPayError`] - Top-level error that wraps all error types
//!
//! A signature that simply does not match is never an error. Verification
//! returns `false` for that case; the types here are reserved for key
//! material that cannot be used at all.
//!
//! # Example
//!
//! ```rust
//! use novapay_core::error::{KeyError, NovaPayError};
//!
//! fn check_bits(bits: usize) -> Result<(), NovaPayError> {
//!     if bits < 2048 {
//!         return Err(KeyError::weak_key_size(bits, 2048).into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_bits(1024).is_err());
//! ```

/// Result alias using [`NovaPayError`].
pub type Result<T> = std::result::Result<T, NovaPayError>;

/// Top-level error type for the NovaPay signing layer.
#[derive(Debug, thiserror::Error)]
pub enum NovaPayError {
    /// Key material could not be loaded, generated or converted.
    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    /// Signing operation failed.
    #[error("Signing error: {0}")]
    Sign(#[from] SignError),

    /// A request or callback body could not be interpreted as a payload.
    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// ============================================================================
// KeyError
// ============================================================================

/// Errors raised while loading or managing RSA key material.
///
/// `InvalidKey` means the key has to be replaced; `WrongPassphrase` means
/// the passphrase has to be entered again.
/// See [`KeyError::needs_passphrase`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// The input is not a usable RSA key.
    #[error("invalid key: {context}")]
    InvalidKey {
        /// What was wrong with the key.
        context: String,
    },

    /// The key is passphrase-protected and the passphrase was missing or wrong.
    #[error("invalid private key or incorrect passphrase")]
    WrongPassphrase,

    /// Key generation was requested below the minimum modulus size.
    #[error("key size must be at least {minimum} bits, got {bits}")]
    WeakKeySize {
        /// Requested size in bits.
        bits: usize,
        /// Minimum accepted size in bits.
        minimum: usize,
    },

    /// Encryption was requested with an empty passphrase.
    #[error("passphrase cannot be empty")]
    EmptyPassphrase,

    /// A generated passphrase was requested below the minimum length.
    #[error("passphrase must be at least {minimum} characters long, got {length}")]
    PassphraseTooShort {
        /// Requested length.
        length: usize,
        /// Minimum accepted length.
        minimum: usize,
    },

    /// The named symmetric cipher is not supported for key encryption.
    #[error("unsupported key encryption cipher: {name}")]
    UnsupportedCipher {
        /// The cipher name as given by the caller.
        name: String,
    },

    /// Key generation or PEM encoding failed.
    #[error("key encoding failed: {context}")]
    EncodingFailed {
        /// Context about the failure.
        context: String,
    },
}

impl KeyError {
    /// Create an `InvalidKey` error with context.
    #[must_use]
    pub fn invalid_key(context: impl Into<String>) -> Self {
        Self::InvalidKey {
            context: context.into(),
        }
    }

    /// Create a `WeakKeySize` error.
    #[must_use]
    pub const fn weak_key_size(bits: usize, minimum: usize) -> Self {
        Self::WeakKeySize { bits, minimum }
    }

    /// Create a `PassphraseTooShort` error.
    #[must_use]
    pub const fn passphrase_too_short(length: usize, minimum: usize) -> Self {
        Self::PassphraseTooShort { length, minimum }
    }

    /// Create an `UnsupportedCipher` error.
    #[must_use]
    pub fn unsupported_cipher(name: impl Into<String>) -> Self {
        Self::UnsupportedCipher { name: name.into() }
    }

    /// Create an `EncodingFailed` error with context.
    #[must_use]
    pub fn encoding_failed(context: impl Into<String>) -> Self {
        Self::EncodingFailed {
            context: context.into(),
        }
    }

    /// Returns `true` when re-entering the passphrase may fix the failure.
    #[must_use]
    pub const fn needs_passphrase(&self) -> bool {
        matches!(self, Self::WrongPassphrase | Self::EmptyPassphrase)
    }
}

// ============================================================================
// SignError
// ============================================================================

/// Errors that can occur while producing a signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignError {
    /// The private key could not be loaded.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// The RSA operation itself failed. Unexpected with valid key material.
    #[error("failed to create signature: {context}")]
    SigningFailed {
        /// Context about why signing failed.
        context: String,
    },
}

impl SignError {
    /// Create a `SigningFailed` error with context.
    #[must_use]
    pub fn signing_failed(context: impl Into<String>) -> Self {
        Self::SigningFailed {
            context: context.into(),
        }
    }
}

// ============================================================================
// PayloadError
// ============================================================================

/// Errors that can occur when turning a message body into a [`Payload`].
///
/// [`Payload`]: crate::payload::Payload
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// The body is not valid JSON.
    #[error("invalid JSON body: {context}")]
    InvalidJson {
        /// Parser message.
        context: String,
    },

    /// The top-level JSON value is not an object.
    #[error("payload must be a JSON object, got {found}")]
    NotAnObject {
        /// The JSON type that was found instead.
        found: &'static str,
    },
}

impl PayloadError {
    /// Create an `InvalidJson` error with context.
    #[must_use]
    pub fn invalid_json(context: impl Into<String>) -> Self {
        Self::InvalidJson {
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for PayloadError {
    fn from(error: serde_json::Error) -> Self {
        Self::invalid_json(error.to_string())
    }
}

// ============================================================================
// ConfigError
// ============================================================================

/// Errors that can occur while loading configuration or key files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required file does not exist.
    #[error("file not found: {path}")]
    FileNotFound {
        /// The path that was looked up.
        path: String,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration: {message}")]
    ParseFailed {
        /// Parser message.
        message: String,
    },

    /// A configuration value is missing or invalid.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The home directory could not be determined.
    #[error("could not determine home directory")]
    NoHomeDirectory,

    /// File system I/O error.
    #[error("{context}: {source}")]
    Io {
        /// What was being done when the error occurred.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create a `FileNotFound` error.
    #[must_use]
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a `ParseFailed` error.
    #[must_use]
    pub fn parse_failed(message: impl Into<String>) -> Self {
        Self::ParseFailed {
            message: message.into(),
        }
    }

    /// Create an `InvalidValue` error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a `NoHomeDirectory` error.
    #[must_use]
    pub const fn no_home_directory() -> Self {
        Self::NoHomeDirectory
    }

    /// Create an `Io` error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
