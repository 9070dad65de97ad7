//! # Passphrase Input
//!
//! Private key passphrases are read from an environment variable
//! (`NOVAPAY_PASSPHRASE` unless `keys.passphrase_env` names another) or,
//! when that is unset, from a hidden terminal prompt. The variable is
//! removed from the process environment as soon as it has been read.
//!
//! Prompts are written to the terminal rather than stdout so that
//! `novapay sign` and `novapay key decrypt` output stays pipeable.
//!
//! ```bash
//! NOVAPAY_PASSPHRASE=... novapay sign order.json
//! ```

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// Default environment variable for non-interactive passphrase input.
pub const ENV_VAR: &str = "NOVAPAY_PASSPHRASE";

/// Minimum length of a passphrase chosen by the user for a new key.
pub const MIN_PASSPHRASE_LENGTH: usize = 8;

/// Errors that can occur during passphrase input.
#[derive(Debug, thiserror::Error)]
pub enum PassphraseError {
    /// The environment variable was set but empty.
    #[error("passphrase cannot be empty")]
    Empty,

    /// A new passphrase is shorter than [`MIN_PASSPHRASE_LENGTH`].
    #[error("passphrase must be at least {min} characters")]
    TooShort {
        /// Minimum required length.
        min: usize,
    },

    /// Confirmation did not match.
    #[error("passphrases do not match")]
    Mismatch,

    /// The prompt was closed or answered with nothing.
    #[error("passphrase input cancelled")]
    Cancelled,

    /// Terminal I/O failed.
    #[error("failed to read passphrase: {0}")]
    Io(#[from] std::io::Error),
}

/// Read the passphrase that unlocks an existing key.
///
/// # Errors
///
/// Returns [`PassphraseError::Empty`] for an empty variable and
/// [`PassphraseError::Cancelled`] or [`PassphraseError::Io`] when the prompt
/// fails.
pub fn read_passphrase(env_var: &str) -> Result<Zeroizing<String>, PassphraseError> {
    if let Some(value) = take_env_var(env_var) {
        if value.is_empty() {
            return Err(PassphraseError::Empty);
        }
        tracing::debug!(env_var, "passphrase taken from environment");
        return Ok(value);
    }

    let passphrase = prompt("Enter passphrase for private key: ")?;
    if passphrase.is_empty() {
        return Err(PassphraseError::Cancelled);
    }
    Ok(passphrase)
}

/// Read a passphrase for protecting a new or re-encrypted key.
///
/// The environment path skips confirmation; the interactive path asks twice
/// and compares the answers in constant time.
///
/// # Errors
///
/// Returns [`PassphraseError::TooShort`] below [`MIN_PASSPHRASE_LENGTH`],
/// [`PassphraseError::Mismatch`] if the confirmation differs, and the
/// [`read_passphrase`] errors otherwise.
pub fn read_new_passphrase(env_var: &str) -> Result<Zeroizing<String>, PassphraseError> {
    if let Some(value) = take_env_var(env_var) {
        check_new_passphrase(&value)?;
        tracing::debug!(env_var, "new passphrase taken from environment");
        return Ok(value);
    }

    let passphrase = prompt("Enter a passphrase to encrypt the private key: ")?;
    if passphrase.is_empty() {
        return Err(PassphraseError::Cancelled);
    }
    check_new_passphrase(&passphrase)?;

    let confirmation = prompt("Confirm passphrase: ")?;
    if !passphrases_match(&passphrase, &confirmation) {
        return Err(PassphraseError::Mismatch);
    }
    Ok(passphrase)
}

fn check_new_passphrase(passphrase: &str) -> Result<(), PassphraseError> {
    if passphrase.is_empty() {
        return Err(PassphraseError::Empty);
    }
    if passphrase.chars().count() < MIN_PASSPHRASE_LENGTH {
        return Err(PassphraseError::TooShort {
            min: MIN_PASSPHRASE_LENGTH,
        });
    }
    Ok(())
}

fn passphrases_match(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn prompt(message: &str) -> Result<Zeroizing<String>, PassphraseError> {
    rpassword::prompt_password(message)
        .map(Zeroizing::new)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                PassphraseError::Cancelled
            } else {
                PassphraseError::Io(e)
            }
        })
}

/// Read and remove `var` from the environment.
///
/// Child processes no longer inherit it; `/proc/<pid>/environ` still shows
/// the initial environment on Linux.
fn take_env_var(var: &str) -> Option<Zeroizing<String>> {
    let value = std::env::var(var).ok().map(Zeroizing::new);
    if value.is_some() {
        std::env::remove_var(var);
    }
    value
}
