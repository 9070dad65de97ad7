//! `novapay key encrypt <PATH>`: wrap a plain private key in a PBES2
//! (PBKDF2-SHA256 + AES-CBC) encrypted PKCS#8 envelope.

use novapay_core::KeyError;
use novapay_crypto::{encrypt_private_key, KeyMaterial, PemFormat};
use zeroize::Zeroizing;

use super::{ensure_writable, read_key, report, write_private, KeyCommandError};
use crate::cli::args::KeyEncryptArgs;
use crate::cli::commands::common::Home;
use crate::cli::passphrase::{read_new_passphrase, PassphraseError};
use crate::logging::log_key_event;

/// The `novapay key encrypt` command handler.
#[derive(Debug, Clone)]
pub struct EncryptCommand {
    args: KeyEncryptArgs,
    home: Home,
}

impl EncryptCommand {
    /// Create a new `EncryptCommand`.
    #[must_use]
    pub const fn new(args: KeyEncryptArgs, home: Home) -> Self {
        Self { args, home }
    }

    /// Encrypt the key, prompting for a new passphrase.
    ///
    /// # Errors
    ///
    /// See [`KeyCommandError`].
    pub fn run(&self) -> Result<(), KeyCommandError> {
        let material = self.execute(read_new_passphrase)?;
        report(material.raw_pem(), self.args.target.output.as_deref());
        Ok(())
    }

    /// Encrypt the key and write it to `--output` if one was given.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidKey`] for keys that are already encrypted,
    /// checked before any passphrase is requested.
    pub fn execute<F>(&self, new_passphrase: F) -> Result<KeyMaterial, KeyCommandError>
    where
        F: FnOnce(&str) -> Result<Zeroizing<String>, PassphraseError>,
    {
        let target = &self.args.target;
        let pem = read_key(&target.path)?;
        if PemFormat::detect(&pem)?.is_encrypted() {
            return Err(KeyError::invalid_key("key is already encrypted; decrypt it first").into());
        }
        ensure_writable(target.output.as_deref(), target.force)?;

        let passphrase = new_passphrase(&self.home.config()?.keys.passphrase_env)?;
        let material = encrypt_private_key(&pem, &passphrase, self.args.cipher)?;

        if let Some(path) = &target.output {
            write_private(path, material.raw_pem(), target.force)?;
            log_key_event("encrypt", path, true);
        }
        Ok(material)
    }
}
