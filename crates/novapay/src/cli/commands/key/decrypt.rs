//! `novapay key decrypt <PATH>`: remove the passphrase from a private key.

use novapay_core::KeyError;
use novapay_crypto::{decrypt_private_key, KeyMaterial, PemFormat};
use zeroize::Zeroizing;

use super::{ensure_writable, read_key, report, write_private, KeyCommandError};
use crate::cli::args::KeyConvertArgs;
use crate::cli::commands::common::Home;
use crate::cli::passphrase::{read_passphrase, PassphraseError};
use crate::logging::log_key_event;

/// The `novapay key decrypt` command handler.
#[derive(Debug, Clone)]
pub struct DecryptCommand {
    args: KeyConvertArgs,
    home: Home,
}

impl DecryptCommand {
    /// Create a new `DecryptCommand`.
    #[must_use]
    pub const fn new(args: KeyConvertArgs, home: Home) -> Self {
        Self { args, home }
    }

    /// Decrypt the key, prompting for its passphrase.
    ///
    /// # Errors
    ///
    /// See [`KeyCommandError`].
    pub fn run(&self) -> Result<(), KeyCommandError> {
        let material = self.execute(read_passphrase)?;
        report(material.raw_pem(), self.args.output.as_deref());
        Ok(())
    }

    /// Decrypt the key to plain PKCS#8, writing it to `--output` if given.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidKey`] if the key is not encrypted and
    /// [`KeyError::WrongPassphrase`] if the passphrase does not open it.
    pub fn execute<F>(&self, passphrase: F) -> Result<KeyMaterial, KeyCommandError>
    where
        F: FnOnce(&str) -> Result<Zeroizing<String>, PassphraseError>,
    {
        let pem = read_key(&self.args.path)?;
        if !PemFormat::detect(&pem)?.is_encrypted() {
            return Err(KeyError::invalid_key("key is not encrypted").into());
        }
        ensure_writable(self.args.output.as_deref(), self.args.force)?;

        let passphrase = passphrase(&self.home.config()?.keys.passphrase_env)?;
        let material = decrypt_private_key(&pem, &passphrase)?;

        if let Some(path) = &self.args.output {
            tracing::warn!(path = %path.display(), "writing unencrypted private key");
            write_private(path, material.raw_pem(), self.args.force)?;
            log_key_event("decrypt", path, false);
        }
        Ok(material)
    }
}
