//! `novapay key check <PATH>`: confirm a private key can sign.

use std::path::PathBuf;

use novapay_core::{KeyError, Payload};
use novapay_crypto::{KeyRole, PayloadSigner, PemFormat, MIN_KEY_BITS};
use zeroize::Zeroizing;

use super::{read_key, KeyCommandError};
use crate::cli::commands::common::Home;
use crate::cli::passphrase::{read_passphrase, PassphraseError};

/// The `novapay key check` command handler.
#[derive(Debug, Clone)]
pub struct CheckCommand {
    path: PathBuf,
    home: Home,
}

impl CheckCommand {
    /// Create a new `CheckCommand`.
    #[must_use]
    pub const fn new(path: PathBuf, home: Home) -> Self {
        Self { path, home }
    }

    /// Check the key and print the verdict; returns whether it is usable.
    ///
    /// # Errors
    ///
    /// See [`CheckCommand::execute`].
    pub fn run(&self) -> Result<bool, KeyCommandError> {
        let usable = self.execute(read_passphrase)?;
        if usable {
            println!("Private key OK");
        } else {
            println!("Private key is not usable (invalid key or incorrect passphrase)");
        }
        Ok(usable)
    }

    /// Load the key and sign a sample payload, verifying the result with the
    /// derived public key.
    ///
    /// A key that fails to load or to sign is reported as `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidKey`] for a public key or a file without a
    /// recognizable PEM key, and [`KeyCommandError::Passphrase`] if the
    /// passphrase cannot be read.
    pub fn execute<F>(&self, passphrase: F) -> Result<bool, KeyCommandError>
    where
        F: FnOnce(&str) -> Result<Zeroizing<String>, PassphraseError>,
    {
        let pem = read_key(&self.path)?;
        let format = PemFormat::detect(&pem)?;
        if format.role() == KeyRole::Public {
            return Err(KeyError::invalid_key("expected a private key, found a public key").into());
        }

        let passphrase = if format.is_encrypted() {
            Some(passphrase(&self.home.config()?.keys.passphrase_env)?)
        } else {
            None
        };

        let signer = match PayloadSigner::from_pem(&pem, passphrase.as_ref().map(|p| p.as_str())) {
            Ok(signer) => signer,
            Err(error) => {
                tracing::debug!(%error, "private key failed to load");
                return Ok(false);
            }
        };

        let bits = signer.material().bits();
        if bits < MIN_KEY_BITS {
            tracing::warn!(bits, minimum = MIN_KEY_BITS, "private key is below the recommended size");
        }

        let sample = Payload::new().with("check", "novapay");
        let verified = match (signer.sign(&sample), signer.verifier()) {
            (Ok(signature), Ok(verifier)) => verifier.verify(&sample, &signature),
            _ => false,
        };
        Ok(verified)
    }
}
