//! # Sign Command
//!
//! `novapay sign <JSON_FILE>` prints the base64 signature that goes into the
//! `x-sign` header for the given request body.
//!
//! ```text
//! novapay sign order.json
//! novapay sign --key shop_private.pem order.json
//! cat order.json | novapay sign -
//! ```

use std::io;
use std::path::PathBuf;

use novapay_core::{ConfigError, KeyError, KeySource, Payload, PayloadError, SignError};
use novapay_crypto::{PayloadSigner, PemFormat, Signature};
use zeroize::Zeroizing;

use super::common::{read_input, Home};
use crate::cli::passphrase::{read_passphrase, PassphraseError};
use crate::logging::redact_sensitive;

/// Errors that can occur while signing a body.
#[derive(Debug, thiserror::Error)]
pub enum SignCommandError {
    /// The body could not be read.
    #[error("failed to read {path}: {source}")]
    Input {
        /// Body path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The body is not a JSON object.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// The private key could not be located.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The private key could not be loaded.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// The signing operation failed.
    #[error(transparent)]
    Sign(#[from] SignError),

    /// Passphrase input failed.
    #[error(transparent)]
    Passphrase(#[from] PassphraseError),
}

/// The `novapay sign` command handler.
#[derive(Debug, Clone)]
pub struct SignCommand {
    file: PathBuf,
    key: Option<PathBuf>,
    home: Home,
}

impl SignCommand {
    /// Create a new `SignCommand`.
    #[must_use]
    pub const fn new(file: PathBuf, key: Option<PathBuf>, home: Home) -> Self {
        Self { file, key, home }
    }

    /// Sign the body and print the signature on stdout.
    ///
    /// # Errors
    ///
    /// See [`SignCommandError`].
    pub fn run(&self) -> Result<(), SignCommandError> {
        let signature = self.execute(read_passphrase)?;
        println!("{signature}");
        Ok(())
    }

    /// Sign the body.
    ///
    /// `passphrase` is called with the configured variable name only when
    /// the private key is encrypted.
    ///
    /// # Errors
    ///
    /// See [`SignCommandError`].
    pub fn execute<F>(&self, passphrase: F) -> Result<Signature, SignCommandError>
    where
        F: FnOnce(&str) -> Result<Zeroizing<String>, PassphraseError>,
    {
        let body = read_input(&self.file).map_err(|source| SignCommandError::Input {
            path: self.file.clone(),
            source,
        })?;
        let payload = Payload::from_json_slice(&body)?;

        let config = self.home.config()?;
        let source = self
            .key
            .clone()
            .map_or_else(|| config.keys.private_key_source(), KeySource::File);
        let pem = source.read()?;

        let passphrase = if PemFormat::detect(&pem)?.is_encrypted() {
            Some(passphrase(&config.keys.passphrase_env)?)
        } else {
            None
        };

        let signer = PayloadSigner::from_pem(&pem, passphrase.as_ref().map(|p| p.as_str()))?;
        let signature = signer.sign(&payload)?;
        tracing::debug!(
            fields = payload.len(),
            signature = %redact_sensitive(signature.as_str()),
            "request body signed"
        );
        Ok(signature)
    }
}
