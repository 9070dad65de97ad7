//! # Verify Command
//!
//! `novapay verify <JSON_FILE> --signature SIG` checks a signature over a
//! JSON body, by default against the gateway public key from the
//! configuration. A mismatch is a normal outcome, not an error; `main`
//! turns it into exit status 1.

use std::io;
use std::path::PathBuf;

use novapay_core::{ConfigError, KeyError, KeySource, Payload, PayloadError};
use novapay_crypto::{KeyMaterial, KeyRole, PayloadVerifier, Signature};

use super::common::{read_input, Home};

/// Errors that prevent a verification from being performed.
#[derive(Debug, thiserror::Error)]
pub enum VerifyCommandError {
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

    /// The public key could not be located.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The key could not be loaded.
    #[error(transparent)]
    Key(#[from] KeyError),
}

/// The `novapay verify` command handler.
#[derive(Debug, Clone)]
pub struct VerifyCommand {
    file: PathBuf,
    signature: String,
    public_key: Option<PathBuf>,
    home: Home,
}

impl VerifyCommand {
    /// Create a new `VerifyCommand`.
    #[must_use]
    pub const fn new(
        file: PathBuf,
        signature: String,
        public_key: Option<PathBuf>,
        home: Home,
    ) -> Self {
        Self {
            file,
            signature,
            public_key,
            home,
        }
    }

    /// Verify and report the outcome; returns whether the signature matched.
    ///
    /// # Errors
    ///
    /// See [`VerifyCommandError`].
    pub fn run(&self) -> Result<bool, VerifyCommandError> {
        let valid = self.execute()?;
        if valid {
            println!("Signature OK");
        } else {
            println!("Signature does not match");
        }
        Ok(valid)
    }

    /// Verify the signature.
    ///
    /// An unencrypted private key is accepted in place of a public key.
    ///
    /// # Errors
    ///
    /// See [`VerifyCommandError`].
    pub fn execute(&self) -> Result<bool, VerifyCommandError> {
        let body = read_input(&self.file).map_err(|source| VerifyCommandError::Input {
            path: self.file.clone(),
            source,
        })?;
        let payload = Payload::from_json_slice(&body)?;

        let source = match &self.public_key {
            Some(path) => KeySource::File(path.clone()),
            None => self.home.config()?.keys.gateway_public_key_source(),
        };
        let material = KeyMaterial::load(&source.read()?, None)?;
        let material = match material.role() {
            KeyRole::Public => material,
            KeyRole::Private => material.to_public()?,
        };

        let verifier = PayloadVerifier::new(material)?;
        let valid = verifier.verify(&payload, &Signature::from(self.signature.trim()));
        if !valid {
            tracing::warn!(file = %self.file.display(), "signature rejected");
        }
        Ok(valid)
    }
}
