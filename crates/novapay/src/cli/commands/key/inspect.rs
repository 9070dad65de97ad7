//! `novapay key inspect <PATH>`: report what a PEM file holds.

use std::fmt;
use std::path::PathBuf;

use novapay_crypto::{key_info, KeyMaterial, KeyRole, PemFormat, KEY_ALGORITHM};
use zeroize::Zeroizing;

use super::{read_key, KeyCommandError};
use crate::cli::commands::common::Home;
use crate::cli::passphrase::{read_passphrase, PassphraseError};

/// What `inspect` found in a key file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReport {
    /// Private or public.
    pub role: KeyRole,
    /// PEM encoding.
    pub format: PemFormat,
    /// Modulus size.
    pub bits: usize,
    /// Always RSA.
    pub algorithm: &'static str,
    /// Whether the key is passphrase-protected.
    pub encrypted: bool,
}

impl fmt::Display for KeyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Type:      {} key", self.role)?;
        writeln!(f, "Algorithm: {}", self.algorithm)?;
        writeln!(f, "Bits:      {}", self.bits)?;
        writeln!(f, "Format:    {}", format_name(self.format))?;
        write!(f, "Encrypted: {}", if self.encrypted { "yes" } else { "no" })
    }
}

const fn format_name(format: PemFormat) -> &'static str {
    match format {
        PemFormat::Pkcs8 => "PKCS#8",
        PemFormat::Pkcs1 => "PKCS#1",
        PemFormat::EncryptedPkcs8 => "PKCS#8 (PBES2 encrypted)",
        PemFormat::LegacyEncryptedPkcs1 => "PKCS#1 (legacy OpenSSL encryption)",
        PemFormat::Spki => "SubjectPublicKeyInfo",
        PemFormat::Pkcs1Public => "PKCS#1 public key",
    }
}

/// The `novapay key inspect` command handler.
#[derive(Debug, Clone)]
pub struct InspectCommand {
    path: PathBuf,
    home: Home,
}

impl InspectCommand {
    /// Create a new `InspectCommand`.
    #[must_use]
    pub const fn new(path: PathBuf, home: Home) -> Self {
        Self { path, home }
    }

    /// Inspect the key and print the report.
    ///
    /// # Errors
    ///
    /// See [`KeyCommandError`].
    pub fn run(&self) -> Result<(), KeyCommandError> {
        let report = self.execute(read_passphrase)?;
        println!("{report}");
        Ok(())
    }

    /// Inspect the key.
    ///
    /// The passphrase is requested only for encrypted private keys, whose
    /// size cannot be read without decrypting them.
    ///
    /// # Errors
    ///
    /// See [`KeyCommandError`].
    pub fn execute<F>(&self, passphrase: F) -> Result<KeyReport, KeyCommandError>
    where
        F: FnOnce(&str) -> Result<Zeroizing<String>, PassphraseError>,
    {
        let pem = read_key(&self.path)?;
        let format = PemFormat::detect(&pem)?;

        let bits = match format {
            PemFormat::Spki | PemFormat::Pkcs1Public => KeyMaterial::load_public(&pem)?.bits(),
            PemFormat::EncryptedPkcs8 | PemFormat::LegacyEncryptedPkcs1 => {
                let passphrase = passphrase(&self.home.config()?.keys.passphrase_env)?;
                key_info(&pem, Some(&passphrase))?.bits
            }
            PemFormat::Pkcs8 | PemFormat::Pkcs1 => key_info(&pem, None)?.bits,
        };

        Ok(KeyReport {
            role: format.role(),
            format,
            bits,
            algorithm: KEY_ALGORITHM,
            encrypted: format.is_encrypted(),
        })
    }
}
