//! # Keygen Command
//!
//! `novapay keygen` creates the merchant key pair used to sign requests.
//!
//! ```text
//! novapay keygen                          # ~/.novapay/merchant_{private,public}.pem
//! novapay keygen --encrypt --bits 4096    # passphrase-protected, 4096-bit
//! novapay keygen --out-dir keys --name shop-a
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use novapay_core::{ConfigError, KeyError};
use novapay_crypto::{generate_key_pair, KeyCipher, MIN_KEY_BITS};
use zeroize::Zeroizing;

use super::common::{write_key_file, Home, KeyFileKind};
use crate::cli::args::KeygenArgs;
use crate::cli::passphrase::{read_new_passphrase, PassphraseError};
use crate::logging::log_key_event;

// ============================================================================
// KeygenError
// ============================================================================

/// Errors that can occur during key generation.
#[derive(Debug, thiserror::Error)]
pub enum KeygenError {
    /// A key file already exists and `--force` was not given.
    #[error("{0} already exists; use --force to overwrite")]
    FileExists(PathBuf),

    /// The key name would escape the output directory.
    #[error("invalid key name '{0}': use letters, digits, '-' or '_'")]
    InvalidName(String),

    /// Key generation or encryption failed.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Passphrase input failed.
    #[error(transparent)]
    Passphrase(#[from] PassphraseError),

    /// The configuration could not be read.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing a key file failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// File being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

// ============================================================================
// KeygenCommand
// ============================================================================

/// Files written by a successful `keygen`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeygenOutput {
    /// Private key file.
    pub private_path: PathBuf,
    /// Public key file.
    pub public_path: PathBuf,
    /// Modulus size.
    pub bits: usize,
    /// Whether the private key is passphrase-protected.
    pub encrypted: bool,
    /// Cipher of the encryption envelope, if encrypted.
    pub cipher: Option<KeyCipher>,
}

/// The `novapay keygen` command handler.
#[derive(Debug, Clone)]
pub struct KeygenCommand {
    args: KeygenArgs,
    home: Home,
}

impl KeygenCommand {
    /// Create a new `KeygenCommand`.
    #[must_use]
    pub const fn new(args: KeygenArgs, home: Home) -> Self {
        Self { args, home }
    }

    /// Generate the key pair, prompting for a passphrase with `--encrypt`,
    /// and print where the files went.
    ///
    /// # Errors
    ///
    /// See [`KeygenError`].
    pub fn run(&self) -> Result<(), KeygenError> {
        let output = self.execute(read_new_passphrase)?;

        println!("Generated {}-bit RSA key pair", output.bits);
        println!("  Private key: {}", output.private_path.display());
        println!("  Public key:  {}", output.public_path.display());
        match output.cipher {
            Some(cipher) => println!("  Encrypted:   yes ({cipher})"),
            None => println!("  Encrypted:   no"),
        }
        println!();
        println!("Register the public key with NovaPay; keep the private key secret.");
        Ok(())
    }

    /// Generate and write the key pair.
    ///
    /// `new_passphrase` is called with the configured passphrase variable
    /// name, and only when `--encrypt` is set.
    ///
    /// # Errors
    ///
    /// See [`KeygenError`].
    pub fn execute<F>(&self, new_passphrase: F) -> Result<KeygenOutput, KeygenError>
    where
        F: FnOnce(&str) -> Result<Zeroizing<String>, PassphraseError>,
    {
        validate_name(&self.args.name)?;
        if self.args.bits < MIN_KEY_BITS {
            return Err(KeyError::weak_key_size(self.args.bits, MIN_KEY_BITS).into());
        }

        let out_dir = self
            .args
            .out_dir
            .clone()
            .unwrap_or_else(|| self.home.dir().to_path_buf());
        let private_path = out_dir.join(format!("{}_private.pem", self.args.name));
        let public_path = out_dir.join(format!("{}_public.pem", self.args.name));

        if !self.args.force {
            for path in [&private_path, &public_path] {
                if path.exists() {
                    return Err(KeygenError::FileExists(path.clone()));
                }
            }
        }

        let passphrase = if self.args.encrypt {
            let env_var = self.home.config()?.keys.passphrase_env;
            Some(new_passphrase(&env_var)?)
        } else {
            None
        };

        tracing::info!(bits = self.args.bits, encrypted = self.args.encrypt, "generating key pair");
        let pair = generate_key_pair(
            self.args.bits,
            passphrase.as_ref().map(|p| p.as_str()),
            self.args.cipher,
        )?;

        fs::create_dir_all(&out_dir).map_err(|source| KeygenError::Io {
            path: out_dir.clone(),
            source,
        })?;
        write(&private_path, pair.private_pem(), KeyFileKind::Private, self.args.force)?;
        if let Err(e) = write(&public_path, pair.public_pem(), KeyFileKind::Public, self.args.force) {
            // No half pair on disk.
            if let Err(cleanup) = fs::remove_file(&private_path) {
                tracing::warn!(
                    path = %private_path.display(),
                    error = %cleanup,
                    "failed to remove private key"
                );
            }
            return Err(e);
        }
        log_key_event("generate", &private_path, pair.is_encrypted());

        Ok(KeygenOutput {
            private_path,
            public_path,
            bits: pair.bits(),
            encrypted: pair.is_encrypted(),
            cipher: pair.is_encrypted().then_some(self.args.cipher),
        })
    }
}

fn write(path: &Path, pem: &str, kind: KeyFileKind, force: bool) -> Result<(), KeygenError> {
    write_key_file(path, pem, kind, force).map_err(|source| {
        if source.kind() == io::ErrorKind::AlreadyExists {
            KeygenError::FileExists(path.to_path_buf())
        } else {
            KeygenError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

fn validate_name(name: &str) -> Result<(), KeygenError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(KeygenError::InvalidName(name.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
