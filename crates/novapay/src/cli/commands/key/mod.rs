//! # Key Commands
//!
//! - [`encrypt`] - Protect a private key with a passphrase
//! - [`decrypt`] - Remove the passphrase from a private key
//! - [`inspect`] - Report size, format and encryption state
//! - [`check`] - Check that a private key can be used for signing

pub mod check;
pub mod decrypt;
pub mod encrypt;
pub mod inspect;

use std::io;
use std::path::{Path, PathBuf};

use novapay_core::{ConfigError, KeyError, KeySource};
use zeroize::Zeroizing;

use super::common::{write_key_file, KeyFileKind};
use crate::cli::passphrase::PassphraseError;

pub use check::CheckCommand;
pub use decrypt::DecryptCommand;
pub use encrypt::EncryptCommand;
pub use inspect::{InspectCommand, KeyReport};

/// Errors shared by the `novapay key` subcommands.
#[derive(Debug, thiserror::Error)]
pub enum KeyCommandError {
    /// The key file could not be read.
    #[error(transparent)]
    Read(#[from] ConfigError),

    /// The key could not be parsed, decrypted or encrypted.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Passphrase input failed.
    #[error(transparent)]
    Passphrase(#[from] PassphraseError),

    /// The output file exists and `--force` was not given.
    #[error("{0} already exists; use --force to overwrite")]
    FileExists(PathBuf),

    /// Writing the output file failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Output path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

fn read_key(path: &Path) -> Result<Zeroizing<String>, KeyCommandError> {
    Ok(KeySource::File(path.to_path_buf()).read()?)
}

fn ensure_writable(output: Option<&Path>, force: bool) -> Result<(), KeyCommandError> {
    match output {
        Some(path) if !force && path.exists() => {
            Err(KeyCommandError::FileExists(path.to_path_buf()))
        }
        _ => Ok(()),
    }
}

fn write_private(path: &Path, pem: &str, force: bool) -> Result<(), KeyCommandError> {
    write_key_file(path, pem, KeyFileKind::Private, force).map_err(|source| {
        if source.kind() == io::ErrorKind::AlreadyExists {
            KeyCommandError::FileExists(path.to_path_buf())
        } else {
            KeyCommandError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Report where the key went, or print it when there is no output file.
fn report(pem: &str, output: Option<&Path>) {
    match output {
        Some(path) => eprintln!("Wrote {}", path.display()),
        None => println!("{}", pem.trim_end()),
    }
}
