//! # CLI Command Handlers
//!
//! - [`keygen`] - Generate a merchant key pair
//! - [`key`] - Encrypt, decrypt, inspect and check private key files
//! - [`passphrase`] - Generate a random passphrase
//! - [`sign`] - Sign a JSON request body
//! - [`verify`] - Verify a signature over a JSON body
//! - [`config`] - Configuration management
//!
//! Each handler has a `run` method that performs terminal I/O and an
//! `execute` method that takes its passphrase source as a closure and
//! returns a value, which is what the tests drive. `main` turns handler
//! results into the codes in [`exit_codes`].

pub mod common;
pub mod config;
pub mod exit_codes;
pub mod key;
pub mod keygen;
pub mod passphrase;
pub mod sign;
pub mod verify;

pub use common::Home;
pub use config::{ConfigCommand, ConfigCommandError};
pub use key::{
    CheckCommand, DecryptCommand, EncryptCommand, InspectCommand, KeyCommandError, KeyReport,
};
pub use keygen::{KeygenCommand, KeygenError, KeygenOutput};
pub use passphrase::PassphraseCommand;
pub use sign::{SignCommand, SignCommandError};
pub use verify::{VerifyCommand, VerifyCommandError};
