//! # Command-Line Interface
//!
//! - `novapay keygen` - Generate a merchant key pair
//! - `novapay key encrypt|decrypt|inspect|check` - Manage private key files
//! - `novapay passphrase` - Generate a random passphrase
//! - `novapay sign` - Print the `x-sign` value for a JSON body
//! - `novapay verify` - Verify a signature over a JSON body
//! - `novapay config` - View or create the configuration file

pub mod args;
pub mod commands;
pub mod passphrase;

pub use args::{
    Cli, Commands, ConfigAction, KeyCommands, KeyConvertArgs, KeyEncryptArgs, KeyPathArgs,
    KeygenArgs, PassphraseArgs, SignArgs, VerifyArgs,
};
