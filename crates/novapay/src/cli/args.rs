//! # CLI Argument Definitions
//!
//! - `novapay keygen` - Generate a merchant key pair
//! - `novapay key encrypt|decrypt|inspect|check <PATH>` - Manage a private key file
//! - `novapay passphrase` - Generate a random passphrase
//! - `novapay sign <JSON_FILE>` - Print the `x-sign` value for a request body
//! - `novapay verify <JSON_FILE> --signature SIG` - Check a gateway signature
//! - `novapay config [show|path|init]` - View or create the configuration file
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level
//! - `--home <DIR>` - NovaPay home directory (default `~/.novapay`)
//! - `--log-file <PATH>` - Also write logs to a daily-rotated file

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use novapay_crypto::{KeyCipher, DEFAULT_KEY_BITS, DEFAULT_PASSPHRASE_LEN};

/// RSA request signing for the NovaPay payment gateway.
#[derive(Debug, Parser)]
#[command(name = "novapay")]
#[command(author, version, about = "RSA request signing for the NovaPay payment gateway")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// NovaPay home directory holding config.toml and generated keys
    ///
    /// Defaults to `~/.novapay`.
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Also write logs to this file (rotated daily)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new RSA key pair for signing requests
    ///
    /// Writes `<NAME>_private.pem` (mode 0600) and `<NAME>_public.pem`.
    /// The public key is what the merchant registers with the gateway.
    Keygen(KeygenArgs),

    /// Private key file management
    Key {
        /// Key command to execute
        #[command(subcommand)]
        command: KeyCommands,
    },

    /// Generate a random passphrase suitable for key encryption
    Passphrase(PassphraseArgs),

    /// Sign a JSON request body and print the `x-sign` header value
    Sign(SignArgs),

    /// Verify a signature over a JSON body
    ///
    /// Exits with status 1 when the signature does not match.
    Verify(VerifyArgs),

    /// View or create the configuration file
    ///
    /// Without a subcommand, displays the effective configuration.
    Config {
        /// Configuration action to perform
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

/// Arguments for `novapay keygen`.
#[derive(Debug, Clone, Args)]
pub struct KeygenArgs {
    /// RSA modulus size in bits (at least 2048)
    #[arg(long, default_value_t = DEFAULT_KEY_BITS, value_name = "N")]
    pub bits: usize,

    /// Protect the private key with a passphrase
    #[arg(long)]
    pub encrypt: bool,

    /// Cipher for the encrypted key (aes-128-cbc or aes-256-cbc)
    #[arg(long, default_value = "aes-256-cbc", value_name = "CIPHER")]
    pub cipher: KeyCipher,

    /// Directory for the key files (defaults to the NovaPay home directory)
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// File name prefix
    #[arg(long, default_value = "merchant", value_name = "NAME")]
    pub name: String,

    /// Overwrite existing key files
    #[arg(short, long)]
    pub force: bool,
}

/// Private key management commands.
#[derive(Debug, Subcommand)]
pub enum KeyCommands {
    /// Encrypt a private key with a passphrase (PKCS#8, PBES2)
    Encrypt(KeyEncryptArgs),

    /// Remove the passphrase from a private key
    Decrypt(KeyConvertArgs),

    /// Show the size, format and encryption state of a key
    Inspect(KeyPathArgs),

    /// Check that a private key loads and produces verifiable signatures
    ///
    /// Exits with status 1 when the key is unusable.
    Check(KeyPathArgs),
}

/// A key file argument.
#[derive(Debug, Clone, Args)]
pub struct KeyPathArgs {
    /// Path to the PEM file
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

/// Arguments for rewriting a private key file.
#[derive(Debug, Clone, Args)]
pub struct KeyConvertArgs {
    /// Path to the private key PEM file
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output file; the PEM is printed to stdout when omitted
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it exists
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for `novapay key encrypt`.
#[derive(Debug, Clone, Args)]
pub struct KeyEncryptArgs {
    /// Key file and output options
    #[command(flatten)]
    pub target: KeyConvertArgs,

    /// Cipher for the encryption envelope (aes-128-cbc or aes-256-cbc)
    #[arg(long, default_value = "aes-256-cbc", value_name = "CIPHER")]
    pub cipher: KeyCipher,
}

/// Arguments for `novapay passphrase`.
#[derive(Debug, Clone, Args)]
pub struct PassphraseArgs {
    /// Number of characters (at least 12)
    #[arg(short, long, default_value_t = DEFAULT_PASSPHRASE_LEN, value_name = "N")]
    pub length: usize,

    /// Use letters and digits only
    #[arg(long)]
    pub no_special: bool,
}

/// Arguments for `novapay sign`.
#[derive(Debug, Clone, Args)]
pub struct SignArgs {
    /// JSON request body (`-` reads stdin)
    #[arg(value_name = "JSON_FILE")]
    pub file: PathBuf,

    /// Private key PEM file (defaults to `keys.private_key` from the config)
    #[arg(short, long, value_name = "PATH")]
    pub key: Option<PathBuf>,
}

/// Arguments for `novapay verify`.
#[derive(Debug, Clone, Args)]
pub struct VerifyArgs {
    /// JSON body that was signed (`-` reads stdin)
    #[arg(value_name = "JSON_FILE")]
    pub file: PathBuf,

    /// Base64 signature, as sent in the `x-sign` header
    #[arg(short, long, value_name = "SIG")]
    pub signature: String,

    /// Public key PEM file (defaults to `keys.gateway_public_key` from the config)
    #[arg(short, long, value_name = "PATH")]
    pub public_key: Option<PathBuf>,
}

/// Configuration actions.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Print the configuration file path
    Path,

    /// Write a commented default configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}
