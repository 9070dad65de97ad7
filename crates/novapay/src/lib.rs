//! # novapay
//!
//! Command-line tooling for NovaPay request signing: merchant key
//! generation and protection, signing request bodies and verifying
//! gateway signatures.
//!
//! The signing itself lives in `novapay-crypto`; this crate adds the
//! command handlers, passphrase input and logging setup used by the
//! `novapay` binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cli;
pub mod logging;

pub use logging::{
    init_logging, log_key_event, redact_sensitive, verbosity_to_level, LogConfig, LogError,
    LogFormat, LogGuard, LogLevel,
};
