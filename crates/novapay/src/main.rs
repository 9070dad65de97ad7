//! # `novapay`
//!
//! Request signing tool for the NovaPay payment gateway.
//!
//! ## Usage
//!
//! ```bash
//! # Create ~/.novapay/config.toml
//! novapay config init
//!
//! # Generate a passphrase-protected merchant key pair
//! novapay keygen --encrypt
//!
//! # Sign a request body (prints the x-sign value)
//! novapay sign order.json
//!
//! # Verify a gateway callback
//! novapay verify callback.json --signature "$X_SIGN"
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::path::PathBuf;

use clap::Parser;
use novapay::cli::commands::exit_codes::{EXIT_ERROR, EXIT_REJECTED};
use novapay::cli::commands::{
    CheckCommand, ConfigCommand, DecryptCommand, EncryptCommand, Home, InspectCommand,
    KeygenCommand, PassphraseCommand, SignCommand, VerifyCommand,
};
use novapay::cli::{Cli, Commands, KeyCommands};
use novapay::logging::{init_logging, verbosity_to_level, LogConfig, LogError, LogFormat, LogGuard};

/// Set up logging based on verbosity level.
///
/// # Errors
///
/// Returns [`LogError`] if logging initialization fails.
fn setup_logging(verbose: u8, log_file: Option<PathBuf>) -> Result<LogGuard, LogError> {
    let config = LogConfig {
        level: verbosity_to_level(verbose),
        format: if verbose >= 2 {
            LogFormat::Pretty
        } else {
            LogFormat::Compact
        },
        file_path: log_file,
    };
    init_logging(&config)
}

/// Main entry point for the `novapay` binary.
fn main() {
    let cli = Cli::parse();

    let _guard = match setup_logging(cli.verbose, cli.log_file.clone()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            std::process::exit(EXIT_ERROR);
        }
    };

    let home = match Home::resolve(cli.home.clone()) {
        Ok(home) => home,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(EXIT_ERROR);
        }
    };

    let result = match cli.command {
        Commands::Keygen(args) => {
            let cmd = KeygenCommand::new(args, home);
            cmd.run().map_err(|e| e.to_string())
        }
        Commands::Key { command } => handle_key(command, home),
        Commands::Passphrase(args) => {
            let cmd = PassphraseCommand::new(args.length, !args.no_special);
            cmd.run().map_err(|e| e.to_string())
        }
        Commands::Sign(args) => {
            let cmd = SignCommand::new(args.file, args.key, home);
            cmd.run().map_err(|e| e.to_string())
        }
        Commands::Verify(args) => {
            let cmd = VerifyCommand::new(args.file, args.signature, args.public_key, home);
            cmd.run().map_err(|e| e.to_string()).map(exit_if_rejected)
        }
        Commands::Config { action } => {
            let cmd = ConfigCommand::new(action, home);
            cmd.run().map_err(|e| e.to_string())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(EXIT_ERROR);
    }
}

/// Handle `novapay key` subcommands.
///
/// # Returns
///
/// `Ok(())` on success, or an error message string on failure.
fn handle_key(command: KeyCommands, home: Home) -> Result<(), String> {
    match command {
        KeyCommands::Encrypt(args) => {
            let cmd = EncryptCommand::new(args, home);
            cmd.run().map_err(|e| e.to_string())
        }
        KeyCommands::Decrypt(args) => {
            let cmd = DecryptCommand::new(args, home);
            cmd.run().map_err(|e| e.to_string())
        }
        KeyCommands::Inspect(args) => {
            let cmd = InspectCommand::new(args.path, home);
            cmd.run().map_err(|e| e.to_string())
        }
        KeyCommands::Check(args) => {
            let cmd = CheckCommand::new(args.path, home);
            cmd.run().map_err(|e| e.to_string()).map(exit_if_rejected)
        }
    }
}

/// Exit with [`EXIT_REJECTED`] when a check came back negative.
fn exit_if_rejected(accepted: bool) {
    if !accepted {
        std::process::exit(EXIT_REJECTED);
    }
}
