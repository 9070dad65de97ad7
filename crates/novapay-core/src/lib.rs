//! # novapay-core
//!
//! Foundational types for the NovaPay request-signing layer.
//!
//! ## Modules
//!
//! - [`payload`] - The [`Payload`] / [`Value`] model for request and callback data
//! - [`canonical`] - Deterministic signing input derived from a payload
//! - [`error`] - Error types and result aliases
//! - [`config`] / [`config_loader`] - TOML configuration
//! - [`key_source`] - Inline-or-file key resolution
//!
//! ## Canonical Form
//!
//! ```rust
//! use novapay_core::{canonical_string, Payload};
//!
//! let payload = Payload::new()
//!     .with("merchant_id", "test_merchant")
//!     .with("amount", 100.50)
//!     .with("currency", "UAH");
//!
//! assert_eq!(
//!     canonical_string(&payload),
//!     "amount=100.5&currency=UAH&merchant_id=test_merchant"
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod canonical;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod key_source;
pub mod payload;

pub use canonical::{canonical_string, canonicalize, SIGNATURE_FIELD, WIRE_CONTRACT_VERSION};
pub use config::{Config, Environment, GatewayConfig, KeysConfig};
pub use config_loader::{expand_path, load_config, ConfigLoader};
pub use error::{ConfigError, KeyError, NovaPayError, PayloadError, Result, SignError};
pub use key_source::KeySource;
pub use payload::{Number, Payload, Value};
