//! Configuration types for the NovaPay signing layer.
//!
//! Configuration is stored in TOML format at `~/.novapay/config.toml`.
//!
//! # Default TOML Output
//!
//! ```toml
//! [keys]
//! private_key = "~/.novapay/merchant_private.pem"
//! public_key = "~/.novapay/merchant_public.pem"
//! gateway_public_key = "~/.novapay/gateway_public.pem"
//! passphrase_env = "NOVAPAY_PASSPHRASE"
//!
//! [gateway]
//! environment = "sandbox"
//! signature_header = "x-sign"
//! ```
//!
//! # Examples
//!
//! ```
//! use novapay_core::config::{Config, Environment};
//!
//! let config = Config::default();
//! assert_eq!(config.gateway.environment, Environment::Sandbox);
//! assert_eq!(config.gateway.signature_header, "x-sign");
//! ```

use serde::{Deserialize, Serialize};

use crate::canonical::SIGNATURE_FIELD;
use crate::error::ConfigError;
use crate::key_source::KeySource;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Where key material comes from.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Gateway endpoint and protocol settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl Config {
    /// Returns the default configuration as commented TOML.
    #[must_use]
    pub fn default_toml() -> String {
        r#"# NovaPay signing configuration

[keys]
# Merchant private key: a path (~ is expanded) or inline PEM text.
private_key = "~/.novapay/merchant_private.pem"
# Merchant public key, shared with the gateway.
public_key = "~/.novapay/merchant_public.pem"
# Gateway public key used to verify callbacks and responses.
gateway_public_key = "~/.novapay/gateway_public.pem"
# Environment variable holding the private key passphrase.
passphrase_env = "NOVAPAY_PASSPHRASE"

[gateway]
# "sandbox" or "production"
environment = "sandbox"
signature_header = "x-sign"
"#
        .to_string()
    }

    /// Check values that serde cannot validate on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for empty key locations or an
    /// empty signature header.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("keys.private_key", &self.keys.private_key),
            ("keys.gateway_public_key", &self.keys.gateway_public_key),
            ("gateway.signature_header", &self.gateway.signature_header),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid_value(field, "must not be empty"));
            }
        }
        Ok(())
    }
}

fn default_private_key() -> String {
    "~/.novapay/merchant_private.pem".to_string()
}

fn default_public_key() -> String {
    "~/.novapay/merchant_public.pem".to_string()
}

fn default_gateway_public_key() -> String {
    "~/.novapay/gateway_public.pem".to_string()
}

fn default_passphrase_env() -> String {
    "NOVAPAY_PASSPHRASE".to_string()
}

/// Key locations and passphrase source.
///
/// Each key entry may hold either a filesystem path or the PEM text itself;
/// see [`KeySource::parse`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeysConfig {
    /// Merchant private key used for outgoing requests.
    #[serde(default = "default_private_key")]
    pub private_key: String,

    /// Merchant public key.
    #[serde(default = "default_public_key")]
    pub public_key: String,

    /// Gateway public key used to verify incoming payloads.
    #[serde(default = "default_gateway_public_key")]
    pub gateway_public_key: String,

    /// Name of the environment variable that holds the private key passphrase.
    #[serde(default = "default_passphrase_env")]
    pub passphrase_env: String,
}

impl KeysConfig {
    /// Source of the merchant private key.
    #[must_use]
    pub fn private_key_source(&self) -> KeySource {
        KeySource::parse(&self.private_key)
    }

    /// Source of the merchant public key.
    #[must_use]
    pub fn public_key_source(&self) -> KeySource {
        KeySource::parse(&self.public_key)
    }

    /// Source of the gateway public key.
    #[must_use]
    pub fn gateway_public_key_source(&self) -> KeySource {
        KeySource::parse(&self.gateway_public_key)
    }
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            private_key: default_private_key(),
            public_key: default_public_key(),
            gateway_public_key: default_gateway_public_key(),
            passphrase_env: default_passphrase_env(),
        }
    }
}

/// Gateway environment.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Test environment.
    #[default]
    Sandbox,
    /// Live environment.
    Production,
}

impl Environment {
    /// Base URL of the gateway API for this environment.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => "https://api-qecom.novapay.ua/v1",
            Self::Production => "https://api-ecom.novapay.ua/v1",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sandbox => write!(f, "sandbox"),
            Self::Production => write!(f, "production"),
        }
    }
}

fn default_signature_header() -> String {
    SIGNATURE_FIELD.to_string()
}

/// Gateway protocol settings consumed by the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Which gateway environment to talk to.
    #[serde(default)]
    pub environment: Environment,

    /// HTTP header that carries the request signature.
    #[serde(default = "default_signature_header")]
    pub signature_header: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            signature_header: default_signature_header(),
        }
    }
}

impl GatewayConfig {
    /// Base URL for the configured environment.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        self.environment.base_url()
    }
}
