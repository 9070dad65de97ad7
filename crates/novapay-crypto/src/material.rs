//! Loading of PEM-encoded RSA key material.
//!
//! [`KeyMaterial`] is the loaded, ready-to-use form of one key together with
//! the PEM text it came from. Loading classifies failures so callers can tell
//! a key that must be replaced ([`KeyError::InvalidKey`]) from a passphrase
//! that must be entered again ([`KeyError::WrongPassphrase`]).
//!
//! # Accepted forms
//!
//! | PEM label                          | Encoding                 | Role    |
//! |------------------------------------|--------------------------|---------|
//! | `PRIVATE KEY`                      | PKCS#8                   | private |
//! | `RSA PRIVATE KEY`                  | PKCS#1                   | private |
//! | `ENCRYPTED PRIVATE KEY`            | PKCS#8, PBES2            | private |
//! | `RSA PRIVATE KEY` with `DEK-Info`  | PKCS#1, OpenSSL legacy   | private |
//! | `PUBLIC KEY`                       | SubjectPublicKeyInfo     | public  |
//! | `RSA PUBLIC KEY`                   | PKCS#1                   | public  |
//!
//! PBES2 envelopes may use PBKDF2 (HMAC-SHA1 or SHA-2) or scrypt with AES-CBC
//! or 3DES. Envelopes this loader cannot decrypt at all (PBES1, single DES)
//! fail with [`KeyError::InvalidKey`] naming the scheme, never with
//! [`KeyError::WrongPassphrase`].
//!
//! # Example
//!
//! ```no_run
//! use novapay_crypto::material::KeyMaterial;
//!
//! let pem = std::fs::read_to_string("merchant.pem").expect("readable key");
//! let key = KeyMaterial::load_private(&pem, Some("passphrase")).expect("valid key");
//! assert!(key.bits() >= 2048);
//! ```

use std::fmt;

use novapay_core::error::KeyError;
use pkcs8::{
    DecodePrivateKey, DecodePublicKey, EncodePublicKey, EncryptedPrivateKeyInfo, LineEnding,
    SecretDocument,
};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

use crate::legacy_pem::LegacyPem;

const BEGIN_MARKER: &str = "-----BEGIN ";
const LEGACY_ENCRYPTION_HEADER: &str = "Proc-Type: 4,ENCRYPTED";
const PBES1_UNSUPPORTED: &str =
    "PBES1 key encryption is not supported; re-encrypt with `openssl pkcs8 -topk8 -v2 aes-256-cbc`";

/// Whether a key is the private or the public half of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// Private key, used for signing.
    Private,
    /// Public key, used for verification.
    Public,
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private => write!(f, "private"),
            Self::Public => write!(f, "public"),
        }
    }
}

/// PEM encodings recognised by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PemFormat {
    /// Unencrypted PKCS#8 (`PRIVATE KEY`).
    Pkcs8,
    /// Unencrypted PKCS#1 (`RSA PRIVATE KEY`).
    Pkcs1,
    /// Passphrase-protected PKCS#8 (`ENCRYPTED PRIVATE KEY`).
    EncryptedPkcs8,
    /// PKCS#1 with OpenSSL's legacy `Proc-Type` encryption headers.
    LegacyEncryptedPkcs1,
    /// SubjectPublicKeyInfo (`PUBLIC KEY`).
    Spki,
    /// PKCS#1 public key (`RSA PUBLIC KEY`).
    Pkcs1Public,
}

impl PemFormat {
    /// Detect the format from the first PEM boundary in `pem`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidKey`] if there is no PEM boundary or the
    /// label is not an RSA key label.
    pub fn detect(pem: &str) -> Result<Self, KeyError> {
        let label = pem_label(pem).ok_or_else(|| KeyError::invalid_key("no PEM boundary found"))?;
        match label {
            "PRIVATE KEY" => Ok(Self::Pkcs8),
            "ENCRYPTED PRIVATE KEY" => Ok(Self::EncryptedPkcs8),
            "RSA PRIVATE KEY" if pem.contains(LEGACY_ENCRYPTION_HEADER) => {
                Ok(Self::LegacyEncryptedPkcs1)
            }
            "RSA PRIVATE KEY" => Ok(Self::Pkcs1),
            "PUBLIC KEY" => Ok(Self::Spki),
            "RSA PUBLIC KEY" => Ok(Self::Pkcs1Public),
            other => Err(KeyError::invalid_key(format!(
                "unsupported PEM label '{other}'"
            ))),
        }
    }

    /// The role of a key in this format.
    #[must_use]
    pub const fn role(self) -> KeyRole {
        match self {
            Self::Pkcs8 | Self::Pkcs1 | Self::EncryptedPkcs8 | Self::LegacyEncryptedPkcs1 => {
                KeyRole::Private
            }
            Self::Spki | Self::Pkcs1Public => KeyRole::Public,
        }
    }

    /// Whether the PEM body is passphrase-protected.
    #[must_use]
    pub const fn is_encrypted(self) -> bool {
        matches!(self, Self::EncryptedPkcs8 | Self::LegacyEncryptedPkcs1)
    }
}

fn pem_label(pem: &str) -> Option<&str> {
    let start = pem.find(BEGIN_MARKER)? + BEGIN_MARKER.len();
    let rest = &pem[start..];
    let end = rest.find("-----")?;
    Some(rest[..end].trim())
}

#[derive(Clone)]
enum DecodedKey {
    Private(RsaPrivateKey),
    Public(RsaPublicKey),
}

/// A loaded RSA key and the PEM text it was loaded from.
///
/// Immutable once constructed. The PEM text and passphrase are zeroized on
/// drop, as is the private key itself. `Debug` output never shows either.
#[derive(Clone)]
pub struct KeyMaterial {
    raw: Zeroizing<String>,
    role: KeyRole,
    passphrase: Option<Zeroizing<String>>,
    encrypted: bool,
    key: DecodedKey,
}

impl KeyMaterial {
    /// Load a key of either role, choosing the role from the PEM label.
    ///
    /// The passphrase is ignored for public and unencrypted private keys.
    /// An empty passphrase counts as no passphrase.
    ///
    /// # Errors
    ///
    /// See [`KeyMaterial::load_private`] and [`KeyMaterial::load_public`].
    pub fn load(pem: &str, passphrase: Option<&str>) -> Result<Self, KeyError> {
        match PemFormat::detect(pem)?.role() {
            KeyRole::Private => Self::load_private(pem, passphrase),
            KeyRole::Public => Self::load_public(pem),
        }
    }

    /// Load a private key, decrypting it with `passphrase` when it is encrypted.
    ///
    /// # Errors
    ///
    /// - [`KeyError::InvalidKey`] if the text is not an RSA private key, or
    ///   is encrypted with a scheme the loader does not support
    /// - [`KeyError::WrongPassphrase`] if the key is encrypted and the
    ///   passphrase is missing or does not decrypt it
    pub fn load_private(pem: &str, passphrase: Option<&str>) -> Result<Self, KeyError> {
        let passphrase = passphrase.filter(|p| !p.is_empty());
        let pem = pem.trim();
        let format = PemFormat::detect(pem)?;
        tracing::debug!(?format, has_passphrase = passphrase.is_some(), "loading private key");

        let key = match format {
            PemFormat::Pkcs8 => RsaPrivateKey::from_pkcs8_pem(pem)
                .map_err(|e| KeyError::invalid_key(format!("malformed PKCS#8 private key: {e}")))?,
            PemFormat::Pkcs1 => RsaPrivateKey::from_pkcs1_pem(pem)
                .map_err(|e| KeyError::invalid_key(format!("malformed PKCS#1 private key: {e}")))?,
            PemFormat::EncryptedPkcs8 => decrypt_pkcs8(pem, passphrase)?,
            PemFormat::LegacyEncryptedPkcs1 => decrypt_legacy(pem, passphrase)?,
            PemFormat::Spki | PemFormat::Pkcs1Public => {
                return Err(KeyError::invalid_key("expected a private key, found a public key"));
            }
        };

        Ok(Self {
            raw: Zeroizing::new(pem.to_string()),
            role: KeyRole::Private,
            passphrase: passphrase.map(|p| Zeroizing::new(p.to_string())),
            encrypted: format.is_encrypted(),
            key: DecodedKey::Private(key),
        })
    }

    /// Load a public key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidKey`] if the text is not an RSA public key.
    pub fn load_public(pem: &str) -> Result<Self, KeyError> {
        let pem = pem.trim();
        let format = PemFormat::detect(pem)?;
        tracing::debug!(?format, "loading public key");

        let key = match format {
            PemFormat::Spki => RsaPublicKey::from_public_key_pem(pem)
                .map_err(|e| KeyError::invalid_key(format!("malformed public key: {e}")))?,
            PemFormat::Pkcs1Public => RsaPublicKey::from_pkcs1_pem(pem)
                .map_err(|e| KeyError::invalid_key(format!("malformed PKCS#1 public key: {e}")))?,
            _ => {
                return Err(KeyError::invalid_key("expected a public key, found a private key"));
            }
        };

        Ok(Self {
            raw: Zeroizing::new(pem.to_string()),
            role: KeyRole::Public,
            passphrase: None,
            encrypted: false,
            key: DecodedKey::Public(key),
        })
    }

    /// Build material from a key that is already decoded.
    pub(crate) fn from_private_key(
        key: RsaPrivateKey,
        raw: Zeroizing<String>,
        passphrase: Option<&str>,
    ) -> Self {
        let passphrase = passphrase.filter(|p| !p.is_empty());
        Self {
            raw,
            role: KeyRole::Private,
            encrypted: passphrase.is_some(),
            passphrase: passphrase.map(|p| Zeroizing::new(p.to_string())),
            key: DecodedKey::Private(key),
        }
    }

    /// Public material holding the public half of this key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::EncodingFailed`] if the public key cannot be
    /// encoded as PEM.
    pub fn to_public(&self) -> Result<Self, KeyError> {
        let key = self.public_key();
        let pem = key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| KeyError::encoding_failed(format!("public key PEM: {e}")))?;
        Ok(Self {
            raw: Zeroizing::new(pem),
            role: KeyRole::Public,
            passphrase: None,
            encrypted: false,
            key: DecodedKey::Public(key),
        })
    }

    /// The role of this key.
    #[must_use]
    pub const fn role(&self) -> KeyRole {
        self.role
    }

    /// The PEM text this material was loaded from.
    #[must_use]
    pub fn raw_pem(&self) -> &str {
        &self.raw
    }

    /// The passphrase the key was loaded with, if any.
    #[must_use]
    pub fn passphrase(&self) -> Option<&str> {
        self.passphrase.as_deref().map(String::as_str)
    }

    /// Whether the source PEM was passphrase-protected.
    #[must_use]
    pub const fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Modulus size in bits.
    #[must_use]
    pub fn bits(&self) -> usize {
        match &self.key {
            DecodedKey::Private(k) => k.size() * 8,
            DecodedKey::Public(k) => k.size() * 8,
        }
    }

    /// The decoded private key, if this is private material.
    #[must_use]
    pub const fn private_key(&self) -> Option<&RsaPrivateKey> {
        match &self.key {
            DecodedKey::Private(k) => Some(k),
            DecodedKey::Public(_) => None,
        }
    }

    /// The public key, derived from the private key for private material.
    #[must_use]
    pub fn public_key(&self) -> RsaPublicKey {
        match &self.key {
            DecodedKey::Private(k) => k.to_public_key(),
            DecodedKey::Public(k) => k.clone(),
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("role", &self.role)
            .field("bits", &self.bits())
            .field("encrypted", &self.encrypted)
            .field("raw", &"[REDACTED]")
            .field("passphrase", &self.passphrase.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn decrypt_pkcs8(pem: &str, passphrase: Option<&str>) -> Result<RsaPrivateKey, KeyError> {
    let (_, document) = SecretDocument::from_pem(pem)
        .map_err(|e| KeyError::invalid_key(format!("malformed encrypted PEM: {e}")))?;
    let envelope = EncryptedPrivateKeyInfo::try_from(document.as_bytes()).map_err(|e| {
        KeyError::invalid_key(format!("unsupported or malformed PKCS#8 envelope: {e}"))
    })?;
    if let Some(scheme) = envelope.encryption_algorithm.pbes1() {
        tracing::debug!(oid = %scheme.oid(), "PBES1 envelope rejected");
        return Err(KeyError::invalid_key(PBES1_UNSUPPORTED));
    }

    let Some(passphrase) = passphrase else {
        tracing::debug!("encrypted private key loaded without passphrase");
        return Err(KeyError::WrongPassphrase);
    };

    let decrypted = envelope
        .decrypt(passphrase.as_bytes())
        .map_err(classify_decrypt_error)?;
    RsaPrivateKey::from_pkcs8_der(decrypted.as_bytes()).map_err(|e| {
        tracing::debug!(error = %e, "decrypted private key did not parse");
        KeyError::WrongPassphrase
    })
}

/// Separate schemes that cannot be decrypted from failed decryption.
///
/// Bad padding and a garbled inner structure both mean the passphrase was
/// wrong; an unsupported or misconfigured scheme fails the same way for
/// every passphrase.
fn classify_decrypt_error(error: pkcs8::Error) -> KeyError {
    use pkcs8::pkcs5::Error as Pkcs5Error;

    match error {
        pkcs8::Error::EncryptedPrivateKey(Pkcs5Error::UnsupportedAlgorithm { oid }) => {
            KeyError::invalid_key(format!("unsupported key encryption algorithm {oid}"))
        }
        pkcs8::Error::EncryptedPrivateKey(Pkcs5Error::NoPbes1CryptSupport) => {
            KeyError::invalid_key(PBES1_UNSUPPORTED)
        }
        pkcs8::Error::EncryptedPrivateKey(Pkcs5Error::AlgorithmParametersInvalid { oid }) => {
            KeyError::invalid_key(format!("invalid parameters for key encryption algorithm {oid}"))
        }
        other => {
            tracing::debug!(error = %other, "private key decryption failed");
            KeyError::WrongPassphrase
        }
    }
}

fn decrypt_legacy(pem: &str, passphrase: Option<&str>) -> Result<RsaPrivateKey, KeyError> {
    let envelope = LegacyPem::parse(pem)?;
    let Some(passphrase) = passphrase else {
        tracing::debug!("legacy encrypted private key loaded without passphrase");
        return Err(KeyError::WrongPassphrase);
    };

    tracing::debug!(cipher = ?envelope.cipher(), "decrypting legacy PEM private key");
    let der = envelope.decrypt(passphrase)?;
    RsaPrivateKey::from_pkcs1_der(&der).map_err(|e| {
        tracing::debug!(error = %e, "decrypted legacy private key did not parse");
        KeyError::WrongPassphrase
    })
}
