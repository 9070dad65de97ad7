//! Payload signing and verification.
//!
//! Signatures are RSASSA-PKCS1-v1_5 over a SHA-256 digest of the canonical
//! payload bytes (see [`novapay_core::canonical`]), carried as standard
//! base64. The digest is fixed: together with the canonical form it is the
//! wire contract with the gateway.
//!
//! Signing is a function of the key and the canonical bytes only. Nothing
//! time-dependent is added; callers that want replay protection put a
//! timestamp inside the payload.
//!
//! # Example
//!
//! ```no_run
//! use novapay_core::Payload;
//! use novapay_crypto::signer::{PayloadSigner, PayloadVerifier};
//!
//! let private_pem = std::fs::read_to_string("merchant.pem").expect("key");
//! let public_pem = std::fs::read_to_string("merchant_public.pem").expect("key");
//!
//! let signer = PayloadSigner::from_pem(&private_pem, None).expect("valid key");
//! let verifier = PayloadVerifier::from_pem(&public_pem).expect("valid key");
//!
//! let payload = Payload::new().with("amount", 100).with("currency", "UAH");
//! let signature = signer.sign(&payload).expect("signing succeeds");
//! assert!(verifier.verify(&payload, &signature));
//! ```

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use novapay_core::canonical::canonicalize;
use novapay_core::error::{KeyError, SignError};
use novapay_core::payload::Payload;
use rand::rngs::OsRng;
use rsa::pkcs1v15::{Signature as RsaSignature, SigningKey, VerifyingKey};
use rsa::signature::{RandomizedSigner, SignatureEncoding, Verifier};
use sha2::Sha256;

use crate::material::{KeyMaterial, KeyRole};

/// Name of the digest used inside every signature.
pub const DIGEST_ALGORITHM: &str = "SHA-256";

/// Name of the signature scheme.
pub const SIGNATURE_SCHEME: &str = "RSASSA-PKCS1-v1_5";

// ============================================================================
// Signature
// ============================================================================

/// A base64-encoded RSA signature as carried in the `x-sign` header.
///
/// The text is not validated on construction: a header that does not decode
/// simply fails verification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    /// Encode raw signature bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(STANDARD.encode(bytes))
    }

    /// The base64 text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode to raw bytes, or `None` if the text is not valid base64.
    #[must_use]
    pub fn decode(&self) -> Option<Vec<u8>> {
        STANDARD.decode(self.0.trim()).ok()
    }

    /// Consume the signature, returning the base64 text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Signature {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Signature {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// PayloadSigner
// ============================================================================

/// Signs payloads with one private key.
///
/// Safe to share between threads; signing takes `&self`.
#[derive(Clone)]
pub struct PayloadSigner {
    material: KeyMaterial,
    signing_key: SigningKey<Sha256>,
}

impl PayloadSigner {
    /// Create a signer from private key material.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidKey`] if `material` is a public key.
    pub fn new(material: KeyMaterial) -> Result<Self, KeyError> {
        let key = material
            .private_key()
            .ok_or_else(|| KeyError::invalid_key("signing requires a private key"))?
            .clone();
        Ok(Self {
            signing_key: SigningKey::<Sha256>::new(key),
            material,
        })
    }

    /// Load a private key from PEM text and create a signer.
    ///
    /// # Errors
    ///
    /// See [`KeyMaterial::load_private`].
    pub fn from_pem(pem: &str, passphrase: Option<&str>) -> Result<Self, KeyError> {
        Self::new(KeyMaterial::load_private(pem, passphrase)?)
    }

    /// Sign the canonical form of `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::SigningFailed`] if the RSA operation fails.
    pub fn sign(&self, payload: &Payload) -> Result<Signature, SignError> {
        self.sign_canonical(&canonicalize(payload))
    }

    /// Sign bytes that are already in canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::SigningFailed`] if the RSA operation fails.
    pub fn sign_canonical(&self, canonical: &[u8]) -> Result<Signature, SignError> {
        // Blinded with fresh randomness; PKCS#1 v1.5 output stays deterministic.
        let signature = self
            .signing_key
            .try_sign_with_rng(&mut OsRng, canonical)
            .map_err(|e| SignError::signing_failed(e.to_string()))?;
        tracing::debug!(
            input_len = canonical.len(),
            digest = DIGEST_ALGORITHM,
            "payload signed"
        );
        Ok(Signature::from_bytes(&signature.to_bytes()))
    }

    /// A verifier for the public half of this signer's key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::EncodingFailed`] if the public key cannot be encoded.
    pub fn verifier(&self) -> Result<PayloadVerifier, KeyError> {
        PayloadVerifier::new(self.material.to_public()?)
    }

    /// The key material used for signing.
    #[must_use]
    pub const fn material(&self) -> &KeyMaterial {
        &self.material
    }
}

impl fmt::Debug for PayloadSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadSigner")
            .field("material", &self.material)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// PayloadVerifier
// ============================================================================

/// Verifies payload signatures against one public key.
#[derive(Clone)]
pub struct PayloadVerifier {
    material: KeyMaterial,
    verifying_key: VerifyingKey<Sha256>,
}

impl PayloadVerifier {
    /// Create a verifier from public key material.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidKey`] if `material` is a private key.
    pub fn new(material: KeyMaterial) -> Result<Self, KeyError> {
        if material.role() != KeyRole::Public {
            return Err(KeyError::invalid_key("verification requires a public key"));
        }
        Ok(Self {
            verifying_key: VerifyingKey::<Sha256>::new(material.public_key()),
            material,
        })
    }

    /// Load a public key from PEM text and create a verifier.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidKey`] if the text is not an RSA public key.
    pub fn from_pem(pem: &str) -> Result<Self, KeyError> {
        Self::new(KeyMaterial::load_public(pem)?)
    }

    /// Check `signature` against the canonical form of `payload`.
    ///
    /// Returns `false` for a signature that does not match, does not decode,
    /// or has the wrong length.
    #[must_use]
    pub fn verify(&self, payload: &Payload, signature: &Signature) -> bool {
        self.verify_canonical(&canonicalize(payload), signature)
    }

    /// Check `signature` against bytes that are already in canonical form.
    #[must_use]
    pub fn verify_canonical(&self, canonical: &[u8], signature: &Signature) -> bool {
        let Some(raw) = signature.decode() else {
            tracing::debug!("signature is not valid base64");
            return false;
        };
        let Ok(signature) = RsaSignature::try_from(raw.as_slice()) else {
            tracing::debug!("signature bytes are malformed");
            return false;
        };
        let valid = self.verifying_key.verify(canonical, &signature).is_ok();
        tracing::debug!(valid, input_len = canonical.len(), "signature checked");
        valid
    }

    /// The key material used for verification.
    #[must_use]
    pub const fn material(&self) -> &KeyMaterial {
        &self.material
    }
}

impl fmt::Debug for PayloadVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadVerifier")
            .field("material", &self.material)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Free functions
// ============================================================================

/// Sign `payload` with private key material.
///
/// # Errors
///
/// Returns [`SignError::Key`] if `material` is not a private key and
/// [`SignError::SigningFailed`] if the RSA operation fails.
pub fn sign(material: &KeyMaterial, payload: &Payload) -> Result<Signature, SignError> {
    PayloadSigner::new(material.clone())?.sign(payload)
}

/// Verify `signature` over `payload` with public key material.
///
/// # Errors
///
/// Returns [`KeyError::InvalidKey`] only if `material` is not a public key.
/// A signature that does not match is `Ok(false)`.
pub fn verify(
    material: &KeyMaterial,
    payload: &Payload,
    signature: &Signature,
) -> Result<bool, KeyError> {
    Ok(PayloadVerifier::new(material.clone())?.verify(payload, signature))
}
