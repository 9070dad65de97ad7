//! # novapay-crypto
//!
//! RSA signing and key management for the NovaPay gateway.
//!
//! ## Modules
//!
//! - [`material`] - Loading PEM key material, with passphrase handling
//! - [`signer`] - Signing and verifying payloads
//! - [`lifecycle`] - Key generation, encryption, inspection and passphrases
//! - [`client`] - Sign-outgoing / verify-incoming operations for a transport
//!
//! ## Wire contract
//!
//! RSASSA-PKCS1-v1_5 with SHA-256 over the canonical payload form of
//! [`novapay_core::canonical`], base64-encoded in the `x-sign` header.
//!
//! ## Security
//!
//! - No unsafe code allowed
//! - Key material and passphrases are zeroized on drop and redacted in `Debug`
//! - Randomness comes from the operating system RNG only

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
mod legacy_pem;
pub mod lifecycle;
pub mod material;
pub mod signer;

pub use client::{SelfTest, SignedRequest, SigningClient};
pub use lifecycle::{
    decrypt_private_key, encrypt_private_key, generate_key_pair, generate_passphrase,
    is_private_key_encrypted, key_info, validate_private_key, KeyCipher, KeyInfo, KeyPair,
    DEFAULT_KEY_BITS, DEFAULT_PASSPHRASE_LEN, KEY_ALGORITHM, MIN_GENERATED_PASSPHRASE_LEN, MIN_KEY_BITS,
};
pub use material::{KeyMaterial, KeyRole, PemFormat};
pub use signer::{sign, verify, PayloadSigner, PayloadVerifier, Signature, DIGEST_ALGORITHM};
