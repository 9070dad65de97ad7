//! # Test Utilities for novapay-crypto
//!
//! ## Functions
//!
//! - [`fixture`] - Read a PEM fixture from `tests/fixtures/`
//! - [`merchant_signer`] / [`merchant_verifier`] - Signer and verifier for the merchant fixture key
//!
//! ## Proptest Strategies
//!
//! - [`field_name`] - Lowercase field names
//! - [`value`] - Arbitrary nested payload values
//! - [`any_payload`] - Non-empty payloads

#![allow(dead_code)]
#![allow(clippy::expect_used)]

use std::path::PathBuf;

use novapay_core::{Payload, Value};
use novapay_crypto::{PayloadSigner, PayloadVerifier};
use proptest::prelude::*;

/// Passphrase of every encrypted `merchant_*.pem` fixture.
pub const FIXTURE_PASSPHRASE: &str = "merchant-fixture-pass";

fn fixtures_dir() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(manifest_dir).join("tests").join("fixtures")
}

/// Read a fixture file.
///
/// # Panics
///
/// Panics if the fixture does not exist.
pub fn fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("fixture {} unreadable: {e}", path.display()))
}

/// Signer for `merchant_pkcs8.pem`.
pub fn merchant_signer() -> PayloadSigner {
    PayloadSigner::from_pem(&fixture("merchant_pkcs8.pem"), None).expect("merchant fixture loads")
}

/// Verifier for `merchant_public.pem`.
pub fn merchant_verifier() -> PayloadVerifier {
    PayloadVerifier::from_pem(&fixture("merchant_public.pem")).expect("merchant fixture loads")
}

/// Lowercase field names, never the reserved signature field.
pub fn field_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e9f64..1.0e9).prop_map(Value::from),
        "[a-zA-Z0-9 .:_-]{0,16}".prop_map(Value::from),
    ]
}

/// Payload values up to three levels deep.
pub fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(field_name(), inner, 0..4)
                .prop_map(|fields| Value::Object(Payload::from(fields))),
        ]
    })
}

/// Payloads with one to six top-level fields.
pub fn any_payload() -> impl Strategy<Value = Payload> {
    prop::collection::btree_map(field_name(), value(), 1..6).prop_map(Payload::from)
}
