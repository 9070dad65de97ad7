//! Sign and verify flows between the merchant and the gateway keys.

use novapay_core::{canonical_string, Payload, Value};
use novapay_crypto::{KeyMaterial, PayloadSigner, PayloadVerifier, Signature};
use proptest::prelude::*;

use crate::common::{
    fixture, merchant_signer, merchant_verifier, any_payload, FIXTURE_PASSPHRASE,
};

/// `openssl dgst -sha256 -sign merchant_pkcs8.pem` over the canonical form of
/// the nested order payload below.
const NESTED_SIGNATURE: &str = "pzyHL/g6js7aimL3ryfp4zR/m2YlrQw3cOaDRVxqDPHVWYK+Zj+JsqrIp6ygbSFWccGheo//QpWQj8XShjr3as5z6vzCjPyZ1TYSuvzLcmT4mHaGCVI4v77fvVgJCvwDJAsEOPnJr2vCvpBcGaZCArfO2N345rG7qVuaYKqGVVQcyBDca2Tq5ZUgZO7isJNOroQKz0ivzK4QRMF83JgPpHsa39DqLEhU0m9zpSWXrTigbE/5hb5OJZsnFefWLudFQjQPEf9fXKTVAR2WZnqDxYgr5I1Ttc9YU3UbzcSBPEUqugTZUb9RFsGbL+IwXOgFl9QOq6mX1Y0aGPHlMJdXZg==";

const NESTED_ORDER: &str =
    r#"{"merchant_id":"test_merchant","amount":100.5,"currency":"UAH","delivery":{"weight":0.5,"city":"kyiv"}}"#;

#[test]
fn test_nested_payload_matches_openssl() {
    let payload = Payload::from_json_slice(NESTED_ORDER.as_bytes()).expect("valid json");
    assert_eq!(
        canonical_string(&payload),
        "amount=100.5&currency=UAH&delivery=city=kyiv&weight=0.5&merchant_id=test_merchant"
    );

    let signature = merchant_signer().sign(&payload).expect("signs");
    assert_eq!(signature.as_str(), NESTED_SIGNATURE);
    assert!(merchant_verifier().verify(&payload, &signature));
}

#[test]
fn test_reordered_json_verifies_same_signature() {
    let reordered = Payload::from_json_slice(
        br#"{"delivery":{"city":"kyiv","weight":0.5},"currency":"UAH","amount":100.50,"merchant_id":"test_merchant"}"#,
    )
    .expect("valid json");
    assert!(merchant_verifier().verify(&reordered, &Signature::from(NESTED_SIGNATURE)));
}

#[test]
fn test_reordered_payload_signs_identically() {
    let signer = merchant_signer();
    let forward = Payload::new().with("amount", 100).with("currency", "UAH");
    let reverse = Payload::new().with("currency", "UAH").with("amount", 100);
    assert_eq!(
        signer.sign(&forward).expect("signs"),
        signer.sign(&reverse).expect("signs")
    );
}

#[test]
fn test_signature_field_ignored() {
    let signer = merchant_signer();
    let with_field = Payload::new().with("amount", 100).with("x-sign", "ignored");
    let without = Payload::new().with("amount", 100);
    assert_eq!(
        signer.sign(&with_field).expect("signs"),
        signer.sign(&without).expect("signs")
    );
}

#[test]
fn test_all_private_encodings_sign_identically() {
    let payload = Payload::new().with("order", "A-1").with("paid", true);
    let signatures: Vec<Signature> = [
        ("merchant_pkcs8.pem", None),
        ("merchant_pkcs1.pem", None),
        ("merchant_encrypted.pem", Some(FIXTURE_PASSPHRASE)),
    ]
    .into_iter()
    .map(|(name, passphrase)| {
        PayloadSigner::from_pem(&fixture(name), passphrase)
            .expect("fixture loads")
            .sign(&payload)
            .expect("signs")
    })
    .collect();

    assert!(signatures.windows(2).all(|pair| pair[0] == pair[1]));

    let pkcs1_public = PayloadVerifier::from_pem(&fixture("merchant_public_pkcs1.pem"))
        .expect("pkcs1 public key loads");
    assert!(pkcs1_public.verify(&payload, &signatures[0]));
}

#[test]
fn test_gateway_key_does_not_verify_merchant_signature() {
    let payload = Payload::new().with("amount", 100);
    let signature = merchant_signer().sign(&payload).expect("signs");
    let gateway = PayloadVerifier::from_pem(&fixture("gateway_public.pem")).expect("loads");
    assert!(!gateway.verify(&payload, &signature));
}

#[test]
fn test_null_and_missing_fields_differ() {
    let signer = merchant_signer();
    let verifier = merchant_verifier();
    let with_null = Payload::new().with("amount", 100).with("comment", Value::Null);
    let without = Payload::new().with("amount", 100);

    let signature = signer.sign(&with_null).expect("signs");
    assert!(!verifier.verify(&without, &signature));
}

#[test]
fn test_concurrent_signing_with_shared_signer() {
    let signer = merchant_signer();
    let verifier = merchant_verifier();
    let expected = signer
        .sign(&Payload::new().with("amount", 100))
        .expect("signs");

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| signer.sign(&Payload::new().with("amount", 100))))
            .collect();
        for handle in handles {
            let signature = handle.join().expect("thread completes").expect("signs");
            assert_eq!(signature, expected);
            assert!(verifier.verify(&Payload::new().with("amount", 100), &signature));
        }
    });
}

#[test]
fn test_material_from_any_loader_round_trips() {
    let private = KeyMaterial::load(&fixture("merchant_encrypted.pem"), Some(FIXTURE_PASSPHRASE))
        .expect("loads");
    let public = KeyMaterial::load(&fixture("merchant_public.pem"), None).expect("loads");

    let payload = Payload::new().with("status", "ok");
    let signature = novapay_crypto::sign(&private, &payload).expect("signs");
    assert_eq!(novapay_crypto::verify(&public, &payload, &signature), Ok(true));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_sign_then_verify(payload in any_payload()) {
        let signature = merchant_signer().sign(&payload).expect("signs");
        prop_assert!(merchant_verifier().verify(&payload, &signature));
    }

    #[test]
    fn prop_single_field_mutation_fails(payload in any_payload(), index in any::<prop::sample::Index>()) {
        let signature = merchant_signer().sign(&payload).expect("signs");

        let keys: Vec<String> = payload.iter().map(|(k, _)| k.clone()).collect();
        let key = index.get(&keys).clone();
        let original = payload.get(&key).cloned().unwrap_or(Value::Null);
        let rendered = canonical_string(&Payload::new().with("v", original));
        let mutated = payload.clone().with(key, format!("{rendered}-tampered"));

        prop_assert!(!merchant_verifier().verify(&mutated, &signature));
    }
}
