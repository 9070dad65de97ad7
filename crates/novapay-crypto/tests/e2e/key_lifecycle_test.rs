//! Key generation, encryption and inspection through to signing.

use novapay_core::{KeyError, Payload};
use novapay_crypto::{
    decrypt_private_key, encrypt_private_key, generate_key_pair, generate_passphrase,
    is_private_key_encrypted, key_info, validate_private_key, KeyCipher, PayloadSigner,
    PayloadVerifier, DEFAULT_KEY_BITS,
};

use crate::common::{fixture, FIXTURE_PASSPHRASE};

fn order() -> Payload {
    Payload::new()
        .with("merchant_id", "test_merchant")
        .with("amount", 100.50)
        .with("currency", "UAH")
}

#[test]
fn test_generate_encrypt_decrypt_signs_identically() {
    let pair = generate_key_pair(DEFAULT_KEY_BITS, None, KeyCipher::default()).expect("generates");
    let original = PayloadSigner::from_pem(pair.private_pem(), None).expect("loads");

    let encrypted = encrypt_private_key(pair.private_pem(), "pw", KeyCipher::default())
        .expect("encrypts");
    let decrypted = decrypt_private_key(encrypted.raw_pem(), "pw").expect("decrypts");
    let restored = PayloadSigner::from_pem(decrypted.raw_pem(), None).expect("loads");

    assert_eq!(
        original.sign(&order()).expect("signs"),
        restored.sign(&order()).expect("signs")
    );
}

#[test]
fn test_decrypt_with_other_passphrase_fails() {
    let encrypted =
        encrypt_private_key(&fixture("merchant_pkcs8.pem"), "pw1", KeyCipher::Aes256Cbc)
            .expect("encrypts");
    assert_eq!(
        decrypt_private_key(encrypted.raw_pem(), "pw2").unwrap_err(),
        KeyError::WrongPassphrase
    );
}

#[test]
fn test_generate_below_minimum_fails() {
    assert!(matches!(
        generate_key_pair(1024, None, KeyCipher::default()),
        Err(KeyError::WeakKeySize { bits: 1024, .. })
    ));
}

#[test]
fn test_generated_encrypted_pair_signs_and_verifies() {
    let passphrase = generate_passphrase(32, true).expect("generates");
    let pair =
        generate_key_pair(DEFAULT_KEY_BITS, Some(passphrase.as_str()), KeyCipher::default()).expect("generates");

    assert!(is_private_key_encrypted(pair.private_pem()));
    assert!(!validate_private_key(pair.private_pem(), None));

    let signer = PayloadSigner::from_pem(pair.private_pem(), Some(passphrase.as_str())).expect("loads");
    let verifier = PayloadVerifier::from_pem(pair.public_pem()).expect("loads");
    let signature = signer.sign(&order()).expect("signs");
    assert!(verifier.verify(&order(), &signature));

    let info = key_info(pair.private_pem(), Some(passphrase.as_str())).expect("inspects");
    assert_eq!((info.bits, info.algorithm, info.encrypted), (2048, "RSA", true));
}

#[test]
fn test_openssl_encrypted_key_reencrypts_with_new_passphrase() {
    let decrypted =
        decrypt_private_key(&fixture("merchant_encrypted.pem"), FIXTURE_PASSPHRASE).expect("decrypts");
    let reencrypted = encrypt_private_key(decrypted.raw_pem(), "rotated-pass", KeyCipher::Aes128Cbc)
        .expect("encrypts");

    assert!(validate_private_key(reencrypted.raw_pem(), Some("rotated-pass")));
    assert!(!validate_private_key(reencrypted.raw_pem(), Some(FIXTURE_PASSPHRASE)));

    let merchant = PayloadVerifier::from_pem(&fixture("merchant_public.pem")).expect("loads");
    let signer = PayloadSigner::from_pem(reencrypted.raw_pem(), Some("rotated-pass")).expect("loads");
    assert!(merchant.verify(&order(), &signer.sign(&order()).expect("signs")));
}

#[test]
fn test_passphrases_use_special_characters() {
    let with_special = (0..10)
        .map(|_| generate_passphrase(32, true).expect("generates"))
        .filter(|p| p.chars().any(|c| !c.is_ascii_alphanumeric()))
        .count();
    assert!(with_special > 0);
}

#[test]
fn test_wrong_and_missing_passphrase_share_message() {
    let encrypted = fixture("merchant_encrypted.pem");
    let wrong = PayloadSigner::from_pem(&encrypted, Some("wrong_passphrase")).unwrap_err();
    let missing = PayloadSigner::from_pem(&encrypted, None).unwrap_err();
    assert_eq!(wrong.to_string(), "invalid private key or incorrect passphrase");
    assert_eq!(wrong, missing);
}
