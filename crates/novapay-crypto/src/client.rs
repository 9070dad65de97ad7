//! The signing side of a gateway client.
//!
//! [`SigningClient`] pairs the merchant's signer with the gateway's public
//! key and offers the two operations a transport needs: sign an outgoing
//! payload, and verify an incoming body. It performs no I/O of its own.

use chrono::Utc;
use novapay_core::config::{Config, Environment};
use novapay_core::error::{NovaPayError, PayloadError, SignError};
use novapay_core::payload::Payload;
use novapay_core::SIGNATURE_FIELD;

use crate::material::KeyMaterial;
use crate::signer::{PayloadSigner, PayloadVerifier, Signature};

const CONTENT_TYPE_JSON: &str = "application/json";
const SELF_TEST_PROBE: &[u8] = b"novapay-key-check";

/// A JSON body together with its signature, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// JSON request body.
    pub body: String,
    /// Signature over the canonical form of the body's payload.
    pub signature: Signature,
    header: String,
}

impl SignedRequest {
    /// Name of the header that carries the signature.
    #[must_use]
    pub fn signature_header(&self) -> &str {
        &self.header
    }

    /// Headers to attach to the request.
    #[must_use]
    pub fn headers(&self) -> [(&str, &str); 2] {
        [
            ("Content-Type", CONTENT_TYPE_JSON),
            (self.header.as_str(), self.signature.as_str()),
        ]
    }
}

/// Outcome of [`SigningClient::self_test`].
#[derive(Debug, Clone, PartialEq)]
pub struct SelfTest {
    /// The payload that was signed.
    pub payload: Payload,
    /// The signature produced for it.
    pub signature: Signature,
    /// Whether the signature verified against the merchant's own public key.
    pub verified: bool,
}

/// Signs outgoing payloads and verifies incoming ones.
#[derive(Debug, Clone)]
pub struct SigningClient {
    signer: PayloadSigner,
    gateway: PayloadVerifier,
    environment: Environment,
    signature_header: String,
}

impl SigningClient {
    /// Create a client for the sandbox environment with the default header.
    #[must_use]
    pub fn new(signer: PayloadSigner, gateway: PayloadVerifier) -> Self {
        Self {
            signer,
            gateway,
            environment: Environment::default(),
            signature_header: SIGNATURE_FIELD.to_string(),
        }
    }

    /// Build a client from configuration, reading both keys from their sources.
    ///
    /// # Errors
    ///
    /// Returns [`NovaPayError::Config`] if a key cannot be read and
    /// [`NovaPayError::Key`] if it cannot be loaded.
    pub fn from_config(config: &Config, passphrase: Option<&str>) -> Result<Self, NovaPayError> {
        let private_pem = config.keys.private_key_source().read()?;
        let gateway_pem = config.keys.gateway_public_key_source().read()?;

        let signer = PayloadSigner::new(KeyMaterial::load_private(&private_pem, passphrase)?)?;
        let gateway = PayloadVerifier::from_pem(&gateway_pem)?;
        tracing::info!(
            environment = %config.gateway.environment,
            bits = signer.material().bits(),
            "signing client ready"
        );

        Ok(Self::new(signer, gateway)
            .with_environment(config.gateway.environment)
            .with_signature_header(config.gateway.signature_header.clone()))
    }

    /// Set the gateway environment.
    #[must_use]
    pub const fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set the header name used for signatures.
    #[must_use]
    pub fn with_signature_header(mut self, header: impl Into<String>) -> Self {
        self.signature_header = header.into();
        self
    }

    /// The configured environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Gateway base URL for the configured environment.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        self.environment.base_url()
    }

    /// Sign `payload` and serialize it as the request body.
    ///
    /// # Errors
    ///
    /// Returns [`NovaPayError::Sign`] if signing fails and
    /// [`NovaPayError::Payload`] if the payload cannot be serialized.
    pub fn sign_outgoing(&self, payload: &Payload) -> Result<SignedRequest, NovaPayError> {
        let signature = self.signer.sign(payload)?;
        let body = payload.to_json()?;
        Ok(SignedRequest {
            body,
            signature,
            header: self.signature_header.clone(),
        })
    }

    /// Verify a JSON body received from the gateway.
    ///
    /// # Errors
    ///
    /// Returns a [`PayloadError`] if the body is not a JSON object. A
    /// signature that does not match is `Ok(false)`.
    pub fn verify_incoming(&self, body: &[u8], signature: &str) -> Result<bool, PayloadError> {
        let payload = Payload::from_json_slice(body)?;
        Ok(self.verify_callback(&payload, signature))
    }

    /// Verify a callback payload against the gateway's public key.
    #[must_use]
    pub fn verify_callback(&self, payload: &Payload, signature: &str) -> bool {
        let valid = self.gateway.verify(payload, &Signature::from(signature));
        if !valid {
            tracing::warn!("callback signature rejected");
        }
        valid
    }

    /// Whether the private key produces signatures its own public half accepts.
    #[must_use]
    pub fn validate_private_key(&self) -> bool {
        let Ok(own) = self.signer.verifier() else {
            return false;
        };
        self.signer
            .sign_canonical(SELF_TEST_PROBE)
            .is_ok_and(|signature| own.verify_canonical(SELF_TEST_PROBE, &signature))
    }

    /// Whether the private key was loaded from an encrypted PEM.
    #[must_use]
    pub const fn is_private_key_encrypted(&self) -> bool {
        self.signer.material().is_encrypted()
    }

    /// Sign a timestamped test payload and check it against the merchant's
    /// own public key.
    ///
    /// # Errors
    ///
    /// Returns [`SignError`] if signing fails or the public key cannot be derived.
    pub fn self_test(&self) -> Result<SelfTest, SignError> {
        let payload = Payload::new()
            .with("test", "data")
            .with("timestamp", Utc::now().timestamp());
        let signature = self.signer.sign(&payload)?;
        let verified = self.signer.verifier()?.verify(&payload, &signature);
        tracing::info!(verified, "signing self-test finished");
        Ok(SelfTest {
            payload,
            signature,
            verified,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use novapay_core::config::KeysConfig;

    const MERCHANT: &str = include_str!("../tests/fixtures/merchant_pkcs8.pem");
    const MERCHANT_ENCRYPTED: &str = include_str!("../tests/fixtures/merchant_encrypted.pem");
    const GATEWAY_PRIVATE: &str = include_str!("../tests/fixtures/gateway_pkcs8.pem");
    const GATEWAY_PUBLIC: &str = include_str!("../tests/fixtures/gateway_public.pem");
    const PASSPHRASE: &str = "merchant-fixture-pass";

    fn client() -> SigningClient {
        SigningClient::new(
            PayloadSigner::from_pem(MERCHANT, None).unwrap(),
            PayloadVerifier::from_pem(GATEWAY_PUBLIC).unwrap(),
        )
    }

    fn gateway_signer() -> PayloadSigner {
        PayloadSigner::from_pem(GATEWAY_PRIVATE, None).unwrap()
    }

    #[test]
    fn test_sign_outgoing_builds_body_and_headers() {
        let payload = Payload::new().with("merchant_id", "m1").with("amount", 100.5);
        let request = client().sign_outgoing(&payload).unwrap();

        assert_eq!(request.body, r#"{"amount":100.5,"merchant_id":"m1"}"#);
        let headers = request.headers();
        assert_eq!(headers[0], ("Content-Type", "application/json"));
        assert_eq!(headers[1].0, "x-sign");
        assert_eq!(headers[1].1, request.signature.as_str());
    }

    #[test]
    fn test_outgoing_signature_verifies_with_merchant_public_key() {
        let client = client();
        let payload = Payload::new().with("amount", 100).with("currency", "UAH");
        let request = client.sign_outgoing(&payload).unwrap();

        let merchant_public = PayloadSigner::from_pem(MERCHANT, None)
            .unwrap()
            .verifier()
            .unwrap();
        let received = Payload::from_json_slice(request.body.as_bytes()).unwrap();
        assert!(merchant_public.verify(&received, &request.signature));
    }

    #[test]
    fn test_verify_incoming_gateway_body() {
        let body = br#"{"status":"paid","session_id":"s-1","amount":250.0}"#;
        let payload = Payload::from_json_slice(body).unwrap();
        let signature = gateway_signer().sign(&payload).unwrap();

        assert_eq!(client().verify_incoming(body, signature.as_str()), Ok(true));
    }

    #[test]
    fn test_verify_incoming_rejects_tampered_body() {
        let body = br#"{"status":"paid","amount":250}"#;
        let signature = gateway_signer()
            .sign(&Payload::from_json_slice(body).unwrap())
            .unwrap();

        let tampered = br#"{"status":"paid","amount":2500}"#;
        assert_eq!(client().verify_incoming(tampered, signature.as_str()), Ok(false));
    }

    #[test]
    fn test_verify_incoming_malformed_body() {
        let err = client().verify_incoming(b"[1,2,3]", "sig").unwrap_err();
        assert!(matches!(err, PayloadError::NotAnObject { .. }));
        assert!(client().verify_incoming(b"{not json", "sig").is_err());
    }

    #[test]
    fn test_verify_callback_with_embedded_signature_field() {
        let payload = Payload::new().with("status", "paid");
        let signature = gateway_signer().sign(&payload).unwrap();
        let echoed = payload.with("x-sign", signature.as_str());
        assert!(client().verify_callback(&echoed, signature.as_str()));
    }

    #[test]
    fn test_merchant_signature_is_not_a_gateway_signature() {
        let payload = Payload::new().with("status", "paid");
        let client = client();
        let own = client.sign_outgoing(&payload).unwrap();
        assert!(!client.verify_callback(&payload, own.signature.as_str()));
    }

    #[test]
    fn test_self_test_and_validation() {
        let client = SigningClient::new(
            PayloadSigner::from_pem(MERCHANT_ENCRYPTED, Some(PASSPHRASE)).unwrap(),
            PayloadVerifier::from_pem(GATEWAY_PUBLIC).unwrap(),
        );
        assert!(client.validate_private_key());
        assert!(client.is_private_key_encrypted());

        let result = client.self_test().unwrap();
        assert!(result.verified);
        assert!(result.payload.contains_key("timestamp"));
    }

    #[test]
    fn test_unencrypted_key_reported() {
        assert!(!client().is_private_key_encrypted());
    }

    #[test]
    fn test_environment_and_header_settings() {
        let client = client()
            .with_environment(Environment::Production)
            .with_signature_header("X-Signature");
        assert_eq!(client.base_url(), "https://api-ecom.novapay.ua/v1");

        let request = client.sign_outgoing(&Payload::new().with("a", 1)).unwrap();
        assert_eq!(request.signature_header(), "X-Signature");
    }

    #[test]
    fn test_from_config_with_inline_keys() {
        let config = Config {
            keys: KeysConfig {
                private_key: MERCHANT_ENCRYPTED.to_string(),
                gateway_public_key: GATEWAY_PUBLIC.to_string(),
                ..KeysConfig::default()
            },
            ..Config::default()
        };
        let client = SigningClient::from_config(&config, Some(PASSPHRASE)).unwrap();
        assert_eq!(client.environment(), Environment::Sandbox);
        assert!(client.validate_private_key());

        let err = SigningClient::from_config(&config, Some("wrong_passphrase")).unwrap_err();
        assert!(matches!(
            err,
            NovaPayError::Key(novapay_core::KeyError::WrongPassphrase)
        ));
    }

    #[test]
    fn test_from_config_missing_key_file() {
        let config = Config {
            keys: KeysConfig {
                private_key: "/nonexistent/novapay/merchant.pem".to_string(),
                ..KeysConfig::default()
            },
            ..Config::default()
        };
        let err = SigningClient::from_config(&config, None).unwrap_err();
        assert!(matches!(err, NovaPayError::Config(_)));
    }
}
