//! Fuzz target for payload parsing and canonical serialization.
//!
//! # Running
//!
//! ```bash
//! cargo +nightly fuzz run canonical_payload
//! ```
//!
//! Checks, for any byte input that parses as a JSON object:
//! - canonicalization never panics
//! - the output does not depend on object key order
//! - the `x-sign` field never contributes to the output

#![no_main]

use libfuzzer_sys::fuzz_target;
use novapay_core::{canonicalize, Payload, SIGNATURE_FIELD};

fuzz_target!(|data: &[u8]| {
    let Ok(payload) = Payload::from_json_slice(data) else {
        return;
    };
    let canonical = canonicalize(&payload);

    // Re-serializing goes through serde_json's map order, not the input's.
    if let Ok(json) = payload.to_json() {
        let reparsed = Payload::from_json_slice(json.as_bytes())
            .expect("serialized payload parses");
        assert_eq!(canonicalize(&reparsed), canonical);
    }

    let signed = payload.clone().with(SIGNATURE_FIELD, "fuzz-signature");
    assert_eq!(canonicalize(&signed), canonical);
});
