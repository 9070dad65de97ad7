//! Canonical serialization of payloads for signing.
//!
//! Signer and verifier must derive byte-identical input from the same logical
//! payload. The form used here is version 1 of the gateway wire contract:
//!
//! - fields sorted by key in byte order
//! - the reserved [`SIGNATURE_FIELD`] removed at every nesting level
//! - each field rendered as `key=value`, fields joined with `&`
//!
//! Values render as follows:
//!
//! | Value           | Rendering                                  |
//! |-----------------|--------------------------------------------|
//! | string          | verbatim                                   |
//! | boolean         | `true` / `false`                           |
//! | null            | empty                                      |
//! | integer         | base-10                                    |
//! | float           | shortest round-trip decimal (`250`, `0.5`) |
//! | nested object   | its own canonical form, unbracketed        |
//! | array           | elements keyed by index: `0=a&1=b`         |
//!
//! Changing any of these rules breaks every signature exchanged with the
//! gateway; bump [`WIRE_CONTRACT_VERSION`] and coordinate with the
//! counterparty first.
//!
//! # Example
//!
//! ```
//! use novapay_core::canonical::canonicalize;
//! use novapay_core::payload::Payload;
//!
//! let payload = Payload::new()
//!     .with("currency", "UAH")
//!     .with("amount", 100)
//!     .with("x-sign", "ignored");
//!
//! assert_eq!(canonicalize(&payload), b"amount=100&currency=UAH");
//! ```

use crate::payload::{Payload, Value};

/// Name of the field (and HTTP header) that carries the signature.
pub const SIGNATURE_FIELD: &str = "x-sign";

/// Version of the canonicalization and digest contract shared with the gateway.
///
/// Version 1 renders nested objects and arrays unbracketed and leaves `=`
/// and `&` in strings unescaped, so distinct payloads can share canonical
/// bytes: `{"a":"b=c"}` and `{"a":{"b":"c"}}` both become `a=b=c`. A
/// version 2 should bracket nested values or escape separators.
pub const WIRE_CONTRACT_VERSION: u32 = 1;

const FIELD_SEPARATOR: char = '&';
const KEY_VALUE_SEPARATOR: char = '=';

/// Produce the canonical signing input for a payload.
#[must_use]
pub fn canonicalize(payload: &Payload) -> Vec<u8> {
    canonical_string(payload).into_bytes()
}

/// Produce the canonical signing input as text.
#[must_use]
pub fn canonical_string(payload: &Payload) -> String {
    let mut out = String::new();
    write_object(&mut out, payload);
    out
}

fn write_object(out: &mut String, payload: &Payload) {
    // `Payload` iterates in key order.
    let mut first = true;
    for (key, value) in payload.iter().filter(|(k, _)| k.as_str() != SIGNATURE_FIELD) {
        if !first {
            out.push(FIELD_SEPARATOR);
        }
        first = false;
        out.push_str(key);
        out.push(KEY_VALUE_SEPARATOR);
        write_value(out, value);
    }
}

fn write_array(out: &mut String, items: &[Value]) {
    for (index, value) in items.iter().enumerate() {
        if index > 0 {
            out.push(FIELD_SEPARATOR);
        }
        out.push_str(&index.to_string());
        out.push(KEY_VALUE_SEPARATOR);
        write_value(out, value);
    }
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(s),
        Value::Array(items) => write_array(out, items),
        Value::Object(nested) => write_object(out, nested),
    }
}
