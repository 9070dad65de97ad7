//! End-to-end tests over the public API.

mod envelope_formats_test;
mod key_lifecycle_test;
mod signing_flow_test;
