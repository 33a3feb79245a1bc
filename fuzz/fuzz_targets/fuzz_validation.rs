//! Fuzz testing for product payload validation.
//!
//! Feeds arbitrary bytes through the same steps a request body takes:
//! JSON parsing, create/update validation, then typed deserialization.
//! None of these may panic, and a body that passes validation must always
//! deserialize into its typed payload.
//!
//! ```bash
//! cargo +nightly install cargo-fuzz
//! cargo +nightly fuzz run fuzz_validation -- -max_total_time=60
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use product_api::models::{NewProduct, ProductPatch};
use product_api::validation::{validate_new_product, validate_product_patch};
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<Value>(data) else {
        return;
    };

    if validate_new_product(Some(&value)).is_ok() {
        let typed = serde_json::from_value::<NewProduct>(value.clone());
        assert!(typed.is_ok(), "validated create body failed to deserialize: {typed:?}");
    }

    if validate_product_patch(Some(&value)).is_ok() {
        let typed = serde_json::from_value::<ProductPatch>(value);
        assert!(typed.is_ok(), "validated update body failed to deserialize: {typed:?}");
    }
});
