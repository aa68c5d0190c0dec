//! Fuzz target for key tree decoding and canonical equality.
//!
//! Any key that decodes must respect the depth cap, be equal up to
//! decodability to itself and to its canonical form, and have an idempotent
//! canonical form.

#![no_main]

use libfuzzer_sys::fuzz_target;

use ledger_sigs_types::codec::decode;
use ledger_sigs_types::{KeyNode, MAX_KEY_DEPTH};

fuzz_target!(|data: &[u8]| {
    let Ok(key) = decode::<KeyNode>(data) else {
        return;
    };

    assert!(key.depth() <= MAX_KEY_DEPTH, "decoded key exceeds depth cap");
    assert!(key.leaf_count() >= 1, "decoded key has no leaves");
    assert!(key.equal_up_to_decodability(&key), "key not equal to itself");

    let canonical = key.canonical();
    assert_eq!(canonical.canonical(), canonical, "canonical form not idempotent");
    assert!(key.equal_up_to_decodability(&canonical), "key differs from its canonical form");
    assert_eq!(canonical.depth(), key.depth());
});
