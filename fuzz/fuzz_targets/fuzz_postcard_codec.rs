//! Fuzz target for postcard codec roundtrip.
//!
//! Arbitrary bytes decoded as transaction bodies, keys or stored records must
//! never panic, and anything that decodes must survive a roundtrip.

#![no_main]

use libfuzzer_sys::fuzz_target;

use ledger_sigs_state::{AccountRecord, FileRecord, ScheduleRecord, TokenRecord};
use ledger_sigs_types::codec::{decode, encode};
use ledger_sigs_types::{KeyList, KeyNode, LeafKey, Transaction, TransactionBody};

fuzz_target!(|data: &[u8]| {
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };

    match selector % 9 {
        0 => try_roundtrip::<LeafKey>(payload),
        1 => try_roundtrip::<KeyNode>(payload),
        2 => try_roundtrip::<KeyList>(payload),
        3 => try_roundtrip::<TransactionBody>(payload),
        4 => try_roundtrip::<Transaction>(payload),
        5 => try_roundtrip::<AccountRecord>(payload),
        6 => try_roundtrip::<FileRecord>(payload),
        7 => try_roundtrip::<TokenRecord>(payload),
        _ => try_roundtrip::<ScheduleRecord>(payload),
    }
});

/// Decodes `data` as `T`; on success, re-encodes and checks the value
/// survives.
fn try_roundtrip<T>(data: &[u8])
where
    T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
{
    if let Ok(value) = decode::<T>(data) {
        let re_encoded = encode(&value);
        assert!(re_encoded.is_ok(), "encode failed after successful decode");

        let re_decoded = decode::<T>(&re_encoded.expect("already checked"));
        assert!(re_decoded.is_ok(), "re-decode failed after successful encode");
        assert_eq!(value, re_decoded.expect("already checked"), "roundtrip mismatch");
    }
}
