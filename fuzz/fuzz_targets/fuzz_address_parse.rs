//! Fuzz target for address parsing
//!
//! This target ensures parsing:
//! 1. Never panics on arbitrary strings
//! 2. Never yields the zero address
//! 3. Round-trips through the checksummed form

#![no_main]

use libfuzzer_sys::fuzz_target;
use mintgate_primitives::Address;

fuzz_target!(|data: &str| {
    if let Ok(address) = Address::parse(data) {
        assert_ne!(address.as_bytes(), &[0u8; 20]);

        let checksummed = address.to_checksum();
        assert_eq!(Address::parse(&checksummed), Ok(address));
        assert_eq!(address.to_string(), checksummed);
    }
});
