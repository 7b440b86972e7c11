//! Fuzz target for contract state validation
//!
//! This target ensures relay payloads of any shape are either rejected with
//! an error or produce a snapshot whose supply does not exceed its cap.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mintgate_client::{ContractSnapshot, RawContractState};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = serde_json::from_slice::<RawContractState>(data) else {
        return;
    };
    if let Ok(snapshot) = ContractSnapshot::try_from(raw) {
        assert!(snapshot.current_supply <= snapshot.total_supply);
        assert!(snapshot.max_mint_per_wallet > 0);
        assert_eq!(
            snapshot.remaining_supply(),
            snapshot.total_supply - snapshot.current_supply
        );
    }
});
