#![no_main]

use bloomtree::CompactMultiProof;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(proof) = CompactMultiProof::decode(data) {
        assert_eq!(proof.encode(), data);
    }
});
