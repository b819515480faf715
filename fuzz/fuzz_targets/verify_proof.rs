#![no_main]

use std::sync::OnceLock;

use arbitrary::Arbitrary;
use bloomtree::{BloomFilter, BloomTree, CompactMultiProof, DistBloomFilter, Options, Sha2Hasher};
use libfuzzer_sys::fuzz_target;

const SEED: &[u8] = b"fuzz seed";

type Tree = BloomTree<DistBloomFilter, Sha2Hasher>;

#[derive(Debug, Arbitrary)]
struct Run {
    element: Vec<u8>,
    chunks: Vec<u64>,
    siblings: Vec<[u8; 32]>,
    proof_type: u8,
}

fn tree() -> &'static Tree {
    static TREE: OnceLock<Tree> = OnceLock::new();
    TREE.get_or_init(|| {
        let mut dbf = DistBloomFilter::with_params(1000, 4, SEED);
        for i in 0u32..64 {
            dbf.add(&i.to_le_bytes());
        }
        BloomTree::new(dbf, Options::new()).unwrap()
    })
}

fuzz_target!(|run: Run| {
    let tree = tree();
    let proof = CompactMultiProof {
        chunks: run.chunks,
        siblings: run.siblings,
        proof_type: run.proof_type,
    };

    // an accepted proof must agree with the filter.
    if let Ok(true) = tree.verify_compact_multi_proof(&run.element, SEED, &proof, &tree.root()) {
        let (_, present) = tree.bloom_filter().proof(&run.element);
        assert_eq!(proof.is_presence(), present);
    }
});
