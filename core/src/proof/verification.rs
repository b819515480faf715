//! Verification of compact multiproofs.

use super::{multi_proof::CompactMultiProof, proof_type::ProofType, MAX_K};
use crate::{
    encoding::LeafEncoding,
    filter::{self, BloomFilter},
    hasher::ChunkHasher,
    tree::Node,
};

use alloc::vec::Vec;
use core::fmt;

/// Errors in compact multiproof verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationError {
    /// A position of the element lies beyond the filter's bit vector.
    IndexOutOfRange(u64),
    /// A presence proof revealed a chunk in which the element's bit is unset.
    PresenceMismatch,
    /// An absence proof revealed a chunk in which the witness bit is set.
    AbsenceMismatch,
    /// The number of chunks or siblings does not fit the proof type and the tree.
    ShapeMismatch,
    /// Two revealed chunks for the same leaf have different values.
    ConflictingChunks,
}

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VerificationError::IndexOutOfRange(position) => {
                write!(f, "position {} exceeds the bloom filter", position)
            }
            VerificationError::PresenceMismatch => write!(
                f,
                "the element is not inside the provided chunks for a presence proof"
            ),
            VerificationError::AbsenceMismatch => write!(
                f,
                "the element is inside the provided chunk for an absence proof"
            ),
            VerificationError::ShapeMismatch => {
                write!(f, "the proof does not have the expected shape")
            }
            VerificationError::ConflictingChunks => {
                write!(f, "the proof reveals conflicting values for the same chunk")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for VerificationError {}

/// Verify a compact multiproof for the element against an expected root.
///
/// The element's positions are recomputed with the filter's mapping function under `seed`; the
/// proof type only selects which of them are covered. The filter is only consulted for its
/// mapping, its hash count and the length of its bit vector, which fixes the shape of the tree.
///
/// Returns `Ok(true)` when the revealed chunks hash up to `root`, in which case the claim of the
/// proof type holds: the element is possibly present, or definitely absent. Returns `Ok(false)`
/// when the recomputed root differs, and an error when the proof is malformed.
pub fn verify<H: ChunkHasher>(
    element: &[u8],
    seed: &[u8],
    proof: &CompactMultiProof,
    root: &Node,
    filter: &impl BloomFilter,
    encoding: &LeafEncoding,
) -> Result<bool, VerificationError> {
    let hash_count = filter.hash_count();
    if hash_count <= 1 || hash_count >= MAX_K as usize {
        return Err(VerificationError::ShapeMismatch);
    }

    let mut positions = filter.map_to_positions(element, seed);
    if positions.len() != hash_count {
        return Err(VerificationError::ShapeMismatch);
    }
    positions.sort_unstable();

    let query = match proof.proof_type() {
        ProofType::Presence => {
            if proof.chunks.len() != hash_count {
                return Err(VerificationError::ShapeMismatch);
            }
            for (&position, &chunk) in positions.iter().zip(&proof.chunks) {
                if !filter::is_bit_set(chunk, position) {
                    return Err(VerificationError::PresenceMismatch);
                }
            }
            positions
        }
        ProofType::Absence(witness) => {
            let position = *positions
                .get(witness as usize)
                .ok_or(VerificationError::ShapeMismatch)?;
            if proof.chunks.len() != 1 {
                return Err(VerificationError::ShapeMismatch);
            }
            if filter::is_bit_set(proof.chunks[0], position) {
                return Err(VerificationError::AbsenceMismatch);
            }
            alloc::vec![position]
        }
    };

    let bit_len = filter.bit_vector().len() as u64;
    if bit_len == 0 {
        return Err(VerificationError::ShapeMismatch);
    }
    let leaf_count = filter::chunk_count(bit_len as usize).next_power_of_two();

    let mut leaves: Vec<(u64, u64)> = Vec::with_capacity(query.len());
    for (&position, &chunk) in query.iter().zip(&proof.chunks) {
        if position >= bit_len {
            return Err(VerificationError::IndexOutOfRange(position));
        }
        leaves.push((filter::chunk_index(position), chunk));
    }
    leaves.sort_unstable_by_key(|&(index, _)| index);

    // positions sharing a chunk must agree on its value, otherwise one chunk could satisfy the
    // bit check while another satisfies the root.
    if leaves
        .windows(2)
        .any(|pair| pair[0].0 == pair[1].0 && pair[0].1 != pair[1].1)
    {
        return Err(VerificationError::ConflictingChunks);
    }
    leaves.dedup();

    let mut layer: Vec<(usize, Node)> = leaves
        .into_iter()
        .map(|(index, chunk)| (index as usize, H::hash_leaf(chunk, index, encoding)))
        .collect();

    let depth = leaf_count.trailing_zeros();
    let mut siblings = proof.siblings.iter();
    for _ in 0..depth {
        let mut next = Vec::with_capacity(layer.len());
        let mut i = 0;
        while i < layer.len() {
            let (index, node) = layer[i];
            let parent = match layer.get(i + 1) {
                Some(&(next_index, ref right)) if next_index == index ^ 1 => {
                    i += 2;
                    H::hash_internal(&node, right)
                }
                _ => {
                    let sibling = siblings.next().ok_or(VerificationError::ShapeMismatch)?;
                    i += 1;
                    if index % 2 == 0 {
                        H::hash_internal(&node, sibling)
                    } else {
                        H::hash_internal(sibling, &node)
                    }
                }
            };
            next.push((index / 2, parent));
        }
        layer = next;
    }

    if siblings.next().is_some() {
        return Err(VerificationError::ShapeMismatch);
    }

    Ok(matches!(layer.as_slice(), [(_, node)] if node == root))
}

#[cfg(test)]
mod tests {
    use super::{verify, VerificationError};
    use crate::{
        encoding::LeafEncoding,
        filter::{BitVector, BloomFilter},
        hasher::Blake3Hasher,
        proof::{CompactMultiProof, ProofType},
        tree::HashTree,
    };

    use bitvec::prelude::*;

    // a filter whose positions for an element are given explicitly, ignoring the seed.
    struct FixedFilter {
        bits: BitVec<u64, Lsb0>,
        positions: Vec<u64>,
    }

    impl FixedFilter {
        fn new(bit_len: usize, set: &[u64], positions: &[u64]) -> Self {
            let mut bits = BitVec::repeat(false, bit_len);
            for &p in set {
                bits.set(p as usize, true);
            }
            FixedFilter {
                bits,
                positions: positions.to_vec(),
            }
        }
    }

    impl BloomFilter for FixedFilter {
        fn bit_vector(&self) -> &BitVector {
            &self.bits
        }

        fn proof(&self, _element: &[u8]) -> (Vec<u64>, bool) {
            let present = self.positions.iter().all(|&p| self.bits[p as usize]);
            (self.positions.clone(), present)
        }

        fn map_to_positions(&self, _element: &[u8], _seed: &[u8]) -> Vec<u64> {
            self.positions.clone()
        }

        fn hash_count(&self) -> usize {
            self.positions.len()
        }
    }

    fn prove(filter: &FixedFilter) -> (HashTree, CompactMultiProof) {
        let tree = HashTree::build::<Blake3Hasher>(filter, LeafEncoding::default()).unwrap();
        let proof = CompactMultiProof::generate::<Blake3Hasher>(&tree, filter, b"x").unwrap();
        (tree, proof)
    }

    fn check(
        filter: &FixedFilter,
        proof: &CompactMultiProof,
        tree: &HashTree,
    ) -> Result<bool, VerificationError> {
        verify::<Blake3Hasher>(
            b"x",
            b"seed",
            proof,
            &tree.root(),
            filter,
            &LeafEncoding::default(),
        )
    }

    #[test]
    fn presence_round_trip() {
        let filter = FixedFilter::new(640, &[3, 70, 71, 600], &[600, 3, 71]);
        let (tree, proof) = prove(&filter);
        assert_eq!(proof.proof_type(), ProofType::Presence);
        assert_eq!(proof.chunks.len(), 3);
        assert_eq!(check(&filter, &proof, &tree), Ok(true));
    }

    #[test]
    fn absence_round_trip() {
        let filter = FixedFilter::new(640, &[3, 600], &[600, 3, 71]);
        let (tree, proof) = prove(&filter);

        // ascending positions are [3, 71, 600]; 71 is the first unset.
        assert_eq!(proof.proof_type(), ProofType::Absence(1));
        assert_eq!(proof.chunks, vec![0]);
        assert_eq!(check(&filter, &proof, &tree), Ok(true));
    }

    #[test]
    fn positions_sharing_a_chunk() {
        let filter = FixedFilter::new(256, &[1, 2, 63], &[1, 2, 63]);
        let (tree, proof) = prove(&filter);
        assert_eq!(proof.chunks.len(), 3);
        assert_eq!(check(&filter, &proof, &tree), Ok(true));
    }

    #[test]
    fn conflicting_chunks_are_rejected() {
        let filter = FixedFilter::new(256, &[1, 2], &[1, 2]);
        let (tree, mut proof) = prove(&filter);
        proof.chunks[1] |= 1 << 40;
        assert_eq!(
            check(&filter, &proof, &tree),
            Err(VerificationError::ConflictingChunks)
        );
    }

    #[test]
    fn presence_code_with_fewer_chunks_is_rejected() {
        let filter = FixedFilter::new(640, &[3, 70, 71, 600], &[600, 3, 71]);
        let (tree, mut proof) = prove(&filter);
        proof.chunks.pop();
        assert_eq!(
            check(&filter, &proof, &tree),
            Err(VerificationError::ShapeMismatch)
        );
    }

    #[test]
    fn absence_code_with_set_bit_is_rejected() {
        let filter = FixedFilter::new(640, &[3, 600], &[600, 3, 71]);
        let (tree, mut proof) = prove(&filter);

        // point the witness at position 3 and reveal its chunk, where it is set.
        proof.proof_type = 0;
        proof.chunks = vec![1 << 3];
        assert_eq!(
            check(&filter, &proof, &tree),
            Err(VerificationError::AbsenceMismatch)
        );
    }

    #[test]
    fn substituted_chunk_fails() {
        let filter = FixedFilter::new(640, &[3, 600], &[600, 3, 71]);
        let (tree, mut proof) = prove(&filter);

        // still unset at the witness, but not the chunk in the tree.
        proof.chunks[0] = 1;
        assert_eq!(check(&filter, &proof, &tree), Ok(false));
    }

    #[test]
    fn witness_beyond_k_is_rejected() {
        let filter = FixedFilter::new(640, &[3, 600], &[600, 3, 71]);
        let (tree, mut proof) = prove(&filter);
        proof.proof_type = 3;
        assert_eq!(
            check(&filter, &proof, &tree),
            Err(VerificationError::ShapeMismatch)
        );
    }

    #[test]
    fn missing_and_extra_siblings_are_rejected() {
        let filter = FixedFilter::new(640, &[3, 600], &[600, 3, 71]);
        let (tree, proof) = prove(&filter);

        let mut short = proof.clone();
        short.siblings.pop();
        assert_eq!(
            check(&filter, &short, &tree),
            Err(VerificationError::ShapeMismatch)
        );

        let mut long = proof.clone();
        long.siblings.push([0; 32]);
        assert_eq!(
            check(&filter, &long, &tree),
            Err(VerificationError::ShapeMismatch)
        );
    }

    #[test]
    fn flipped_sibling_bit_fails() {
        let filter = FixedFilter::new(1024, &[3, 70, 71, 600], &[600, 3, 71]);
        let (tree, proof) = prove(&filter);
        assert!(!proof.siblings.is_empty());
        for i in 0..proof.siblings.len() {
            for bit in [0, 77, 255] {
                let mut tampered = proof.clone();
                tampered.siblings[i][bit / 8] ^= 1 << (bit % 8);
                assert_eq!(check(&filter, &tampered, &tree), Ok(false));
            }
        }
    }

    #[test]
    fn wrong_root_fails() {
        let filter = FixedFilter::new(640, &[3, 70, 71, 600], &[600, 3, 71]);
        let (_, proof) = prove(&filter);
        let other = FixedFilter::new(640, &[3, 70, 71, 600, 601], &[600, 3, 71]);
        let other_tree = HashTree::build::<Blake3Hasher>(&other, LeafEncoding::default()).unwrap();
        assert_eq!(check(&filter, &proof, &other_tree), Ok(false));
    }

    #[test]
    fn single_chunk_filter() {
        let filter = FixedFilter::new(64, &[5, 9], &[9, 5]);
        let (tree, proof) = prove(&filter);
        assert!(proof.siblings.is_empty());
        assert_eq!(check(&filter, &proof, &tree), Ok(true));
    }

    #[test]
    fn position_beyond_bit_vector_is_rejected() {
        let filter = FixedFilter::new(128, &[5], &[5, 9]);
        let (tree, proof) = prove(&filter);

        // the witness is the second position, which the lying filter moves out of range.
        assert_eq!(proof.proof_type(), ProofType::Absence(1));
        let lying = FixedFilter::new(128, &[5], &[5, 300]);
        assert_eq!(
            check(&lying, &proof, &tree),
            Err(VerificationError::IndexOutOfRange(300))
        );
    }

    #[test]
    fn encoding_width_is_part_of_format() {
        let filter = FixedFilter::new(640, &[3, 70, 71, 600], &[600, 3, 71]);
        let (tree, proof) = prove(&filter);
        let narrow = LeafEncoding::new(8).unwrap();
        assert_eq!(
            verify::<Blake3Hasher>(b"x", b"seed", &proof, &tree.root(), &filter, &narrow),
            Ok(false)
        );
    }
}
