//! Generate a compact multiproof for an element of the filter.
//!
//! The multiproof contains the minimum information needed to recompute the root from the
//! revealed chunks: sibling digests are emitted only where they cannot be derived from other
//! revealed leaves.

use super::proof_type::ProofType;
use crate::{
    filter::{self, BloomFilter},
    hasher::ChunkHasher,
    tree::{HashTree, Node},
};

use alloc::{vec, vec::Vec};
use borsh::{BorshDeserialize, BorshSerialize};
use core::fmt;

/// A proof that an element is possibly a member, or definitely not a member, of a filter.
#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
pub struct CompactMultiProof {
    /// Revealed chunk values, in query order: one per position of the element for a presence
    /// proof, in ascending position order, or the single witness chunk for an absence proof.
    pub chunks: Vec<u64>,
    /// Sibling digests which cannot be derived from the revealed chunks.
    ///
    /// Ordered by layer from the leaves upwards, then ascending by position within a layer.
    pub siblings: Vec<Node>,
    /// The proof-type byte. See [`ProofType`].
    pub proof_type: u8,
}

impl CompactMultiProof {
    /// Generate a proof for the element.
    ///
    /// Asks the filter whether the element is possibly present. If so, all of the element's
    /// positions are proven. If not, the first position (in ascending order) whose bit is unset is
    /// proven as a witness of absence.
    ///
    /// The filter must be the one the tree was built from, unchanged since.
    pub fn generate<H: ChunkHasher>(
        tree: &HashTree,
        filter: &impl BloomFilter,
        element: &[u8],
    ) -> Result<Self, ProveError> {
        let bits = filter.bit_vector();
        if filter::chunk_count(bits.len()) != tree.chunk_count() {
            return Err(ProveError::FilterMismatch);
        }

        let (mut positions, present) = filter.proof(element);
        if positions.len() != tree.hash_count() {
            return Err(ProveError::ShapeMismatch);
        }
        positions.sort_unstable();

        let bit_len = bits.len() as u64;
        if let Some(&position) = positions.iter().find(|&&p| p >= bit_len) {
            return Err(ProveError::IndexOutOfRange(position));
        }

        let (query, proof_type) = if present {
            if positions.iter().any(|&p| !bits[p as usize]) {
                return Err(ProveError::PresenceMismatch);
            }
            (positions, ProofType::Presence)
        } else {
            let witness = positions
                .iter()
                .position(|&p| !bits[p as usize])
                .ok_or(ProveError::AbsenceMismatch)?;
            let witness_byte = u8::try_from(witness).map_err(|_| ProveError::ShapeMismatch)?;
            (vec![positions[witness]], ProofType::Absence(witness_byte))
        };

        let mut chunks = Vec::with_capacity(query.len());
        let mut chunk_indices = Vec::with_capacity(query.len());
        for &position in &query {
            let index = filter::chunk_index(position);
            let chunk =
                filter::chunk_at(bits, index).ok_or(ProveError::IndexOutOfRange(position))?;

            // catch a filter which changed after the tree was built.
            let leaf = tree.leaf(index as usize);
            if leaf != Some(&H::hash_leaf(chunk, index, tree.encoding())) {
                return Err(ProveError::FilterMismatch);
            }

            chunks.push(chunk);
            chunk_indices.push(index);
        }

        let siblings = tree.prove_chunks(&chunk_indices)?;
        let proof_type = proof_type.to_byte().ok_or(ProveError::ShapeMismatch)?;

        Ok(CompactMultiProof {
            chunks,
            siblings,
            proof_type,
        })
    }

    /// The decoded proof type.
    pub fn proof_type(&self) -> ProofType {
        ProofType::from_byte(self.proof_type)
    }

    /// Whether this claims that the element is possibly present.
    pub fn is_presence(&self) -> bool {
        self.proof_type().is_presence()
    }
}

impl HashTree {
    /// Produce the sibling digests needed to recompute the root from the given leaves.
    ///
    /// Duplicate indices are allowed and collapse into one. Siblings are emitted only when they
    /// are not themselves among the known nodes of the layer; the output is ordered by layer from
    /// the leaves upwards, then ascending by position within the layer.
    ///
    /// Padding leaves may be proven like any other leaf.
    pub fn prove_chunks(&self, indices: &[u64]) -> Result<Vec<Node>, ProveError> {
        let leaf_count = self.leaf_count();
        let mut active = Vec::with_capacity(indices.len());
        for &index in indices {
            match usize::try_from(index) {
                Ok(i) if i < leaf_count => active.push(i),
                _ => return Err(ProveError::IndexOutOfRange(index)),
            }
        }
        active.sort_unstable();
        active.dedup();

        let nodes = self.nodes();
        let mut siblings = Vec::new();
        for offset in self.layer_offsets().take(self.depth()) {
            let mut next = Vec::with_capacity(active.len());
            let mut i = 0;
            while i < active.len() {
                let index = active[i];
                let sibling = index ^ 1;

                // `active` is sorted, so an odd index with a known sibling has already been
                // consumed together with it.
                if active.get(i + 1) == Some(&sibling) {
                    i += 2;
                } else {
                    siblings.push(nodes[offset + sibling]);
                    i += 1;
                }

                next.push(index / 2);
            }
            active = next;
        }

        Ok(siblings)
    }
}

/// Errors in compact multiproof generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProveError {
    /// A bit position or leaf index lies beyond the tree.
    IndexOutOfRange(u64),
    /// The filter returned a number of positions other than its hash count.
    ShapeMismatch,
    /// The filter claimed presence, but one of the positions is unset.
    PresenceMismatch,
    /// The filter claimed absence, but all of the positions are set.
    AbsenceMismatch,
    /// The filter's bit vector no longer matches the tree.
    FilterMismatch,
}

impl fmt::Display for ProveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProveError::IndexOutOfRange(index) => {
                write!(f, "index {} exceeds the bloom filter", index)
            }
            ProveError::ShapeMismatch => {
                write!(f, "the bloom filter returned an unexpected number of positions")
            }
            ProveError::PresenceMismatch => {
                write!(f, "the bloom filter claimed presence but a position is unset")
            }
            ProveError::AbsenceMismatch => {
                write!(f, "the bloom filter claimed absence but all positions are set")
            }
            ProveError::FilterMismatch => {
                write!(f, "the bloom filter does not match the tree it was built into")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProveError {}
