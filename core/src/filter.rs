//! The capabilities a Bloom filter must expose to be authenticated by a [`HashTree`].
//!
//! [`HashTree`]: crate::tree::HashTree

use alloc::vec::Vec;
use bitvec::prelude::*;

/// The number of bits in a chunk. The bit vector of a filter is split into chunks of this width,
/// and the chunk holding bit position `p` is the one with index `p / CHUNK_BITS`.
pub const CHUNK_BITS: u64 = 64;

/// The bit vector of a Bloom filter.
pub type BitVector = BitSlice<u64, Lsb0>;

/// A read-only view over a Bloom filter.
///
/// All methods must be pure: the tree and proof logic may call them any number of times and
/// expects consistent answers.
pub trait BloomFilter {
    /// The bit vector of the filter.
    fn bit_vector(&self) -> &BitVector;

    /// Map an element to its bit positions and report whether it is possibly present.
    ///
    /// The returned positions are the `k` positions of the element under the filter's own seed,
    /// in the same order as [`BloomFilter::map_to_positions`]. The flag is `true` iff all of them
    /// are set, in which case the element may be a false positive. When it is `false` at least
    /// one of the positions is unset.
    fn proof(&self, element: &[u8]) -> (Vec<u64>, bool);

    /// Map an element to its `k` bit positions under the given seed.
    ///
    /// This is deterministic and is what the verifier relies on instead of trusting any position
    /// carried by a proof.
    fn map_to_positions(&self, element: &[u8], seed: &[u8]) -> Vec<u64>;

    /// The number of bit positions an element maps to.
    fn hash_count(&self) -> usize;
}

/// The number of chunks covering a bit vector of the given length.
pub fn chunk_count(bit_len: usize) -> usize {
    bit_len.div_ceil(CHUNK_BITS as usize)
}

/// The index of the chunk which holds the given bit position.
pub fn chunk_index(position: u64) -> u64 {
    position / CHUNK_BITS
}

/// Whether the bit at the given position is set within its chunk.
pub fn is_bit_set(chunk: u64, position: u64) -> bool {
    (chunk >> (position % CHUNK_BITS)) & 1 == 1
}

/// Iterate the chunks of a bit vector in order. A trailing partial chunk is zero-extended.
pub fn chunks(bits: &BitVector) -> impl Iterator<Item = u64> + '_ {
    bits.chunks(CHUNK_BITS as usize).map(|chunk| chunk.load_le::<u64>())
}

/// Read the chunk with the given index, if it exists.
pub fn chunk_at(bits: &BitVector, index: u64) -> Option<u64> {
    let start = usize::try_from(index.checked_mul(CHUNK_BITS)?).ok()?;
    if start >= bits.len() {
        return None;
    }
    let end = core::cmp::min(start + CHUNK_BITS as usize, bits.len());
    Some(bits[start..end].load_le::<u64>())
}
