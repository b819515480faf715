//! A seeded Bloom filter implementing [`BloomFilter`].

use bitvec::prelude::*;
use bloomtree_core::filter::{BitVector, BloomFilter};

/// A Bloom filter whose index mapping is derived from a seed.
///
/// Each element is hashed once with blake3 over the seed and the element, and the `k` positions
/// are produced by double hashing of the two leading 64-bit words of the digest. Positions are
/// returned in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistBloomFilter {
    bits: BitVec<u64, Lsb0>,
    hash_count: usize,
    seed: Vec<u8>,
}

impl DistBloomFilter {
    /// Create a filter sized for `capacity` elements at the given false positive rate.
    ///
    /// The bit length is `ceil(-n ln p / ln^2 2)` and the hash count `round(m / n ln 2)`, but at
    /// least 2.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or the rate is not in `(0, 1)`.
    pub fn new(capacity: usize, false_positive_rate: f64, seed: &[u8]) -> Self {
        assert!(capacity > 0);
        assert!(false_positive_rate > 0.0 && false_positive_rate < 1.0);

        let ln2 = std::f64::consts::LN_2;
        let n = capacity as f64;
        let bit_len = (-n * false_positive_rate.ln() / (ln2 * ln2)).ceil() as usize;
        let hash_count = ((bit_len as f64 / n) * ln2).round() as usize;

        Self::with_params(bit_len, hash_count.max(2), seed)
    }

    /// Create a filter with an explicit bit length and hash count.
    pub fn with_params(bit_len: usize, hash_count: usize, seed: &[u8]) -> Self {
        DistBloomFilter {
            bits: BitVec::repeat(false, bit_len),
            hash_count,
            seed: seed.to_vec(),
        }
    }

    /// Insert an element.
    pub fn add(&mut self, element: &[u8]) {
        let positions = self.positions(element, &self.seed);
        self.set_positions(&positions);
    }

    /// Whether the element is possibly in the filter. A filter without bits holds nothing.
    pub fn contains(&self, element: &[u8]) -> bool {
        self.proof(element).1
    }

    /// Set the bits at the given positions directly.
    ///
    /// # Panics
    ///
    /// Panics if a position is out of range.
    pub fn set_positions(&mut self, positions: &[u64]) {
        for &position in positions {
            self.bits.set(position as usize, true);
        }
    }

    /// The seed of the index mapping.
    pub fn seed(&self) -> &[u8] {
        &self.seed
    }

    /// The length of the bit vector.
    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    fn positions(&self, element: &[u8], seed: &[u8]) -> Vec<u64> {
        let bit_len = self.bits.len() as u64;
        if bit_len == 0 {
            return Vec::new();
        }

        let mut hasher = blake3::Hasher::new();
        hasher.update(&(seed.len() as u64).to_le_bytes());
        hasher.update(seed);
        hasher.update(element);
        let digest = hasher.finalize();
        let digest = digest.as_bytes();

        let mut word = [0u8; 8];
        word.copy_from_slice(&digest[..8]);
        let h1 = u64::from_le_bytes(word);
        word.copy_from_slice(&digest[8..16]);
        let h2 = u64::from_le_bytes(word) | 1;

        let mut positions: Vec<u64> = (0..self.hash_count as u64)
            .map(|i| h1.wrapping_add(i.wrapping_mul(h2)) % bit_len)
            .collect();
        positions.sort_unstable();
        positions
    }
}

impl BloomFilter for DistBloomFilter {
    fn bit_vector(&self) -> &BitVector {
        &self.bits
    }

    fn proof(&self, element: &[u8]) -> (Vec<u64>, bool) {
        let positions = self.positions(element, &self.seed);
        let present = !positions.is_empty() && positions.iter().all(|&p| self.bits[p as usize]);
        (positions, present)
    }

    fn map_to_positions(&self, element: &[u8], seed: &[u8]) -> Vec<u64> {
        self.positions(element, seed)
    }

    fn hash_count(&self) -> usize {
        self.hash_count
    }
}
