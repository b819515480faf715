//! Hashers (feature-gated) and utilities for implementing them.

use crate::{encoding::LeafEncoding, tree::Node};

use alloc::vec::Vec;

/// A tree node hash function.
///
/// Leaves commit to a chunk value together with its index, so that a chunk cannot be presented
/// at a different position in the tree. Internal nodes commit to their two children in order:
/// the even-positioned child always comes first.
pub trait ChunkHasher {
    /// Hash a leaf: the chunk's index then its value, encoded according to `encoding`.
    fn hash_leaf(chunk: u64, index: u64, encoding: &LeafEncoding) -> Node;

    /// Hash an internal node from its left and right children.
    fn hash_internal(left: &Node, right: &Node) -> Node;
}

/// A simple trait for representing binary hash functions.
pub trait BinaryHash {
    /// Given a bit-string, produce a 32-byte hash.
    fn hash(input: &[u8]) -> [u8; 32];

    /// An optional specialization of `hash` where there are two 32-byte inputs, left and right.
    fn hash2_32_concat(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
        let mut buf = [0u8; 64];
        buf[0..32].copy_from_slice(left);
        buf[32..64].copy_from_slice(right);
        Self::hash(&buf)
    }
}

/// A chunk hasher constructed from a simple binary hasher.
///
/// The binary hash wrapped by this structure must be collision resistant over 256-bit outputs.
/// Functions like Sha2/Blake3/Keccak all meet this criterion.
pub struct BinaryHasher<H>(core::marker::PhantomData<H>);

impl<H: BinaryHash> ChunkHasher for BinaryHasher<H> {
    fn hash_leaf(chunk: u64, index: u64, encoding: &LeafEncoding) -> Node {
        let mut buf = Vec::with_capacity(encoding.width() * 2);
        encoding.encode_leaf(chunk, index, &mut buf);
        H::hash(&buf)
    }

    fn hash_internal(left: &Node, right: &Node) -> Node {
        H::hash2_32_concat(left, right)
    }
}

#[cfg(any(feature = "blake3-hasher", test))]
pub use self::blake3::Blake3Hasher;

/// A chunk hasher making use of blake3.
#[cfg(any(feature = "blake3-hasher", test))]
pub mod blake3 {
    use super::{BinaryHash, BinaryHasher};

    /// A [`BinaryHash`] implementation for Blake3.
    pub struct Blake3BinaryHasher;

    /// A wrapper around Blake3 for use in Bloom trees.
    pub type Blake3Hasher = BinaryHasher<Blake3BinaryHasher>;

    impl BinaryHash for Blake3BinaryHasher {
        fn hash(value: &[u8]) -> [u8; 32] {
            blake3::hash(value).into()
        }

        fn hash2_32_concat(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
            let mut hasher = blake3::Hasher::new();
            hasher.update(left);
            hasher.update(right);
            hasher.finalize().into()
        }
    }
}

#[cfg(feature = "sha2-hasher")]
pub use self::sha2::{Sha2Hasher, Sha512_256Hasher};

/// Chunk hashers making use of sha2-256 and sha2-512/256.
#[cfg(feature = "sha2-hasher")]
pub mod sha2 {
    use super::{BinaryHash, BinaryHasher};
    use sha2::{Digest, Sha256, Sha512_256};

    /// A [`BinaryHash`] implementation for Sha2-256.
    pub struct Sha2BinaryHasher;

    /// A wrapper around sha2-256 for use in Bloom trees.
    pub type Sha2Hasher = BinaryHasher<Sha2BinaryHasher>;

    impl BinaryHash for Sha2BinaryHasher {
        fn hash(value: &[u8]) -> [u8; 32] {
            let mut hasher = Sha256::new();
            hasher.update(value);
            hasher.finalize().into()
        }

        fn hash2_32_concat(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
            let mut hasher = Sha256::new();
            hasher.update(left);
            hasher.update(right);
            hasher.finalize().into()
        }
    }

    /// A [`BinaryHash`] implementation for Sha2-512 truncated to 256 bits.
    pub struct Sha512_256BinaryHasher;

    /// A wrapper around sha2-512/256 for use in Bloom trees.
    pub type Sha512_256Hasher = BinaryHasher<Sha512_256BinaryHasher>;

    impl BinaryHash for Sha512_256BinaryHasher {
        fn hash(value: &[u8]) -> [u8; 32] {
            Sha512_256::digest(value).into()
        }
    }
}
