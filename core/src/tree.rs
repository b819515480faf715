//! This module defines the hash tree built over the chunks of a Bloom filter.
//!
//! The tree is complete: the number of leaves `L` is the smallest power of two no smaller than
//! the number of chunks `C`. Leaves `[0, C)` commit to the real chunks and leaves `[C, L)` commit
//! to zero-valued chunks at their index. Padding leaves are ordinary members of the tree; they are
//! hashed and proven like any other leaf.
//!
//! All nodes are stored in a single flat array of `2L - 1` entries, layer by layer from the
//! leaves upwards:
//!
//! ```text
//!  layer 2:                   [6]            <- root, at 2L - 2
//!  layer 1:          [4]               [5]
//!  layer 0:     [0]       [1]     [2]       [3]
//! ```
//!
//! The node at flat position `j` (other than the root) has its parent at `L + j / 2` and its
//! sibling at `j ^ 1`. Every layer starts at an even offset, so the sibling relation never crosses
//! a layer boundary.
//!
//! The tree is immutable. Any change to the filter requires building a new tree.

use crate::{
    encoding::LeafEncoding,
    filter::{self, BloomFilter},
    hasher::ChunkHasher,
    proof::MAX_K,
};

use alloc::vec::Vec;
use core::fmt;

/// A node in the tree. Always the 256-bit output of a [`ChunkHasher`].
pub type Node = [u8; 32];

/// Errors which prevent a tree from being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// The filter's bit vector has no chunks.
    EmptyFilter,
    /// The filter's hash count is outside of `(1, MAX_K)`.
    InvalidHashCount(usize),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BuildError::EmptyFilter => write!(f, "tree must have at least 1 leaf"),
            BuildError::InvalidHashCount(k) => write!(
                f,
                "parameter k of the bloom filter must be in (1, {}), got {}",
                MAX_K, k
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BuildError {}

/// A complete binary hash tree over the chunks of a Bloom filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashTree {
    nodes: Vec<Node>,
    chunk_count: usize,
    hash_count: usize,
    encoding: LeafEncoding,
}

impl HashTree {
    /// Build the tree over a snapshot of the filter's bit vector.
    ///
    /// Fails if the filter has no chunks or if its hash count is not in `(1, MAX_K)`.
    pub fn build<H: ChunkHasher>(
        filter: &impl BloomFilter,
        encoding: LeafEncoding,
    ) -> Result<Self, BuildError> {
        let bits = filter.bit_vector();
        Self::from_chunks::<H>(
            filter::chunks(bits),
            filter.hash_count(),
            encoding,
        )
    }

    /// Build the tree over an ordered sequence of chunks, for a filter with `hash_count` hash
    /// functions.
    pub fn from_chunks<H: ChunkHasher>(
        chunks: impl IntoIterator<Item = u64>,
        hash_count: usize,
        encoding: LeafEncoding,
    ) -> Result<Self, BuildError> {
        if hash_count <= 1 || hash_count >= MAX_K as usize {
            return Err(BuildError::InvalidHashCount(hash_count));
        }

        let mut nodes: Vec<Node> = chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| H::hash_leaf(chunk, i as u64, &encoding))
            .collect();

        let chunk_count = nodes.len();
        if chunk_count == 0 {
            return Err(BuildError::EmptyFilter);
        }

        let leaf_count = chunk_count.next_power_of_two();
        nodes.reserve_exact(leaf_count * 2 - 1 - chunk_count);
        for i in chunk_count..leaf_count {
            nodes.push(H::hash_leaf(0, i as u64, &encoding));
        }

        // each pass appends the parent of the pair at (2i, 2i + 1) relative to the leaves,
        // which always lands at L + i.
        for i in leaf_count..leaf_count * 2 - 1 {
            let child = 2 * (i - leaf_count);
            let parent = H::hash_internal(&nodes[child], &nodes[child + 1]);
            nodes.push(parent);
        }

        Ok(HashTree {
            nodes,
            chunk_count,
            hash_count,
            encoding,
        })
    }

    /// The root of the tree.
    pub fn root(&self) -> Node {
        // UNWRAP: construction guarantees at least one node.
        *self.nodes.last().unwrap()
    }

    /// The number of real chunks the tree was built from.
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// The number of leaves, including padding. Always a power of two.
    pub fn leaf_count(&self) -> usize {
        (self.nodes.len() + 1) / 2
    }

    /// The number of layers above the leaves. Zero for a single-leaf tree.
    pub fn depth(&self) -> usize {
        self.leaf_count().trailing_zeros() as usize
    }

    /// The hash count of the filter the tree was built from.
    pub fn hash_count(&self) -> usize {
        self.hash_count
    }

    /// The leaf encoding used for this tree.
    pub fn encoding(&self) -> &LeafEncoding {
        &self.encoding
    }

    /// All nodes in flat layout.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The node at the given flat position, if any.
    pub fn node(&self, position: usize) -> Option<&Node> {
        self.nodes.get(position)
    }

    /// The leaf with the given index, if any.
    pub fn leaf(&self, index: usize) -> Option<&Node> {
        if index < self.leaf_count() {
            self.nodes.get(index)
        } else {
            None
        }
    }

    /// The flat position of the parent of the node at the given flat position.
    ///
    /// Returns `None` for the root or for positions outside the tree.
    pub fn parent_index(&self, position: usize) -> Option<usize> {
        if position + 1 >= self.nodes.len() {
            return None;
        }
        Some(self.leaf_count() + position / 2)
    }

    /// The flat offset at which each layer starts, leaves first. Contains `depth() + 1` entries.
    pub(crate) fn layer_offsets(&self) -> impl Iterator<Item = usize> {
        let leaf_count = self.leaf_count();
        (0..=self.depth()).scan((0usize, leaf_count), |state, _| {
            let (offset, width) = *state;
            *state = (offset + width, width / 2);
            Some(offset)
        })
    }
}
