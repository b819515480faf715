//! Bloom trees: Bloom filters authenticated by a hash tree.
//!
//! A [`BloomTree`] owns a Bloom filter together with the hash tree built over its chunks. It
//! produces [`CompactMultiProof`]s showing that an element is possibly in the filter, or definitely
//! not in it, which anyone holding the root and the filter's mapping function can check with
//! [`verify`].

use std::marker::PhantomData;

use anyhow::Context as _;

pub use bloomtree_core::{
    encoding::{self, LeafEncoding},
    filter::{self, BitVector, BloomFilter},
    hasher::{self, BinaryHash, BinaryHasher, ChunkHasher},
    proof::{
        self, verify, CompactMultiProof, DecodeError, ProofType, ProveError, VerificationError,
        MAX_K,
    },
    tree::{BuildError, HashTree, Node},
};

#[cfg(feature = "blake3-hasher")]
pub use bloomtree_core::hasher::Blake3Hasher;

#[cfg(feature = "sha2-hasher")]
pub use bloomtree_core::hasher::{Sha2Hasher, Sha512_256Hasher};

pub use bloom::DistBloomFilter;
pub use options::Options;

mod bloom;
mod options;

/// A Bloom filter and the hash tree over its bit vector.
///
/// The filter is owned and never handed out mutably, so the tree always matches it. To change the
/// filter, take it back with [`BloomTree::into_bloom_filter`], modify it and build a new tree.
///
/// The tree is immutable: proofs may be generated concurrently from any number of threads.
pub struct BloomTree<F, H> {
    filter: F,
    tree: HashTree,
    _marker: PhantomData<H>,
}

impl<F: BloomFilter, H: ChunkHasher> BloomTree<F, H> {
    /// Build a tree over the filter.
    ///
    /// Fails if the options are invalid, the filter has no chunks, or its hash count is not in
    /// `(1, MAX_K)`. The underlying [`BuildError`] can be recovered with `downcast_ref`.
    pub fn new(filter: F, options: Options) -> anyhow::Result<Self> {
        let encoding = LeafEncoding::new(options.chunk_size).context("invalid options")?;
        let tree = HashTree::build::<H>(&filter, encoding)?;

        tracing::debug!(
            chunks = tree.chunk_count(),
            leaves = tree.leaf_count(),
            root = %hex::encode(tree.root()),
            "built bloom tree"
        );

        Ok(BloomTree {
            filter,
            tree,
            _marker: PhantomData,
        })
    }

    /// The root of the tree.
    pub fn root(&self) -> Node {
        self.tree.root()
    }

    /// The filter the tree was built from.
    pub fn bloom_filter(&self) -> &F {
        &self.filter
    }

    /// The hash tree.
    pub fn hash_tree(&self) -> &HashTree {
        &self.tree
    }

    /// The leaf encoding of the tree.
    pub fn encoding(&self) -> &LeafEncoding {
        self.tree.encoding()
    }

    /// Give back the filter, discarding the tree.
    pub fn into_bloom_filter(self) -> F {
        self.filter
    }

    /// Generate a compact multiproof for the element.
    ///
    /// The proof is a presence proof if the filter reports the element as possibly present, and
    /// an absence proof otherwise.
    pub fn generate_compact_multi_proof(
        &self,
        element: &[u8],
    ) -> Result<CompactMultiProof, ProveError> {
        let proof = CompactMultiProof::generate::<H>(&self.tree, &self.filter, element)?;
        tracing::trace!(
            presence = proof.is_presence(),
            chunks = proof.chunks.len(),
            siblings = proof.siblings.len(),
            "generated compact multiproof"
        );
        Ok(proof)
    }

    /// Verify a compact multiproof for the element against `root`, using this tree's filter for
    /// the element's positions under `seed`.
    ///
    /// See [`verify`] for the meaning of the result.
    pub fn verify_compact_multi_proof(
        &self,
        element: &[u8],
        seed: &[u8],
        proof: &CompactMultiProof,
        root: &Node,
    ) -> Result<bool, VerificationError> {
        let result = verify::<H>(element, seed, proof, root, &self.filter, self.tree.encoding());
        match result {
            Ok(true) => {}
            Ok(false) => tracing::debug!("compact multiproof does not match the root"),
            Err(ref err) => tracing::debug!(%err, "malformed compact multiproof"),
        }
        result
    }
}
