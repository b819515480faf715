use bloomtree_core::encoding::DEFAULT_CHUNK_SIZE;

/// Options when building a [`crate::BloomTree`].
#[derive(Debug, Clone)]
pub struct Options {
    /// The width in bytes of each field of a leaf preimage.
    pub(crate) chunk_size: usize,
}

impl Options {
    /// Create a new `Options` instance with the default values.
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the width in bytes to which a chunk's index and value are each padded before hashing
    /// a leaf.
    ///
    /// Must be a positive multiple of 8. Provers and verifiers sharing a root must use the same
    /// value, as it changes every leaf digest.
    ///
    /// Default: 64.
    pub fn chunk_size(&mut self, chunk_size: usize) {
        self.chunk_size = chunk_size;
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}
