//! The fixed-width encoding of leaf preimages.
//!
//! Each leaf of the tree is the hash of a chunk's index followed by the chunk's value, both
//! written as little-endian integers zero-padded to a configured width. The width is part of the
//! authenticated format: two parties sharing a root must agree on it, or their digests diverge.
//!
//! The width is unrelated to the chunk width of the bit vector, which is always
//! [`CHUNK_BITS`](crate::filter::CHUNK_BITS).

use core::fmt;

/// The default encoding width, in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// The encoding width was not a positive multiple of 8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidChunkSize(pub usize);

impl fmt::Display for InvalidChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "chunk size must be a positive multiple of 8 bytes, got {}",
            self.0
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidChunkSize {}

/// A validated leaf encoding width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafEncoding {
    width: usize,
}

impl LeafEncoding {
    /// Create an encoding with the given width in bytes.
    ///
    /// Fails unless the width is a positive multiple of 8 bytes (64 bits).
    pub fn new(width: usize) -> Result<Self, InvalidChunkSize> {
        if width == 0 || width % 8 != 0 {
            return Err(InvalidChunkSize(width));
        }
        Ok(LeafEncoding { width })
    }

    /// The width of each encoded field, in bytes.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Write the preimage of a leaf into `buf`, which is cleared first.
    ///
    /// The preimage is `index || chunk`, each field `width` bytes long.
    pub fn encode_leaf(&self, chunk: u64, index: u64, buf: &mut alloc::vec::Vec<u8>) {
        buf.clear();
        buf.resize(self.width * 2, 0);
        buf[..8].copy_from_slice(&index.to_le_bytes());
        buf[self.width..self.width + 8].copy_from_slice(&chunk.to_le_bytes());
    }
}

impl Default for LeafEncoding {
    fn default() -> Self {
        LeafEncoding {
            width: DEFAULT_CHUNK_SIZE,
        }
    }
}
