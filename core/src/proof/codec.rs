//! Byte encoding of compact multiproofs.
//!
//! Proofs are encoded with Borsh. All integers are little-endian:
//!
//! ```text
//! u32 chunk count | chunks (u64 each) | u32 sibling count | siblings (32 bytes each) | proof type
//! ```
//!
//! Entries are kept in generation order; reordering them invalidates the proof.

use super::multi_proof::CompactMultiProof;

use alloc::vec::Vec;
use borsh::BorshDeserialize;
use core::fmt;

/// Errors when decoding a compact multiproof from bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ended before the proof was complete.
    UnexpectedEnd,
    /// The input continues after the proof.
    TrailingBytes,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::UnexpectedEnd => write!(f, "unexpected end of proof bytes"),
            DecodeError::TrailingBytes => write!(f, "trailing bytes after proof"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

impl CompactMultiProof {
    /// The length of the encoding of this proof, in bytes.
    pub fn encoded_len(&self) -> usize {
        4 + self.chunks.len() * 8 + 4 + self.siblings.len() * 32 + 1
    }

    /// Encode the proof into bytes.
    ///
    /// # Panics
    ///
    /// Panics if there are more than `u32::MAX` chunks or siblings.
    pub fn encode(&self) -> Vec<u8> {
        // UNWRAP: writing into a vector only fails on lengths which overflow the u32 prefix.
        borsh::to_vec(self).unwrap()
    }

    /// Decode a proof from bytes. The whole input must be consumed.
    ///
    /// Every field accepts any bit pattern, so the only failures are a short or a long input.
    /// Length prefixes are not trusted for allocation.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut rest = bytes;
        let proof =
            CompactMultiProof::deserialize(&mut rest).map_err(|_| DecodeError::UnexpectedEnd)?;
        if !rest.is_empty() {
            return Err(DecodeError::TrailingBytes);
        }
        Ok(proof)
    }
}
