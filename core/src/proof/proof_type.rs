//! The proof-type byte of a compact multiproof.

/// The reserved proof-type byte denoting a presence proof.
///
/// This also bounds the hash count of any filter a tree can be built for: witness indices must
/// stay below it to be distinguishable from the sentinel.
pub const MAX_K: u8 = u8::MAX;

/// What a compact multiproof claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProofType {
    /// All `k` positions of the element are set, so the element is possibly a member. The proof
    /// reveals one chunk per position, in ascending position order.
    Presence,
    /// The position at this index of the element's ascending position list is unset, so the
    /// element is definitely not a member. The proof reveals a single chunk.
    Absence(u8),
}

impl ProofType {
    /// Decode a proof type from its byte.
    pub fn from_byte(byte: u8) -> Self {
        if byte == MAX_K {
            ProofType::Presence
        } else {
            ProofType::Absence(byte)
        }
    }

    /// Encode the proof type as a byte.
    ///
    /// Returns `None` for an absence proof whose witness index is the presence sentinel.
    pub fn to_byte(self) -> Option<u8> {
        match self {
            ProofType::Presence => Some(MAX_K),
            ProofType::Absence(witness) if witness == MAX_K => None,
            ProofType::Absence(witness) => Some(witness),
        }
    }

    /// Whether this is a presence proof.
    pub fn is_presence(&self) -> bool {
        matches!(self, ProofType::Presence)
    }
}
