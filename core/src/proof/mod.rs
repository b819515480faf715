//! Compact multiproofs and their verification.
//!
//! The Bloom tree is an authenticated data structure: it permits proving, against the root, that
//! an element is possibly a member of the underlying filter (all of its `k` bits are set) or that
//! it is definitely not a member (one of its bits is unset). Both kinds of claim are carried by a
//! [`CompactMultiProof`], which reveals the chunks holding the relevant bits and the minimal set
//! of sibling digests needed to recompute the root.
//!
//! The verifier never trusts positions carried by a proof: it re-derives the element's positions
//! from the filter's mapping function, and the [`ProofType`] only selects which of them the proof
//! covers.

pub use codec::DecodeError;
pub use multi_proof::{CompactMultiProof, ProveError};
pub use proof_type::{ProofType, MAX_K};
pub use verification::{verify, VerificationError};

mod codec;
mod multi_proof;
mod proof_type;
mod verification;
