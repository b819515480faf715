//! Core operations and types of the Bloom tree.
//!
//! A Bloom tree is a complete binary hash tree built over the 64-bit words ("chunks") of a Bloom
//! filter's bit vector. It allows proving that an element is possibly a member of the filter, or
//! definitely not a member, by revealing only the chunks covering the element's bit positions
//! along with the sibling digests needed to recompute the root.
//!
//! This crate defines the tree schema, the hash primitives, and the compact multiproof
//! generation and verification routines in a filter-agnostic manner: any type implementing
//! [`filter::BloomFilter`] can be authenticated.
//!
//! The core types and proof verification routines of this crate do not require the
//! standard library, but do require Rust's alloc crate.

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

pub mod encoding;
pub mod filter;
pub mod hasher;
pub mod proof;
pub mod tree;

pub use encoding::LeafEncoding;
pub use filter::BloomFilter;
pub use tree::{BuildError, HashTree, Node};
