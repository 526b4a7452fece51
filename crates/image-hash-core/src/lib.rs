//! Perceptual image hashing and hash comparison.
//!
//! This library provides the fingerprinting components for image similarity
//! detection:
//! - Average hash: 8x8 mean-threshold hash
//! - DCT perceptual hash (pHash): low-frequency structure hash
//! - Marr-Hildreth hash: edge-structure hash
//! - Hamming-distance comparison between packed hashes
//!
//! Visually similar images produce hashes with a small Hamming distance;
//! unrelated images diverge. Each algorithm exists as a reusable engine
//! implementing [`hashing::ImageHasher`] (scratch buffers reused across
//! calls, one caller at a time) and as a one-shot function that allocates
//! per call and can run on independent threads.

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use error::{Error, Result};
pub use hash::{hamming_distance, ImageHash};
pub use hashing::{
    average_hash, average_hash_from_file, marr_hildreth_hash, marr_hildreth_hash_from_file,
    phash, phash_from_file, AverageHasher, ImageHasher, KernelKind, MarrHildrethConfig,
    MarrHildrethHasher, PHasher,
};

// -- Public Modules --
pub mod hash;
pub mod hashing;
pub mod resample;
