//! # Perceptual Hash Algorithms
//!
//! Fingerprints that remain close, in Hamming distance, for visually similar
//! images. Three algorithms with different robustness/cost tradeoffs:
//!
//! 1. Average hash: 8x8 mean-threshold hash (cheapest, weakest)
//! 2. DCT perceptual hash (pHash): low-frequency structure hash, robust to
//!    rescaling and compression noise
//! 3. Marr-Hildreth hash: edge-structure hash, the most expensive and the
//!    most robust to blur and watermark-style perturbations
//!
//! ## Hamming Distance Interpretation
//!
//! For the 64-bit hashes:
//!
//! - 0-3: nearly identical images
//! - 4-10: similar images (same subject, moderate differences)
//! - >10: different images
//!
//! The Marr-Hildreth hash is 576 bits; scale thresholds accordingly.
//!
//! ## Usage Guidance
//!
//! Each algorithm comes in two forms. The hasher structs implement
//! [`ImageHasher`] and reuse pre-allocated scratch buffers across calls,
//! which pays off when hashing many images; a single instance must not be
//! shared between threads without external locking. The free functions
//! (`average_hash`, `phash`, `marr_hildreth_hash`) allocate fresh buffers per
//! call and can be used from independent threads with no shared state.

mod average;
mod marr_hildreth;
mod phash;

pub use average::{average_hash, AverageHasher, AVERAGE_HASH_BYTES};
pub use marr_hildreth::{
    marr_hildreth_hash, KernelKind, MarrHildrethConfig, MarrHildrethHasher,
    MARR_HILDRETH_HASH_BYTES,
};
pub use phash::{phash, PHasher, PHASH_BYTES};

use std::path::Path;

use image::DynamicImage;

use crate::error::Result;
use crate::hash::ImageHash;

/// Common contract for the hash engines.
///
/// `compute` takes `&mut self` because reusable engines write into scratch
/// buffers owned by the instance. Two calls on the same instance with
/// bit-identical input yield bit-identical hashes.
pub trait ImageHasher {
    /// Packed hash length in bytes.
    fn hash_len(&self) -> usize;

    /// Compute the hash of a decoded image.
    fn compute(&mut self, img: &DynamicImage) -> Result<ImageHash>;
}

/// Calculate an average hash from an image file.
pub fn average_hash_from_file<P: AsRef<Path>>(path: P) -> Result<ImageHash> {
    let img = image::open(path)?;
    average_hash(&img)
}

/// Calculate a DCT perceptual hash from an image file.
pub fn phash_from_file<P: AsRef<Path>>(path: P) -> Result<ImageHash> {
    let img = image::open(path)?;
    phash(&img)
}

/// Calculate a Marr-Hildreth hash from an image file.
pub fn marr_hildreth_hash_from_file<P: AsRef<Path>>(
    path: P,
    config: &MarrHildrethConfig,
) -> Result<ImageHash> {
    let img = image::open(path)?;
    marr_hildreth_hash(&img, config)
}
