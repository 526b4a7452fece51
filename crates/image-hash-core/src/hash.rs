//! Packed hash representation and Hamming-distance comparison.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A packed-bit perceptual hash.
///
/// Bits are stored in raster order, most-significant-bit first within each
/// byte. The length is fixed by the algorithm that produced the hash: 8 bytes
/// for the average and DCT hashes, 72 bytes for the Marr-Hildreth hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHash {
    bytes: Box<[u8]>,
}

impl ImageHash {
    /// Wrap an already-packed byte buffer.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// Pack a bit sequence, most-significant-bit first per byte.
    ///
    /// The bit count must be a multiple of 8.
    pub(crate) fn from_bits(bits: impl IntoIterator<Item = bool>) -> Self {
        let mut bytes = Vec::new();
        let mut acc = 0u8;
        let mut filled = 0usize;
        for bit in bits {
            acc = (acc << 1) | bit as u8;
            filled += 1;
            if filled == 8 {
                bytes.push(acc);
                acc = 0;
                filled = 0;
            }
        }
        debug_assert_eq!(filled, 0, "bit count must be a multiple of 8");
        Self::from_bytes(bytes)
    }

    /// The packed hash bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hash length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Calculate the Hamming distance to another hash of the same length.
    pub fn distance(&self, other: &ImageHash) -> Result<u32> {
        hamming_distance(&self.bytes, &other.bytes)
    }

    /// Check if two hashes are similar based on a bit-distance threshold.
    pub fn is_similar(&self, other: &ImageHash, threshold: u32) -> Result<bool> {
        Ok(self.distance(other)? <= threshold)
    }
}

impl fmt::Display for ImageHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.bytes.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Count differing bits between two packed hashes.
///
/// The buffers must have the same length; distances between hashes produced
/// by different algorithms are meaningless, so a mismatch is an error rather
/// than a silent truncation. The lower the count, the more similar the
/// images.
pub fn hamming_distance(left: &[u8], right: &[u8]) -> Result<u32> {
    if left.len() != right.len() {
        return Err(Error::HashLengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(left
        .iter()
        .zip(right.iter())
        .map(|(a, b)| (a ^ b).count_ones())
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hamming_distance_counts_differing_bits() {
        let a = [0xffu8, 0x00, 0x0f];
        let b = [0x00u8, 0x00, 0xff];
        assert_eq!(hamming_distance(&a, &b).unwrap(), 12);
        assert_eq!(hamming_distance(&a, &a).unwrap(), 0);
    }

    #[test]
    fn similarity_respects_threshold() {
        let a = ImageHash::from_bytes(vec![0b1111_0000]);
        let b = ImageHash::from_bytes(vec![0b1110_0000]);
        assert!(a.is_similar(&b, 1).unwrap());
        assert!(!a.is_similar(&b, 0).unwrap());
    }

    #[test]
    fn hamming_distance_is_symmetric() {
        let a = [0b1010_1010u8; 8];
        let b = [0b0110_0110u8; 8];
        assert_eq!(
            hamming_distance(&a, &b).unwrap(),
            hamming_distance(&b, &a).unwrap()
        );
    }

    #[test]
    fn hamming_distance_rejects_length_mismatch() {
        let err = hamming_distance(&[0u8; 8], &[0u8; 72]).unwrap_err();
        match err {
            Error::HashLengthMismatch { left, right } => {
                assert_eq!(left, 8);
                assert_eq!(right, 72);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bits_pack_msb_first() {
        let mut bits = vec![false; 16];
        bits[0] = true; // highest bit of byte 0
        bits[15] = true; // lowest bit of byte 1
        let hash = ImageHash::from_bits(bits);
        assert_eq!(hash.as_bytes(), &[0x80, 0x01]);
    }

    #[test]
    fn displays_as_lowercase_hex() {
        let hash = ImageHash::from_bytes(vec![0xde, 0xad, 0x00, 0x0f]);
        assert_eq!(hash.to_string(), "dead000f");
    }

    #[test]
    fn serde_round_trip() {
        let hash = ImageHash::from_bytes(vec![1, 2, 3, 4, 5, 6, 7, 8]);
        let json = serde_json::to_string(&hash).unwrap();
        let back: ImageHash = serde_json::from_str(&json).unwrap();
        assert_eq!(hash, back);
    }
}
