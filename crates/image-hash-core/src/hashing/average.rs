use image::imageops::FilterType;
use image::DynamicImage;

use super::ImageHasher;
use crate::error::Result;
use crate::hash::ImageHash;
use crate::resample;

/// Packed size of an average hash.
pub const AVERAGE_HASH_BYTES: usize = 8;

const SIDE: u32 = 8;
const SAMPLES: usize = (SIDE * SIDE) as usize;

/// Mean-threshold hash over an 8x8 downsample.
///
/// Each of the 64 samples contributes one bit: set when the sample is at or
/// above the mean intensity, raster order, most-significant-bit first. A flat
/// image therefore hashes to all ones (`ffffffffffffffff`).
#[derive(Debug, Default)]
pub struct AverageHasher;

impl AverageHasher {
    pub fn new() -> Self {
        Self
    }
}

impl ImageHasher for AverageHasher {
    fn hash_len(&self) -> usize {
        AVERAGE_HASH_BYTES
    }

    fn compute(&mut self, img: &DynamicImage) -> Result<ImageHash> {
        let small = resample::to_grayscale(img, SIDE, SIDE, FilterType::Triangle)?;
        let pixels = small.as_raw();

        let sum: u32 = pixels.iter().map(|&p| p as u32).sum();
        let mean = sum as f32 / SAMPLES as f32;

        Ok(ImageHash::from_bits(
            pixels.iter().map(|&p| p as f32 >= mean),
        ))
    }
}

/// One-shot average hash.
pub fn average_hash(img: &DynamicImage) -> Result<ImageHash> {
    AverageHasher::new().compute(img)
}
