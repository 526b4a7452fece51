use std::cmp::Ordering;
use std::sync::Arc;

use image::imageops::FilterType;
use image::DynamicImage;
use rustdct::{DctPlanner, TransformType2And3};

use super::ImageHasher;
use crate::error::Result;
use crate::hash::ImageHash;
use crate::resample;

/// Packed size of a DCT perceptual hash.
pub const PHASH_BYTES: usize = 8;

/// Standard pHash works on a 32x32 downsample.
const DCT_SIZE: usize = 32;
/// The hash is built from the top-left 8x8 low frequencies.
const BLOCK: usize = 8;

/// DCT-based perceptual hash.
///
/// The 32x32 downsample is pushed through a 2D DCT-II and the top-left 8x8
/// low-frequency block is thresholded against its median. Low frequencies
/// capture coarse structure and survive rescaling and compression noise,
/// which makes this hash stronger than the average hash for near-duplicate
/// detection.
///
/// Convention: the DC coefficient [0,0] is zeroed before thresholding, so
/// absolute brightness never influences the hash; a bit is set when its
/// coefficient is at or above the median (element 32 of the 64 values sorted
/// ascending). Bits are packed in raster order, most-significant-bit first.
pub struct PHasher {
    dct: Arc<dyn TransformType2And3<f32>>,
    buffer: Vec<f32>,
    scratch: Vec<f32>,
}

impl PHasher {
    pub fn new() -> Self {
        let dct = DctPlanner::new().plan_dct2(DCT_SIZE);
        let scratch = vec![0.0; dct.get_scratch_len()];
        Self {
            dct,
            buffer: vec![0.0; DCT_SIZE * DCT_SIZE],
            scratch,
        }
    }
}

impl Default for PHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageHasher for PHasher {
    fn hash_len(&self) -> usize {
        PHASH_BYTES
    }

    fn compute(&mut self, img: &DynamicImage) -> Result<ImageHash> {
        let small = resample::to_grayscale(
            img,
            DCT_SIZE as u32,
            DCT_SIZE as u32,
            FilterType::Triangle,
        )?;

        for (dst, src) in self.buffer.iter_mut().zip(small.as_raw()) {
            *dst = *src as f32;
        }

        // Separable 2D DCT: rows, transpose, rows again, transpose back.
        for row in self.buffer.chunks_mut(DCT_SIZE) {
            self.dct.process_dct2_with_scratch(row, &mut self.scratch);
        }
        transpose_square(&mut self.buffer, DCT_SIZE);
        for row in self.buffer.chunks_mut(DCT_SIZE) {
            self.dct.process_dct2_with_scratch(row, &mut self.scratch);
        }
        transpose_square(&mut self.buffer, DCT_SIZE);

        // Top-left 8x8 low-frequency block, DC zeroed.
        let mut low_freq = [0.0f32; BLOCK * BLOCK];
        for row in 0..BLOCK {
            let start = row * DCT_SIZE;
            low_freq[row * BLOCK..(row + 1) * BLOCK]
                .copy_from_slice(&self.buffer[start..start + BLOCK]);
        }
        low_freq[0] = 0.0;

        let mut sorted = low_freq;
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let median = sorted[sorted.len() / 2];

        Ok(ImageHash::from_bits(low_freq.iter().map(|&c| c >= median)))
    }
}

/// One-shot DCT perceptual hash.
pub fn phash(img: &DynamicImage) -> Result<ImageHash> {
    PHasher::new().compute(img)
}

/// In-place transpose of a square row-major buffer.
fn transpose_square(buffer: &mut [f32], n: usize) {
    debug_assert_eq!(buffer.len(), n * n);
    for row in 0..n {
        for col in row + 1..n {
            buffer.swap(row * n + col, col * n + row);
        }
    }
}
