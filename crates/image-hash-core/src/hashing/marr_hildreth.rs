use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use log::debug;
use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};

use super::ImageHasher;
use crate::error::{Error, Result};
use crate::hash::ImageHash;
use crate::resample;

/// Packed size of a Marr-Hildreth hash: 576 bits.
pub const MARR_HILDRETH_HASH_BYTES: usize = 72;

/// Resolution the edge response is computed at.
const WORKING_SIZE: u32 = 512;
/// Side of the summation blocks laid over the filter response.
const BLOCK_SIZE: usize = 16;
/// Blocks per axis; 31 blocks of 16 cover 496 of the 512 pixels.
const BLOCK_GRID: usize = 31;
/// Anchor stride for the 3x3 block neighborhoods that produce the bits.
const ANCHOR_STRIDE: usize = 4;
const NEIGHBORHOOD: usize = 3;

/// Sigma of the pre-smoothing blur applied before resampling, the equivalent
/// of a 7x7 Gaussian kernel.
const PRE_BLUR_SIGMA: f32 = 1.4;

/// Largest accepted kernel radius; beyond this the operator support swamps
/// the 512x512 working image.
const MAX_RADIUS: i32 = 32;

/// Interpolation envelope used to build the operator kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelKind {
    /// Gaussian falloff, the classic Laplacian-of-Gaussian shape.
    Gaussian,
    /// Linear (triangular) falloff.
    Linear,
}

/// Blur parameters for the Marr-Hildreth hash.
///
/// The kernel radius is `4 * alpha^scale` and kernel samples are taken at
/// `alpha^-scale`-scaled offsets, so `alpha` sets the spacing between blur
/// levels and `scale` picks the level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarrHildrethConfig {
    pub kernel: KernelKind,
    pub alpha: f32,
    pub scale: f32,
}

impl Default for MarrHildrethConfig {
    fn default() -> Self {
        Self {
            kernel: KernelKind::Gaussian,
            alpha: 2.0,
            scale: 1.0,
        }
    }
}

impl MarrHildrethConfig {
    fn radius(&self) -> i32 {
        (4.0 * self.alpha.powf(self.scale)) as i32
    }

    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(Error::Configuration(format!(
                "alpha must be a positive finite number, got {}",
                self.alpha
            )));
        }
        if !self.scale.is_finite() {
            return Err(Error::Configuration(format!(
                "scale must be finite, got {}",
                self.scale
            )));
        }
        let radius = self.radius();
        if !(1..=MAX_RADIUS).contains(&radius) {
            return Err(Error::Configuration(format!(
                "derived kernel radius {} outside 1..={}",
                radius, MAX_RADIUS
            )));
        }
        Ok(())
    }
}

/// Edge-structure hash via the Marr-Hildreth operator.
///
/// The input is smoothed, resampled to 512x512, contrast-equalized and
/// convolved with a Laplacian-of-Gaussian family kernel (the single-kernel
/// form of the difference-of-Gaussians edge response). Block sums of the
/// response are thresholded against their 3x3 neighborhood mean, so the hash
/// encodes edge layout rather than raw intensity; it survives blur, small
/// rotations and watermarking better than the intensity hashes, at a much
/// higher compute cost.
pub struct MarrHildrethHasher {
    config: MarrHildrethConfig,
    kernel: Array2<f32>,
    source: Array2<f32>,
    response: Array2<f32>,
    blocks: Array2<f32>,
}

impl MarrHildrethHasher {
    /// Build a hasher, validating the configuration.
    pub fn new(config: MarrHildrethConfig) -> Result<Self> {
        config.validate()?;
        let kernel = build_kernel(&config);
        debug!(
            "marr-hildreth kernel {}x{} ({:?})",
            kernel.nrows(),
            kernel.ncols(),
            config.kernel
        );
        let side = WORKING_SIZE as usize;
        Ok(Self {
            config,
            kernel,
            source: Array2::zeros((side, side)),
            response: Array2::zeros((side, side)),
            blocks: Array2::zeros((BLOCK_GRID, BLOCK_GRID)),
        })
    }

    pub fn config(&self) -> &MarrHildrethConfig {
        &self.config
    }
}

impl ImageHasher for MarrHildrethHasher {
    fn hash_len(&self) -> usize {
        MARR_HILDRETH_HASH_BYTES
    }

    fn compute(&mut self, img: &DynamicImage) -> Result<ImageHash> {
        let gray = resample::to_grayscale_native(img)?;
        let smoothed = imageops::blur(&gray, PRE_BLUR_SIGMA);
        let resized = imageops::resize(
            &smoothed,
            WORKING_SIZE,
            WORKING_SIZE,
            FilterType::CatmullRom,
        );
        let equalized = resample::equalize(&resized);

        fill_source(&equalized, &mut self.source);
        convolve(&self.source, &self.kernel, &mut self.response);

        // Sum the edge response over the 31x31 grid of 16x16 blocks.
        for row in 0..BLOCK_GRID {
            for col in 0..BLOCK_GRID {
                let view = self.response.slice(s![
                    row * BLOCK_SIZE..(row + 1) * BLOCK_SIZE,
                    col * BLOCK_SIZE..(col + 1) * BLOCK_SIZE
                ]);
                self.blocks[[row, col]] = view.sum();
            }
        }

        // Nine bits per 3x3 block neighborhood, anchored every 4 blocks:
        // a bit is set when its block sum exceeds the neighborhood mean.
        let mut bits = Vec::with_capacity(MARR_HILDRETH_HASH_BYTES * 8);
        for row in (0..=BLOCK_GRID - NEIGHBORHOOD).step_by(ANCHOR_STRIDE) {
            for col in (0..=BLOCK_GRID - NEIGHBORHOOD).step_by(ANCHOR_STRIDE) {
                let region = self
                    .blocks
                    .slice(s![row..row + NEIGHBORHOOD, col..col + NEIGHBORHOOD]);
                let mean = region.sum() / (NEIGHBORHOOD * NEIGHBORHOOD) as f32;
                for &value in region.iter() {
                    bits.push(value > mean);
                }
            }
        }

        Ok(ImageHash::from_bits(bits))
    }
}

/// One-shot Marr-Hildreth hash.
pub fn marr_hildreth_hash(img: &DynamicImage, config: &MarrHildrethConfig) -> Result<ImageHash> {
    MarrHildrethHasher::new(*config)?.compute(img)
}

fn build_kernel(config: &MarrHildrethConfig) -> Array2<f32> {
    let radius = config.radius();
    let ratio = config.alpha.powf(-config.scale);
    let side = (2 * radius + 1) as usize;

    Array2::from_shape_fn((side, side), |(row, col)| {
        let ypos = ratio * (row as i32 - radius) as f32;
        let xpos = ratio * (col as i32 - radius) as f32;
        let a = xpos * xpos + ypos * ypos;
        let envelope = match config.kernel {
            KernelKind::Gaussian => (-a / 2.0).exp(),
            KernelKind::Linear => (1.0 - a.sqrt() / 2.0).max(0.0),
        };
        (2.0 - a) * envelope
    })
}

fn fill_source(img: &GrayImage, out: &mut Array2<f32>) {
    debug_assert_eq!(img.width() as usize, out.ncols());
    debug_assert_eq!(img.height() as usize, out.nrows());
    for (dst, src) in out.iter_mut().zip(img.as_raw()) {
        *dst = *src as f32;
    }
}

/// Direct convolution with replicated borders; `out` matches `source`.
fn convolve(source: &Array2<f32>, kernel: &Array2<f32>, out: &mut Array2<f32>) {
    let height = source.nrows() as i64;
    let width = source.ncols() as i64;
    let radius = (kernel.nrows() / 2) as i64;

    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0f32;
            for ky in 0..kernel.nrows() as i64 {
                let sy = (y + ky - radius).clamp(0, height - 1) as usize;
                for kx in 0..kernel.ncols() as i64 {
                    let sx = (x + kx - radius).clamp(0, width - 1) as usize;
                    acc += source[[sy, sx]] * kernel[[ky as usize, kx as usize]];
                }
            }
            out[[y as usize, x as usize]] = acc;
        }
    }
}
