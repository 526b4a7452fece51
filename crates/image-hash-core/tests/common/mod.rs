//! Synthetic image builders shared by the integration tests.

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use once_cell::sync::Lazy;

/// Shared structured test image: two gradients plus a bright disc, all
/// large-scale features that perceptual hashes should latch onto.
pub static TEST_IMAGE: Lazy<DynamicImage> = Lazy::new(|| structured_image(256, 256));

/// Grayscale gradients with a bright centered disc.
pub fn structured_image(width: u32, height: u32) -> DynamicImage {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let radius = width.min(height) as f32 / 3.2;

    let img = GrayImage::from_fn(width, height, |x, y| {
        let base = x * 128 / width.max(1) + y * 64 / height.max(1);
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let disc = if (dx * dx + dy * dy).sqrt() < radius {
            100
        } else {
            0
        };
        Luma([(base + disc).min(255) as u8])
    });
    DynamicImage::ImageLuma8(img)
}

/// Same layout as [`structured_image`] but in color, for channel-collapse
/// checks.
pub fn structured_rgb_image(width: u32, height: u32) -> DynamicImage {
    let gray = structured_image(width, height).to_luma8();
    let img = RgbImage::from_fn(width, height, |x, y| {
        let v = gray.get_pixel(x, y)[0];
        Rgb([v, v / 2 + 60, v / 3 + 40])
    });
    DynamicImage::ImageRgb8(img)
}

pub fn flat_image(width: u32, height: u32, value: u8) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([value])))
}

pub fn empty_image() -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::new(0, 0))
}

/// Gaussian-blurred copy, collapsed to grayscale.
pub fn blurred(img: &DynamicImage, sigma: f32) -> DynamicImage {
    DynamicImage::ImageLuma8(image::imageops::blur(&img.to_luma8(), sigma))
}
