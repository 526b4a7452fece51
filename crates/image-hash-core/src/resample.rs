//! Canonicalization of input images to the fixed working resolutions the
//! hashing algorithms operate on.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, GrayImage, Luma};

use crate::error::{Error, Result};

/// Convert an image to 8-bit grayscale at exactly `width`x`height`.
///
/// Rejects empty input before any pixel work; an image with no pixels has no
/// meaningful hash.
pub fn to_grayscale(
    img: &DynamicImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<GrayImage> {
    check_not_empty(img)?;
    let gray = img.to_luma8();
    Ok(imageops::resize(&gray, width, height, filter))
}

/// Convert an image to 8-bit grayscale at its native resolution.
pub fn to_grayscale_native(img: &DynamicImage) -> Result<GrayImage> {
    check_not_empty(img)?;
    Ok(img.to_luma8())
}

/// Histogram-equalize an 8-bit grayscale image.
///
/// Spreads the intensity distribution over the full 0-255 range so hashes do
/// not depend on global contrast. A flat image is returned unchanged.
pub fn equalize(img: &GrayImage) -> GrayImage {
    let mut histogram = [0u64; 256];
    for p in img.as_raw() {
        histogram[*p as usize] += 1;
    }

    let total = img.as_raw().len() as u64;
    let mut cdf = [0u64; 256];
    let mut running = 0u64;
    for (bin, &count) in histogram.iter().enumerate() {
        running += count;
        cdf[bin] = running;
    }

    let cdf_min = cdf.iter().copied().find(|&c| c > 0).unwrap_or(0);
    let span = total - cdf_min;
    if span == 0 {
        return img.clone();
    }

    let mut lut = [0u8; 256];
    for (bin, slot) in lut.iter_mut().enumerate() {
        *slot = ((cdf[bin] - cdf_min) * 255 / span) as u8;
    }

    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        Luma([lut[img.get_pixel(x, y)[0] as usize]])
    })
}

fn check_not_empty(img: &DynamicImage) -> Result<()> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn resamples_to_requested_resolution() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            100,
            37,
            Rgb([10, 200, 30]),
        ));
        let gray = to_grayscale(&img, 8, 8, FilterType::Triangle).unwrap();
        assert_eq!(gray.dimensions(), (8, 8));
    }

    #[test]
    fn rejects_empty_images() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(0, 0));
        let err = to_grayscale(&img, 8, 8, FilterType::Triangle).unwrap_err();
        assert!(matches!(err, Error::EmptyImage { width: 0, height: 0 }));

        let err = to_grayscale_native(&img).unwrap_err();
        assert!(matches!(err, Error::EmptyImage { .. }));
    }

    #[test]
    fn equalize_stretches_contrast() {
        let mut img = GrayImage::from_pixel(4, 4, Luma([100]));
        for x in 0..4 {
            img.put_pixel(x, 0, Luma([110]));
        }
        let eq = equalize(&img);
        let values: Vec<u8> = eq.as_raw().iter().copied().collect();
        assert!(values.contains(&255));
        assert!(values.iter().min().unwrap() < values.iter().max().unwrap());
    }

    #[test]
    fn equalize_leaves_flat_image_unchanged() {
        let img = GrayImage::from_pixel(5, 5, Luma([42]));
        assert_eq!(equalize(&img), img);
    }
}
