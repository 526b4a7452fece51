use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the image-hash library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Input image has no pixels
    #[error("Empty image: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    /// Hamming distance requested between hashes of different lengths
    #[error("Hash length mismatch: {left} bytes vs {right} bytes")]
    HashLengthMismatch { left: usize, right: usize },

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}
