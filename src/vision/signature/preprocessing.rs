// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image normalization for the signature classifier
//!
//! The classifier was trained on OpenCV-loaded images, so it expects
//! BGR channel order, pixel values in [0, 1] and an NHWC layout.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView};
use ndarray::Array4;
use thiserror::Error;

/// Side length of the square model input
pub const SIGNATURE_INPUT_SIZE: u32 = 224;

/// Number of colour channels fed to the model
pub const SIGNATURE_CHANNELS: usize = 3;

/// Normalized model input: `[1, 224, 224, 3]`, BGR, values in [0, 1]
pub type SignatureTensor = Array4<f32>;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("image has zero size ({0}x{1})")]
    EmptyImage(u32, u32),

    #[error("unexpected tensor shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Convert a decoded bitmap into the classifier's input tensor
///
/// Steps:
/// 1. Reduce to 8 bits per channel, replicating grayscale into three channels
///    and dropping any alpha channel
/// 2. Swap channels to BGR
/// 3. Stretch to 224x224 with bilinear filtering (no letterboxing)
/// 4. Scale pixel values from [0, 255] to [0, 1]
/// 5. Add a batch axis of size 1
pub fn preprocess_signature(image: &DynamicImage) -> Result<SignatureTensor, PreprocessError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(PreprocessError::EmptyImage(width, height));
    }

    tracing::debug!(
        "Normalizing {}x{} {:?} image for signature model",
        width,
        height,
        image.color()
    );

    // to_rgb8 replicates luma and discards alpha
    let mut bgr = image.to_rgb8();
    for pixel in bgr.pixels_mut() {
        pixel.0.swap(0, 2);
    }

    let resized = imageops::resize(
        &bgr,
        SIGNATURE_INPUT_SIZE,
        SIGNATURE_INPUT_SIZE,
        FilterType::Triangle,
    );

    // Raw buffer is row-major HWC, which is exactly the NHWC layout with N = 1
    let values: Vec<f32> = resized
        .into_raw()
        .into_iter()
        .map(|v| f32::from(v) / 255.0)
        .collect();

    let size = SIGNATURE_INPUT_SIZE as usize;
    let tensor = Array4::from_shape_vec((1, size, size, SIGNATURE_CHANNELS), values)?;

    Ok(tensor)
}
