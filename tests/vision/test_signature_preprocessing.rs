// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Signature preprocessing tests
//!
//! Any decodable image, whatever its size or colour layout, must come out as a
//! `[1, 224, 224, 3]` BGR tensor with values in [0, 1].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use signature_verifier::vision::image_utils::{decode_data_url, decode_image_bytes};
use signature_verifier::vision::signature::{
    preprocess_signature, SIGNATURE_CHANNELS, SIGNATURE_INPUT_SIZE,
};
use std::io::Cursor;

const EXPECTED_SHAPE: [usize; 4] = [
    1,
    SIGNATURE_INPUT_SIZE as usize,
    SIGNATURE_INPUT_SIZE as usize,
    SIGNATURE_CHANNELS,
];

fn assert_normalized(image: &DynamicImage) {
    let tensor = preprocess_signature(image).unwrap();
    assert_eq!(tensor.shape(), EXPECTED_SHAPE);
    assert!(tensor.iter().all(|v| (0.0..=1.0).contains(v)));
}

fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn test_tiny_grayscale_is_upscaled() {
    let img = GrayImage::from_fn(10, 10, |x, y| Luma([((x + y) * 12) as u8]));
    assert_normalized(&DynamicImage::ImageLuma8(img));
}

#[test]
fn test_wide_rgb_is_stretched() {
    let img = RgbImage::from_fn(500, 300, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
    assert_normalized(&DynamicImage::ImageRgb8(img));
}

#[test]
fn test_tall_rgba_is_normalized() {
    let img = RgbaImage::from_pixel(40, 900, Rgba([10, 20, 30, 0]));
    assert_normalized(&DynamicImage::ImageRgba8(img));
}

#[test]
fn test_white_canvas_is_all_ones() {
    let img = RgbImage::from_pixel(300, 150, Rgb([255, 255, 255]));
    let tensor = preprocess_signature(&DynamicImage::ImageRgb8(img)).unwrap();
    assert!(tensor.iter().all(|v| (*v - 1.0).abs() < 1e-6));
}

#[test]
fn test_channel_order_is_bgr() {
    let img = RgbImage::from_pixel(50, 50, Rgb([0, 0, 255]));
    let tensor = preprocess_signature(&DynamicImage::ImageRgb8(img)).unwrap();
    assert!((tensor[[0, 100, 100, 0]] - 1.0).abs() < 1e-6);
    assert!(tensor[[0, 100, 100, 1]].abs() < 1e-6);
    assert!(tensor[[0, 100, 100, 2]].abs() < 1e-6);
}

#[test]
fn test_upload_and_drawing_paths_agree() {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(64, 32, |x, _| {
        Rgb([(x * 4) as u8, 0, 255 - (x * 4) as u8])
    }));
    let bytes = png_bytes(&img);
    let data_url = format!("data:image/png;base64,{}", STANDARD.encode(&bytes));

    let (uploaded, _) = decode_image_bytes(&bytes).unwrap();
    let (drawn, info) = decode_data_url(&data_url).unwrap();
    assert_eq!((info.width, info.height), (64, 32));

    let from_upload = preprocess_signature(&uploaded).unwrap();
    let from_drawing = preprocess_signature(&drawn).unwrap();
    assert_eq!(from_upload, from_drawing);
}
