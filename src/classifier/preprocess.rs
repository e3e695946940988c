use crate::{Error, Result};
use image::imageops::{self, FilterType};

/// A decoded upload, resized and scaled for the network.
///
/// `pixels` is NHWC with a batch of one: `size * size * 3` values in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub size: u32,
    pub pixels: Vec<f32>,
}

/// Decodes an uploaded image and turns it into network input.
///
/// Alpha is dropped and grayscale is expanded to three channels. The image is
/// squashed to `size x size` without keeping its aspect ratio.
pub fn preprocess(bytes: &[u8], size: u32) -> Result<PreparedImage> {
    if size == 0 {
        return Err(Error::classifier("Target image size must be positive"));
    }

    let rgb = image::load_from_memory(bytes)?.to_rgb8();
    let resized = imageops::resize(&rgb, size, size, FilterType::CatmullRom);

    let pixels = resized
        .into_raw()
        .into_iter()
        .map(|channel| f32::from(channel) / 255.0)
        .collect();

    Ok(PreparedImage { size, pixels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Luma, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Vec::new();
        image.write_to(&mut Cursor::new(&mut buf), format).unwrap();
        buf
    }

    #[test]
    fn test_rgba_png_is_resized_and_scaled() {
        let png = encode(
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 20, Rgba([255, 0, 0, 128]))),
            ImageFormat::Png,
        );

        let prepared = preprocess(&png, 8).unwrap();

        assert_eq!(prepared.size, 8);
        assert_eq!(prepared.pixels.len(), 8 * 8 * 3);
        for pixel in prepared.pixels.chunks(3) {
            assert!((pixel[0] - 1.0).abs() < 1e-2);
            assert!(pixel[1].abs() < 1e-2);
            assert!(pixel[2].abs() < 1e-2);
        }
    }

    #[test]
    fn test_grayscale_is_expanded_to_rgb() {
        let png = encode(
            DynamicImage::ImageLuma8(image::GrayImage::from_pixel(5, 5, Luma([51]))),
            ImageFormat::Png,
        );

        let prepared = preprocess(&png, 4).unwrap();

        assert_eq!(prepared.pixels.len(), 4 * 4 * 3);
        assert!(prepared.pixels.iter().all(|v| (v - 0.2).abs() < 1e-2));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = preprocess(b"definitely not an image", 150).unwrap_err();
        assert!(matches!(err, Error::Image(_)));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let png = encode(
            DynamicImage::ImageRgba8(RgbaImage::new(2, 2)),
            ImageFormat::Png,
        );
        assert!(preprocess(&png, 0).is_err());
    }
}
