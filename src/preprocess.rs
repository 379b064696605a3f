//! Decoding and normalizing uploaded images into model input tensors

use crate::error::Result;
use image::imageops::FilterType;
use tch::{Kind, Tensor};

/// Spatial resolution the model was trained on
pub const IMAGE_SIZE: u32 = 256;

/// Decode raw upload bytes into a `(1, IMAGE_SIZE, IMAGE_SIZE, 3)` float
/// tensor with values in `[0, 1]`.
///
/// Accepts any container format the `image` crate can sniff. The image is
/// resized (not cropped) to the training resolution and forced to 3-channel
/// RGB, so grayscale and alpha inputs are handled.
pub fn preprocess(raw: &[u8]) -> Result<Tensor> {
    let decoded = image::load_from_memory(raw)?;
    let rgb = decoded
        .resize_exact(IMAGE_SIZE, IMAGE_SIZE, FilterType::CatmullRom)
        .to_rgb8();

    // Row-major RGB bytes are already in HWC order
    let tensor = Tensor::from_slice(rgb.as_raw())
        .view([IMAGE_SIZE as i64, IMAGE_SIZE as i64, 3])
        .to_kind(Kind::Float)
        / 255.;

    // Batch dimension of 1
    Ok(tensor.unsqueeze(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Luma, Rgb};
    use std::io::Cursor;

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_shape_and_range_from_arbitrary_dims() {
        let img = ImageBuffer::from_fn(512, 384, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128u8])
        });
        let bytes = png_bytes(DynamicImage::ImageRgb8(img));

        let tensor = preprocess(&bytes).unwrap();
        assert_eq!(tensor.size(), vec![1, IMAGE_SIZE as i64, IMAGE_SIZE as i64, 3]);
        assert!(tensor.min().double_value(&[]) >= 0.0);
        assert!(tensor.max().double_value(&[]) <= 1.0);
    }

    #[test]
    fn test_solid_color_normalization() {
        let img = ImageBuffer::from_pixel(64, 64, Rgb([255u8, 0, 0]));
        let bytes = png_bytes(DynamicImage::ImageRgb8(img));

        let tensor = preprocess(&bytes).unwrap();
        // Every pixel keeps the solid color through the resize
        assert_eq!(tensor.double_value(&[0, 10, 10, 0]), 1.0);
        assert_eq!(tensor.double_value(&[0, 10, 10, 1]), 0.0);
        assert_eq!(tensor.double_value(&[0, 10, 10, 2]), 0.0);
    }

    #[test]
    fn test_grayscale_becomes_three_channels() {
        let img = ImageBuffer::from_pixel(100, 100, Luma([77u8]));
        let bytes = png_bytes(DynamicImage::ImageLuma8(img));

        let tensor = preprocess(&bytes).unwrap();
        assert_eq!(tensor.size(), vec![1, IMAGE_SIZE as i64, IMAGE_SIZE as i64, 3]);
    }

    #[test]
    fn test_garbage_bytes_fail_with_decode_error() {
        let err = preprocess(b"definitely not an image").unwrap_err();
        assert!(matches!(err, crate::Error::Decode(_)));
    }
}
