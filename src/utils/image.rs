//! Image loading and in-memory encoding.

use crate::core::errors::{PiiError, PiiResult};
use image::{ImageFormat, RgbImage};
use std::io::Cursor;

/// Loads an image from a file path and converts it to RgbImage.
///
/// # Errors
///
/// Returns `PiiError::ImageLoad` if the file cannot be opened or decoded.
pub fn load_image(path: &std::path::Path) -> PiiResult<RgbImage> {
    let img = image::open(path).map_err(PiiError::ImageLoad)?;
    Ok(img.to_rgb8())
}

/// Encodes an image as PNG into a new byte buffer.
///
/// # Errors
///
/// Returns an encoding error if the PNG encoder fails.
pub fn encode_png(image: &RgbImage) -> PiiResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| PiiError::encoding("png encode", e))?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_encode_png_decodes_back() {
        let mut img = RgbImage::from_pixel(3, 2, Rgb([255, 255, 255]));
        img.put_pixel(1, 1, Rgb([0, 0, 255]));

        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_load_image_converts_to_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        image::GrayImage::from_pixel(4, 3, image::Luma([128])).save(&path).unwrap();

        let img = load_image(&path).unwrap();
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(img.get_pixel(0, 0), &Rgb([128, 128, 128]));
    }

    #[test]
    fn test_load_missing_image() {
        let err = load_image(std::path::Path::new("/nonexistent/image.png")).unwrap_err();
        assert!(matches!(err, PiiError::ImageLoad(_)));
    }
}
